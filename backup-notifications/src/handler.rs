use backup_common::notifications::{BucketNotification, NotificationBackend};
use backup_common::Error;
use tracing::{error, info};

use crate::config::Config;
use crate::custom_resource::{
    CustomResourceRequest, CustomResourceResponse, RequestType, Responder,
};

pub fn bucket_notification(config: &Config) -> BucketNotification {
    BucketNotification {
        bucket: config.bucket_name.as_str().to_owned(),
        id: config.notification_id.as_str().to_owned(),
        function_arn: config.ingest_function_arn.as_str().to_owned(),
    }
}

/// Route the bucket's object-created events to the ingestion function.
pub async fn provision(config: &Config, backend: &dyn NotificationBackend) -> Result<(), Error> {
    let notification = bucket_notification(config);
    info!(
        bucket = %notification.bucket,
        function = %notification.function_arn,
        "creating bucket event notification"
    );
    backend.put_bucket_notification(&notification).await
}

/// Handle one custom resource request and report its outcome to CloudFormation.
///
/// Create and Update (re)write the notification configuration, Delete leaves it in place.
/// Provisioning failures are reported as FAILED; only a response that cannot be delivered fails
/// the invocation.
pub async fn handle_request(
    config: &Config,
    backend: &dyn NotificationBackend,
    responder: &dyn Responder,
    request: &CustomResourceRequest,
) -> Result<CustomResourceResponse, Error> {
    info!(
        request_type = ?request.request_type,
        request_id = %request.request_id,
        "received custom resource request"
    );

    let outcome = match request.request_type {
        RequestType::Create | RequestType::Update => provision(config, backend).await,
        RequestType::Delete => {
            info!(bucket = %config.bucket_name.as_str(), "leaving bucket notification in place");
            Ok(())
        }
    };

    let physical_resource_id = request.physical_resource_id.clone().unwrap_or_else(|| {
        format!(
            "{}-{}",
            config.bucket_name.as_str(),
            config.notification_id.as_str()
        )
    });

    let response = match outcome {
        Ok(()) => CustomResourceResponse::success(request, physical_resource_id),
        Err(e) => {
            error!(error = %e, "failed to provision bucket notification");
            CustomResourceResponse::failed(request, physical_resource_id, e.to_string())
        }
    };

    responder
        .respond(&request.response_url, &response)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to deliver custom resource response");
            e
        })?;

    Ok(response)
}
