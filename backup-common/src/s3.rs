use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::{Event, LambdaFunctionConfiguration, NotificationConfiguration};
use aws_sdk_s3::Client as AwsS3SdkClient;

use crate::error::Error;
use crate::notifications::{BucketNotification, NotificationBackend};

pub struct S3Impl {
    client: AwsS3SdkClient,
}

impl S3Impl {
    pub fn new(client: AwsS3SdkClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotificationBackend for S3Impl {
    async fn put_bucket_notification(
        &self,
        notification: &BucketNotification,
    ) -> Result<(), Error> {
        let function = LambdaFunctionConfiguration::builder()
            .id(&notification.id)
            .lambda_function_arn(&notification.function_arn)
            .events(Event::S3ObjectCreated)
            .build()
            .map_err(|e| Error::backend("put_bucket_notification_configuration", e))?;

        let configuration = NotificationConfiguration::builder()
            .lambda_function_configurations(function)
            .build();

        self.client
            .put_bucket_notification_configuration()
            .bucket(&notification.bucket)
            .notification_configuration(configuration)
            .send()
            .await
            .map_err(|e| {
                Error::backend(
                    "put_bucket_notification_configuration",
                    DisplayErrorContext(e),
                )
            })?;

        Ok(())
    }
}
