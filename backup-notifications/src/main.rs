//! Custom resource wiring the backups bucket to the metrics function at stack create/update.
use aws_config::BehaviorVersion;
use backup_common::s3::S3Impl;
use backup_common::{setup_tracing, Error};
use backup_notifications::config::Config;
use backup_notifications::custom_resource::{CustomResourceRequest, HttpResponder};
use backup_notifications::handler::handle_request;
use envconfig::Envconfig;
use lambda_runtime::{run, service_fn, LambdaEvent};
use tracing::error;

async fn function_handler(
    config: &Config,
    s3: &S3Impl,
    responder: &HttpResponder,
    event: LambdaEvent<CustomResourceRequest>,
) -> Result<(), lambda_runtime::Error> {
    handle_request(config, s3, responder, &event.payload).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    setup_tracing();

    let config = Config::init_from_env().map_err(|e| {
        error!(error = %e, "invalid configuration");
        Error::from(e)
    })?;

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3 = S3Impl::new(aws_sdk_s3::Client::new(&aws_config));
    let responder = HttpResponder::new(reqwest::Client::new());

    run(service_fn(|event| {
        function_handler(&config, &s3, &responder, event)
    }))
    .await
}
