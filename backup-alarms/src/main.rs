//! Scheduled function keeping one "no backup received" alarm per reporting system.
use aws_config::BehaviorVersion;
use backup_alarms::config::Config;
use backup_alarms::sync::sync_alarms;
use backup_common::cloudwatch::CloudWatchImpl;
use backup_common::{setup_tracing, Error};
use envconfig::Envconfig;
use lambda_runtime::{run, service_fn, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

async fn function_handler(
    config: &Config,
    cloudwatch: &CloudWatchImpl,
    _event: LambdaEvent<Value>,
) -> Result<(), lambda_runtime::Error> {
    let report = sync_alarms(config, cloudwatch, cloudwatch).await?;
    info!(upserted = report.upserted.len(), "backup alarms synchronized");
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
    let cloudwatch = CloudWatchImpl::new(aws_sdk_cloudwatch::Client::new(&aws_config));

    run(service_fn(|event| function_handler(&config, &cloudwatch, event))).await
}
