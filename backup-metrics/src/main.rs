//! Emit one backup count per object uploaded to the backups bucket.
use aws_config::BehaviorVersion;
use aws_lambda_events::event::s3::S3Event;
use backup_common::cloudwatch::CloudWatchImpl;
use backup_common::metrics::{EmfSink, MetricSink};
use backup_common::{setup_tracing, Error};
use backup_metrics::config::{Config, SinkKind};
use backup_metrics::handler::handle_upload;
use envconfig::Envconfig;
use lambda_runtime::{run, service_fn, LambdaEvent};
use tracing::{error, info};

async fn function_handler(
    config: &Config,
    sink: &dyn MetricSink,
    event: LambdaEvent<S3Event>,
) -> Result<(), lambda_runtime::Error> {
    handle_upload(config, sink, &event.payload).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    setup_tracing();

    let config = Config::init_from_env().map_err(|e| {
        error!(error = %e, "invalid configuration");
        Error::from(e)
    })?;

    let sink: Box<dyn MetricSink> = match config.metric_sink {
        SinkKind::Emf => Box::new(EmfSink::stdout()),
        SinkKind::Api => {
            let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
            Box::new(CloudWatchImpl::new(aws_sdk_cloudwatch::Client::new(
                &aws_config,
            )))
        }
    };
    info!(sink = ?config.metric_sink, "starting backup metrics function");

    run(service_fn(|event| {
        function_handler(&config, sink.as_ref(), event)
    }))
    .await
}
