use aws_lambda_events::event::s3::S3Event;
use backup_common::metrics::{MetricPoint, MetricSink};
use backup_common::object_key::system_from_event;
use backup_common::{Error, SystemId};
use tracing::{error, info, warn};

use crate::config::Config;

/// Turn one upload notification into one backup count for the uploading system.
///
/// Nothing is emitted when the key cannot be parsed. The point has been accepted by the sink
/// once this returns `Ok`.
pub async fn handle_upload(
    config: &Config,
    sink: &dyn MetricSink,
    event: &S3Event,
) -> Result<SystemId, Error> {
    if event.records.len() > 1 {
        warn!(
            records = event.records.len(),
            "event carries several records, only the first one is processed"
        );
    }

    let (key, system) =
        system_from_event(event, config.system_segment_index).map_err(|e| {
            error!(error = %e, "rejecting upload event");
            Error::from(e)
        })?;
    info!(key = %key, system = %system, "processing backup upload");

    let point = MetricPoint::backup_count(&config.metric, &system);
    sink.put(&point).await.map_err(|e| {
        error!(system = %system, error = %e, "failed to emit backup metric");
        e
    })?;

    info!(system = %system, "pushed metric and dimension");
    Ok(system)
}
