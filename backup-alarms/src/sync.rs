use std::collections::BTreeSet;

use backup_common::alarms::{render_template, AlarmBackend, AlarmSpec};
use backup_common::metrics::MetricCatalog;
use backup_common::{Error, SystemId};
use tracing::{error, info, warn};

use crate::config::Config;

/// Outcome of one synchronization run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub upserted: Vec<SystemId>,
    pub failed: Vec<SystemId>,
}

/// Every distinct system that reported the configured metric.
pub async fn known_systems(
    config: &Config,
    catalog: &dyn MetricCatalog,
) -> Result<BTreeSet<SystemId>, Error> {
    let metric = &config.metric;
    let entries = catalog
        .list_metrics(metric.namespace.as_str(), metric.metric_name.as_str())
        .await
        .map_err(|e| {
            error!(error = %e, "failed to list backup metrics");
            e
        })?;

    let mut systems = BTreeSet::new();
    for entry in &entries {
        let Some(value) = entry.dimension(metric.dimension_name.as_str()) else {
            continue;
        };
        match SystemId::new(value) {
            Ok(system) => {
                systems.insert(system);
            }
            Err(e) => warn!(error = %e, "ignoring metric with an empty system dimension"),
        }
    }

    Ok(systems)
}

/// The alarm that fires when `system` uploaded nothing for a whole period.
pub fn alarm_for(config: &Config, system: &SystemId) -> AlarmSpec {
    AlarmSpec {
        name: render_template(config.alarm_name_template.as_str(), system.as_str()),
        description: render_template(&config.alarm_description_template, system.as_str()),
        namespace: config.metric.namespace.as_str().to_owned(),
        metric_name: config.metric.metric_name.as_str().to_owned(),
        dimension_name: config.metric.dimension_name.as_str().to_owned(),
        dimension_value: system.as_str().to_owned(),
        period_secs: config.alarm_period.0,
        evaluation_periods: 1,
        threshold: 1.0,
        alarm_actions: vec![config.alarm_topic_arn.as_str().to_owned()],
    }
}

/// Upsert one alarm per known system.
///
/// A listing failure aborts the run before any alarm is touched. A failed upsert is logged and
/// the remaining systems are still processed, the run then fails with `AlarmSyncIncomplete`.
pub async fn sync_alarms(
    config: &Config,
    catalog: &dyn MetricCatalog,
    alarms: &dyn AlarmBackend,
) -> Result<SyncReport, Error> {
    let systems = known_systems(config, catalog).await?;
    info!(systems = systems.len(), "synchronizing backup alarms");

    let mut report = SyncReport::default();
    for system in systems {
        let alarm = alarm_for(config, &system);
        match alarms.put_alarm(&alarm).await {
            Ok(()) => {
                info!(system = %system, alarm = %alarm.name, "upserted backup alarm");
                report.upserted.push(system);
            }
            Err(e) => {
                error!(
                    system = %system,
                    alarm = %alarm.name,
                    error = %e,
                    "failed to upsert backup alarm"
                );
                report.failed.push(system);
            }
        }
    }

    if !report.failed.is_empty() {
        return Err(Error::AlarmSyncIncomplete {
            failed: report.failed.len(),
            total: report.failed.len() + report.upserted.len(),
        });
    }

    Ok(report)
}
