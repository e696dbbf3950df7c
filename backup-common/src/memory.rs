//! In-memory backends for tests, always available so every function crate can use them.
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};

use crate::alarms::{AlarmBackend, AlarmSpec, AlarmState};
use crate::error::Error;
use crate::metrics::{MetricCatalog, MetricEntry, MetricPoint, MetricSink};
use crate::notifications::{BucketNotification, NotificationBackend};

#[derive(Default)]
struct State {
    points: Vec<MetricPoint>,
    alarms: BTreeMap<String, AlarmSpec>,
    alarm_puts: usize,
    notifications: BTreeMap<String, BucketNotification>,
    failing_alarms: HashSet<String>,
    unavailable: bool,
}

/// Metrics, alarm and notification store kept in memory.
///
/// Metric listing returns one entry per recorded point, so the same dimension value is listed
/// as many times as it was emitted.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with `BackendUnavailable` until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    /// Upserts of the alarm named `name` fail.
    pub fn fail_alarm(&self, name: &str) {
        self.state().failing_alarms.insert(name.to_owned());
    }

    pub fn points(&self) -> Vec<MetricPoint> {
        self.state().points.clone()
    }

    pub fn alarms(&self) -> Vec<AlarmSpec> {
        self.state().alarms.values().cloned().collect()
    }

    pub fn alarm(&self, name: &str) -> Option<AlarmSpec> {
        self.state().alarms.get(name).cloned()
    }

    /// Number of upsert calls received, including replacements.
    pub fn alarm_puts(&self) -> usize {
        self.state().alarm_puts
    }

    pub fn notification(&self, bucket: &str) -> Option<BucketNotification> {
        self.state().notifications.get(bucket).cloned()
    }

    /// Evaluate the alarm named `name` over the period ending at `now`.
    pub fn alarm_state(&self, name: &str, now: OffsetDateTime) -> Option<AlarmState> {
        let state = self.state();
        let alarm = state.alarms.get(name)?;
        let window_start = now - Duration::seconds(i64::from(alarm.period_secs));

        let window: Vec<f64> = state
            .points
            .iter()
            .filter(|p| {
                p.namespace == alarm.namespace
                    && p.metric_name == alarm.metric_name
                    && p.dimension_name == alarm.dimension_name
                    && p.dimension_value == alarm.dimension_value
                    && p.timestamp > window_start
                    && p.timestamp <= now
            })
            .map(|p| p.value)
            .collect();

        Some(alarm.evaluate(&window))
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_available(&self, operation: &str) -> Result<(), Error> {
        if self.state().unavailable {
            return Err(Error::backend(operation, "memory backend is unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl MetricSink for MemoryBackend {
    async fn put(&self, point: &MetricPoint) -> Result<(), Error> {
        self.check_available("put_metric_data")?;
        self.state().points.push(point.clone());
        Ok(())
    }
}

#[async_trait]
impl MetricCatalog for MemoryBackend {
    async fn list_metrics(
        &self,
        namespace: &str,
        metric_name: &str,
    ) -> Result<Vec<MetricEntry>, Error> {
        self.check_available("list_metrics")?;
        let entries = self
            .state()
            .points
            .iter()
            .filter(|p| p.namespace == namespace && p.metric_name == metric_name)
            .map(|p| MetricEntry {
                dimensions: vec![(p.dimension_name.clone(), p.dimension_value.clone())],
            })
            .collect();
        Ok(entries)
    }
}

#[async_trait]
impl AlarmBackend for MemoryBackend {
    async fn put_alarm(&self, alarm: &AlarmSpec) -> Result<(), Error> {
        self.check_available("put_metric_alarm")?;
        let mut state = self.state();
        if state.failing_alarms.contains(&alarm.name) {
            return Err(Error::backend(
                "put_metric_alarm",
                format!("rejected alarm {}", alarm.name),
            ));
        }
        state.alarm_puts += 1;
        state.alarms.insert(alarm.name.clone(), alarm.clone());
        Ok(())
    }
}

#[async_trait]
impl NotificationBackend for MemoryBackend {
    async fn put_bucket_notification(
        &self,
        notification: &BucketNotification,
    ) -> Result<(), Error> {
        self.check_available("put_bucket_notification_configuration")?;
        self.state()
            .notifications
            .insert(notification.bucket.clone(), notification.clone());
        Ok(())
    }
}
