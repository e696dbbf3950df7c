use async_trait::async_trait;

use crate::error::Error;

/// Placeholder replaced by the system identifier in alarm name and description templates.
pub const SYSTEM_PLACEHOLDER: &str = "{system}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmState {
    Ok,
    Alarm,
}

/// A "no backup arrived in the window" alarm for one system.
///
/// The statistic is always a sum over one evaluation period, compared with `LessThanThreshold`,
/// and missing data is treated as breaching so a system that stops reporting still alarms.
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmSpec {
    pub name: String,
    pub description: String,
    pub namespace: String,
    pub metric_name: String,
    pub dimension_name: String,
    pub dimension_value: String,
    pub period_secs: i32,
    pub evaluation_periods: i32,
    pub threshold: f64,
    pub alarm_actions: Vec<String>,
}

impl AlarmSpec {
    /// State of the alarm given the datapoints that fell inside one period.
    pub fn evaluate(&self, window: &[f64]) -> AlarmState {
        if window.is_empty() {
            return AlarmState::Alarm;
        }

        let sum: f64 = window.iter().sum();
        if sum < self.threshold {
            AlarmState::Alarm
        } else {
            AlarmState::Ok
        }
    }
}

/// Substitute the system identifier into a name or description template.
pub fn render_template(template: &str, system: &str) -> String {
    template.replace(SYSTEM_PLACEHOLDER, system)
}

/// Write side of the alarm service.
#[async_trait]
pub trait AlarmBackend: Send + Sync {
    /// Create the alarm, or replace the one with the same name.
    async fn put_alarm(&self, alarm: &AlarmSpec) -> Result<(), Error>;
}
