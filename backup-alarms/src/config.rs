use std::str::FromStr;

use backup_common::alarms::SYSTEM_PLACEHOLDER;
use backup_common::config::{MetricConfig, NonEmptyString};
use envconfig::Envconfig;
use thiserror::Error;

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    #[envconfig(nested = true)]
    pub metric: MetricConfig,

    #[envconfig(from = "ALARM_TOPIC_ARN")]
    pub alarm_topic_arn: NonEmptyString,

    #[envconfig(from = "ALARM_PERIOD_SECS", default = "86400")]
    pub alarm_period: AlarmPeriod,

    #[envconfig(from = "ALARM_NAME_TEMPLATE", default = "{system}")]
    pub alarm_name_template: NameTemplate,

    #[envconfig(from = "ALARM_DESCRIPTION_TEMPLATE", default = "{system} Backups to S3")]
    pub alarm_description_template: String,
}

/// Alarm evaluation period in seconds, a positive multiple of a minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlarmPeriod(pub i32);

#[derive(Error, Debug, PartialEq, Eq)]
#[error("alarm period must be a positive multiple of 60 seconds, got {0:?}")]
pub struct InvalidAlarmPeriod(String);

impl FromStr for AlarmPeriod {
    type Err = InvalidAlarmPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<i32>() {
            Ok(secs) if secs > 0 && secs % 60 == 0 => Ok(AlarmPeriod(secs)),
            _ => Err(InvalidAlarmPeriod(s.to_owned())),
        }
    }
}

/// Alarm name template. It must contain the system placeholder, otherwise every system would
/// overwrite the same alarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate(pub String);

impl NameTemplate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("alarm name template {0:?} does not contain {{system}}")]
pub struct InvalidNameTemplate(String);

impl FromStr for NameTemplate {
    type Err = InvalidNameTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(SYSTEM_PLACEHOLDER) {
            Ok(NameTemplate(s.to_owned()))
        } else {
            Err(InvalidNameTemplate(s.to_owned()))
        }
    }
}
