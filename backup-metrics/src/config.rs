use std::str::FromStr;

use backup_common::config::MetricConfig;
use envconfig::Envconfig;
use thiserror::Error;

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    #[envconfig(nested = true)]
    pub metric: MetricConfig,

    // Which '/' separated segment of the object key names the system. Index 0 for buckets laid
    // out as <system>/..., index 1 for <prefix>/<system>/...
    #[envconfig(from = "SYSTEM_SEGMENT_INDEX", default = "0")]
    pub system_segment_index: usize,

    #[envconfig(from = "METRIC_SINK", default = "emf")]
    pub metric_sink: SinkKind,
}

#[derive(Error, Debug)]
#[error("invalid metric sink {0:?}, expected \"emf\" or \"api\"")]
pub struct InvalidSinkKind(String);

/// How backup metrics reach CloudWatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// Embedded metric format documents on stdout, extracted from the function's logs.
    Emf,
    /// Direct PutMetricData calls.
    Api,
}

impl FromStr for SinkKind {
    type Err = InvalidSinkKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "emf" => Ok(SinkKind::Emf),
            "api" => Ok(SinkKind::Api),
            _ => Err(InvalidSinkKind(s.to_owned())),
        }
    }
}
