use std::str::FromStr;

use envconfig::Envconfig;

/// Identity of the backup metric, shared by the ingestion and alarm functions.
#[derive(Envconfig, Clone, Debug)]
pub struct MetricConfig {
    #[envconfig(from = "METRICS_NAMESPACE")]
    pub namespace: NonEmptyString,

    #[envconfig(from = "METRIC_NAME")]
    pub metric_name: NonEmptyString,

    #[envconfig(from = "DIMENSION_NAME")]
    pub dimension_name: NonEmptyString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyString(pub String);

impl NonEmptyString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct StringIsEmptyError;

impl FromStr for NonEmptyString {
    type Err = StringIsEmptyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            Err(StringIsEmptyError)
        } else {
            Ok(NonEmptyString(s.to_owned()))
        }
    }
}
