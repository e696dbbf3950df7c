use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use time::OffsetDateTime;

use crate::config::MetricConfig;
use crate::error::Error;
use crate::object_key::SystemId;

/// One count datapoint for a system.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub namespace: String,
    pub metric_name: String,
    pub dimension_name: String,
    pub dimension_value: String,
    pub value: f64,
    pub timestamp: OffsetDateTime,
}

impl MetricPoint {
    /// A count of one for `system`, stamped now.
    pub fn backup_count(config: &MetricConfig, system: &SystemId) -> Self {
        Self {
            namespace: config.namespace.as_str().to_owned(),
            metric_name: config.metric_name.as_str().to_owned(),
            dimension_name: config.dimension_name.as_str().to_owned(),
            dimension_value: system.as_str().to_owned(),
            value: 1.0,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// Render the point as a CloudWatch embedded metric format document.
    pub fn to_emf(&self) -> Value {
        let timestamp_ms = self.timestamp.unix_timestamp_nanos() / 1_000_000;

        let mut document = Map::new();
        document.insert(
            "_aws".to_owned(),
            json!({
                "Timestamp": timestamp_ms as i64,
                "CloudWatchMetrics": [{
                    "Namespace": self.namespace,
                    "Dimensions": [[self.dimension_name]],
                    "Metrics": [{ "Name": self.metric_name, "Unit": "Count" }],
                }],
            }),
        );
        document.insert(
            self.dimension_name.clone(),
            Value::String(self.dimension_value.clone()),
        );
        document.insert(self.metric_name.clone(), json!(self.value));

        Value::Object(document)
    }
}

/// A metric data point as returned by a listing: its dimension pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricEntry {
    pub dimensions: Vec<(String, String)>,
}

impl MetricEntry {
    pub fn dimension(&self, name: &str) -> Option<&str> {
        self.dimensions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Destination for backup metric points. `put` returns once the point is visible to the backend.
#[async_trait]
pub trait MetricSink: Send + Sync {
    async fn put(&self, point: &MetricPoint) -> Result<(), Error>;
}

/// Read side of the metrics store.
#[async_trait]
pub trait MetricCatalog: Send + Sync {
    /// Every metric entry recorded under `namespace` and `metric_name`.
    async fn list_metrics(
        &self,
        namespace: &str,
        metric_name: &str,
    ) -> Result<Vec<MetricEntry>, Error>;
}

/// Writes embedded metric format documents, one line per point, flushing after each.
pub struct EmfSink<W: Write + Send> {
    out: Mutex<W>,
}

impl EmfSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> EmfSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl<W: Write + Send> MetricSink for EmfSink<W> {
    async fn put(&self, point: &MetricPoint) -> Result<(), Error> {
        let line = serde_json::to_string(&point.to_emf()).map_err(|e| Error::backend("emf", e))?;

        let mut out = self.out.lock().map_err(|e| Error::backend("emf", e))?;
        writeln!(out, "{line}").map_err(|e| Error::backend("emf", e))?;
        out.flush().map_err(|e| Error::backend("emf", e))?;

        Ok(())
    }
}
