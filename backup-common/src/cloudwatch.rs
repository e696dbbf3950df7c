use async_trait::async_trait;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{
    ComparisonOperator, Dimension, MetricDatum, StandardUnit, Statistic,
};
use aws_sdk_cloudwatch::Client as CloudWatchSdkClient;
use tracing::{debug, error};

use crate::alarms::{AlarmBackend, AlarmSpec};
use crate::error::Error;
use crate::metrics::{MetricCatalog, MetricEntry, MetricPoint, MetricSink};

/// Missing datapoints count as a breach: a system that stops uploading must still alarm.
const TREAT_MISSING_DATA: &str = "breaching";

// We wrap the cloudwatch client so the functions only see the traits, which the memory backend
// also implements for tests.
#[derive(Clone)]
pub struct CloudWatchImpl {
    client: CloudWatchSdkClient,
}

impl CloudWatchImpl {
    pub fn new(client: CloudWatchSdkClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetricSink for CloudWatchImpl {
    async fn put(&self, point: &MetricPoint) -> Result<(), Error> {
        let timestamp_ms = point.timestamp.unix_timestamp_nanos() / 1_000_000;
        let datum = MetricDatum::builder()
            .metric_name(&point.metric_name)
            .dimensions(
                Dimension::builder()
                    .name(&point.dimension_name)
                    .value(&point.dimension_value)
                    .build(),
            )
            .value(point.value)
            .unit(StandardUnit::Count)
            .timestamp(DateTime::from_millis(timestamp_ms as i64))
            .build();

        self.client
            .put_metric_data()
            .namespace(&point.namespace)
            .metric_data(datum)
            .send()
            .await
            .map_err(|e| {
                error!(
                    system = %point.dimension_value,
                    "failed to put metric data: {}",
                    DisplayErrorContext(&e)
                );
                Error::backend("put_metric_data", DisplayErrorContext(e))
            })?;

        Ok(())
    }
}

#[async_trait]
impl MetricCatalog for CloudWatchImpl {
    async fn list_metrics(
        &self,
        namespace: &str,
        metric_name: &str,
    ) -> Result<Vec<MetricEntry>, Error> {
        let mut pages = self
            .client
            .list_metrics()
            .namespace(namespace)
            .metric_name(metric_name)
            .into_paginator()
            .send();

        let mut entries = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                error!("failed to list metrics: {}", DisplayErrorContext(&e));
                Error::backend("list_metrics", DisplayErrorContext(e))
            })?;

            for metric in page.metrics() {
                let dimensions = metric
                    .dimensions()
                    .iter()
                    .filter_map(|d| match (d.name(), d.value()) {
                        (Some(name), Some(value)) => Some((name.to_owned(), value.to_owned())),
                        _ => None,
                    })
                    .collect();
                entries.push(MetricEntry { dimensions });
            }
        }

        debug!(namespace, metric_name, count = entries.len(), "listed metrics");
        Ok(entries)
    }
}

#[async_trait]
impl AlarmBackend for CloudWatchImpl {
    async fn put_alarm(&self, alarm: &AlarmSpec) -> Result<(), Error> {
        self.client
            .put_metric_alarm()
            .alarm_name(&alarm.name)
            .alarm_description(&alarm.description)
            .namespace(&alarm.namespace)
            .metric_name(&alarm.metric_name)
            .dimensions(
                Dimension::builder()
                    .name(&alarm.dimension_name)
                    .value(&alarm.dimension_value)
                    .build(),
            )
            .period(alarm.period_secs)
            .evaluation_periods(alarm.evaluation_periods)
            .statistic(Statistic::Sum)
            .threshold(alarm.threshold)
            .comparison_operator(ComparisonOperator::LessThanThreshold)
            .treat_missing_data(TREAT_MISSING_DATA)
            .set_alarm_actions(Some(alarm.alarm_actions.clone()))
            .send()
            .await
            .map_err(|e| Error::backend("put_metric_alarm", DisplayErrorContext(e)))?;

        Ok(())
    }
}
