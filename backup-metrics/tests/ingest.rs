use std::collections::HashMap;

use aws_lambda_events::event::s3::S3Event;
use backup_common::memory::MemoryBackend;
use backup_common::metrics::MetricCatalog;
use backup_common::{Error, EventError};
use backup_metrics::config::Config;
use backup_metrics::handler::handle_upload;
use envconfig::Envconfig;
use serde_json::json;

fn config(segment_index: usize) -> Config {
    let env: HashMap<String, String> = [
        ("METRICS_NAMESPACE", "BackupsMonitoring".to_owned()),
        ("METRIC_NAME", "Backups".to_owned()),
        ("DIMENSION_NAME", "System".to_owned()),
        ("SYSTEM_SEGMENT_INDEX", segment_index.to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v))
    .collect();
    Config::init_from_hashmap(&env).unwrap()
}

fn upload_event(key: &str) -> S3Event {
    serde_json::from_value(json!({
        "Records": [{
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "awsRegion": "eu-west-1",
            "eventTime": "2024-01-01T00:00:00.000Z",
            "eventName": "ObjectCreated:Put",
            "userIdentity": { "principalId": "EXAMPLE" },
            "requestParameters": { "sourceIPAddress": "127.0.0.1" },
            "responseElements": {},
            "s3": {
                "s3SchemaVersion": "1.0",
                "configurationId": "CustomMetricsFunction",
                "bucket": {
                    "name": "backups",
                    "ownerIdentity": { "principalId": "EXAMPLE" },
                    "arn": "arn:aws:s3:::backups"
                },
                "object": { "key": key, "size": 1024, "eTag": "abc", "sequencer": "0A1B" }
            }
        }]
    }))
    .unwrap()
}

#[tokio::test]
async fn test_upload_emits_one_count_for_the_system() {
    let backend = MemoryBackend::new();

    let system = handle_upload(
        &config(0),
        &backend,
        &upload_event("acme-corp/2024-01-01/db.bak"),
    )
    .await
    .unwrap();

    assert_eq!(system.as_str(), "acme-corp");
    let points = backend.points();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].namespace, "BackupsMonitoring");
    assert_eq!(points[0].metric_name, "Backups");
    assert_eq!(points[0].dimension_name, "System");
    assert_eq!(points[0].dimension_value, "acme-corp");
    assert_eq!(points[0].value, 1.0);
}

#[tokio::test]
async fn test_encoded_key_with_second_segment() {
    let backend = MemoryBackend::new();

    let system = handle_upload(
        &config(1),
        &backend,
        &upload_event("backups%2Fteam-x%2Ffile.tar"),
    )
    .await
    .unwrap();

    assert_eq!(system.as_str(), "team-x");
    assert_eq!(backend.points()[0].dimension_value, "team-x");
}

#[tokio::test]
async fn test_last_segment_can_name_the_system() {
    let backend = MemoryBackend::new();

    let system = handle_upload(&config(1), &backend, &upload_event("backups%2Fteam-x"))
        .await
        .unwrap();

    assert_eq!(system.as_str(), "team-x");
    assert_eq!(backend.points()[0].dimension_value, "team-x");
}

#[tokio::test]
async fn test_invalid_keys_emit_nothing() {
    let backend = MemoryBackend::new();

    for key in ["", "db.bak", "/db.bak"] {
        let result = handle_upload(&config(0), &backend, &upload_event(key)).await;
        assert!(
            matches!(result, Err(Error::InvalidEvent(_))),
            "key {key:?} should be rejected"
        );
    }

    assert!(backend.points().is_empty());
}

#[tokio::test]
async fn test_event_without_records_is_rejected() {
    let backend = MemoryBackend::new();
    let event: S3Event = serde_json::from_value(json!({ "Records": [] })).unwrap();

    let result = handle_upload(&config(0), &backend, &event).await;

    assert!(matches!(
        result,
        Err(Error::InvalidEvent(EventError::NoRecords))
    ));
    assert!(backend.points().is_empty());
}

#[tokio::test]
async fn test_backend_failure_is_surfaced() {
    let backend = MemoryBackend::new();
    backend.set_unavailable(true);

    let result = handle_upload(&config(0), &backend, &upload_event("acme-corp/db.bak")).await;

    assert!(matches!(result, Err(Error::BackendUnavailable { .. })));
}

#[tokio::test]
async fn test_uploads_are_listed_by_system() {
    let backend = MemoryBackend::new();
    for key in ["acme-corp/a.bak", "acme-corp/b.bak", "team-x/c.bak"] {
        handle_upload(&config(0), &backend, &upload_event(key))
            .await
            .unwrap();
    }

    let entries = backend
        .list_metrics("BackupsMonitoring", "Backups")
        .await
        .unwrap();
    let systems: Vec<_> = entries
        .iter()
        .filter_map(|e| e.dimension("System"))
        .collect();
    assert_eq!(systems, vec!["acme-corp", "acme-corp", "team-x"]);
}
