use std::fmt;

use aws_lambda_events::event::s3::S3Event;
use percent_encoding::percent_decode_str;

use crate::error::EventError;

/// Logical name of a backup-producing system, taken from a segment of an object key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SystemId(String);

impl SystemId {
    pub fn new(value: impl Into<String>) -> Result<Self, EventError> {
        let value = value.into();
        if value.is_empty() {
            return Err(EventError::EmptySystem);
        }
        Ok(SystemId(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the raw key of the first record in an upload notification.
///
/// Only the first record is consumed, additional records are ignored.
pub fn first_object_key(event: &S3Event) -> Result<&str, EventError> {
    let record = event.records.first().ok_or(EventError::NoRecords)?;
    record
        .s3
        .object
        .key
        .as_deref()
        .ok_or(EventError::MissingKey)
}

/// Decodes an object key as delivered in an upload notification.
///
/// Keys can arrive encoded twice. The first pass is a plain percent-decode, the second treats
/// `+` as a space before percent-decoding again.
pub fn decode_key(raw: &str) -> Result<String, EventError> {
    let once = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|e| EventError::NotUtf8(e.to_string()))?;
    let plus_as_space = once.replace('+', " ");
    let twice = percent_decode_str(&plus_as_space)
        .decode_utf8()
        .map_err(|e| EventError::NotUtf8(e.to_string()))?;

    Ok(twice.into_owned())
}

/// Extracts the system identifier at `index` from a decoded key.
///
/// The key must contain at least one '/' and at least `index + 1` segments. An empty segment is
/// rejected.
pub fn system_id(decoded: &str, index: usize) -> Result<SystemId, EventError> {
    if decoded.is_empty() {
        return Err(EventError::EmptyKey);
    }

    let segments: Vec<&str> = decoded.split('/').collect();
    if segments.len() < 2 || index >= segments.len() {
        return Err(EventError::MissingSegment {
            key: decoded.to_owned(),
            index,
        });
    }

    let segment = segments[index];
    if segment.is_empty() {
        return Err(EventError::EmptySegment {
            key: decoded.to_owned(),
            index,
        });
    }

    Ok(SystemId(segment.to_owned()))
}

/// Decodes the first key of `event` and derives its system identifier.
pub fn system_from_event(event: &S3Event, index: usize) -> Result<(String, SystemId), EventError> {
    let decoded = decode_key(first_object_key(event)?)?;
    let system = system_id(&decoded, index)?;
    Ok((decoded, system))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn event_with_keys(keys: &[&str]) -> S3Event {
        let records: Vec<_> = keys
            .iter()
            .map(|key| {
                json!({
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
                })
            })
            .collect();

        serde_json::from_value(json!({ "Records": records })).unwrap()
    }

    #[test]
    fn test_plain_key_is_unchanged() {
        assert_eq!(
            decode_key("acme-corp/2024-01-01/db.bak").unwrap(),
            "acme-corp/2024-01-01/db.bak"
        );
    }

    #[test]
    fn test_encoded_slashes_are_decoded() {
        let decoded = decode_key("backups%2Fteam-x%2Ffile.tar").unwrap();
        assert_eq!(decoded, "backups/team-x/file.tar");
        assert_eq!(system_id(&decoded, 1).unwrap().as_str(), "team-x");
    }

    #[test]
    fn test_double_encoded_key() {
        // %252F -> %2F -> /
        assert_eq!(
            decode_key("acme%252Fnightly%252Fdump.sql").unwrap(),
            "acme/nightly/dump.sql"
        );
    }

    #[test]
    fn test_plus_becomes_space() {
        assert_eq!(
            decode_key("finance+team/2024/ledger.bak").unwrap(),
            "finance team/2024/ledger.bak"
        );
        // An encoded plus survives the first pass as '+' and turns into a space on the second.
        assert_eq!(decode_key("a%2Bb/file").unwrap(), "a b/file");
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        assert!(matches!(decode_key("bad%FF/file"), Err(EventError::NotUtf8(_))));
    }

    #[test]
    fn test_system_id_segment_zero() {
        let system = system_id("acme-corp/2024-01-01/db.bak", 0).unwrap();
        assert_eq!(system.as_str(), "acme-corp");
    }

    #[test]
    fn test_empty_key_is_rejected() {
        assert_eq!(system_id("", 0), Err(EventError::EmptyKey));
    }

    #[test]
    fn test_key_without_separator_is_rejected() {
        assert!(matches!(
            system_id("db.bak", 0),
            Err(EventError::MissingSegment { index: 0, .. })
        ));
    }

    #[test]
    fn test_last_segment_can_be_the_system() {
        assert_eq!(system_id("backups/team-x", 1).unwrap().as_str(), "team-x");
        assert_eq!(system_id("backups/db.bak", 1).unwrap().as_str(), "db.bak");
    }

    #[test]
    fn test_too_few_segments_for_index() {
        assert!(matches!(
            system_id("backups/team-x", 2),
            Err(EventError::MissingSegment { index: 2, .. })
        ));
    }

    #[test]
    fn test_empty_system_id_is_rejected() {
        assert_eq!(SystemId::new(""), Err(EventError::EmptySystem));
        assert_eq!(SystemId::new("acme-corp").unwrap().as_str(), "acme-corp");
    }

    #[test]
    fn test_empty_segment_is_rejected() {
        assert!(matches!(
            system_id("/db.bak", 0),
            Err(EventError::EmptySegment { index: 0, .. })
        ));
        assert!(matches!(
            system_id("backups//db.bak", 1),
            Err(EventError::EmptySegment { index: 1, .. })
        ));
    }

    #[test]
    fn test_system_from_event_uses_first_record() {
        let event = event_with_keys(&["acme-corp/full.bak", "other/full.bak"]);
        let (decoded, system) = system_from_event(&event, 0).unwrap();

        assert_eq!(decoded, "acme-corp/full.bak");
        assert_eq!(system.as_str(), "acme-corp");
    }

    #[test]
    fn test_system_from_event_without_records() {
        let event = event_with_keys(&[]);
        assert_eq!(system_from_event(&event, 0), Err(EventError::NoRecords));
    }
}
