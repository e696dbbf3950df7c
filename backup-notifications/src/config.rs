use backup_common::config::NonEmptyString;
use envconfig::Envconfig;

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    #[envconfig(from = "BUCKET_NAME")]
    pub bucket_name: NonEmptyString,

    #[envconfig(from = "INGEST_FUNCTION_ARN")]
    pub ingest_function_arn: NonEmptyString,

    #[envconfig(from = "NOTIFICATION_ID", default = "CustomMetricsFunction")]
    pub notification_id: NonEmptyString,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_config_from_env() {
        let env: HashMap<String, String> = [
            ("BUCKET_NAME", "backups"),
            (
                "INGEST_FUNCTION_ARN",
                "arn:aws:lambda:eu-west-1:123456789012:function:backup-metrics",
            ),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let config = Config::init_from_hashmap(&env).unwrap();

        assert_eq!(config.bucket_name.as_str(), "backups");
        assert_eq!(config.notification_id.as_str(), "CustomMetricsFunction");
    }

    #[test]
    fn test_bucket_is_required() {
        let env: HashMap<String, String> = [(
            "INGEST_FUNCTION_ARN".to_owned(),
            "arn:aws:lambda:eu-west-1:123456789012:function:backup-metrics".to_owned(),
        )]
        .into_iter()
        .collect();

        assert!(Config::init_from_hashmap(&env).is_err());
    }
}
