use async_trait::async_trait;

use crate::error::Error;

/// Routes every object-created event of a bucket to one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketNotification {
    pub bucket: String,
    pub id: String,
    pub function_arn: String,
}

#[async_trait]
pub trait NotificationBackend: Send + Sync {
    /// Replace the bucket's notification configuration with `notification`.
    async fn put_bucket_notification(&self, notification: &BucketNotification)
        -> Result<(), Error>;
}
