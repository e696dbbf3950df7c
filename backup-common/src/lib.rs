pub mod alarms;
pub mod cloudwatch;
pub mod config;
pub mod error;
pub mod logging;
pub mod memory;
pub mod metrics;
pub mod notifications;
pub mod object_key;
pub mod s3;

pub use error::{Error, EventError};
pub use logging::setup_tracing;
pub use object_key::SystemId;
