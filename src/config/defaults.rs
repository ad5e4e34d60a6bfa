//! Built-in configuration defaults.

pub const ADDR: &str = "0.0.0.0:8080";
pub const ENV_ID: &str = "default";
pub const SNAPSHOT_DIR: &str = "./data";
pub const SNAPSHOT_EVERY_TICKS: u64 = 1000;
pub const LOG_LEVEL: &str = "info";

/// Notification job queue capacity before `submit` starts dropping events.
pub const NOTIFY_QUEUE_CAPACITY: usize = 1024;

/// Worker tasks draining the notification job queue.
pub const NOTIFY_WORKER_COUNT: usize = 2;
