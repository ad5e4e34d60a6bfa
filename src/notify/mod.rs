//! Async notification pipeline: event shape, notifier/callback registry,
//! and the retrying delivery workers.

mod event;
mod pipeline;
mod registry;

pub use event::NotificationEvent;
pub use pipeline::NotificationPipeline;
pub use registry::{NotifierRegistry, NotifyCallback};
