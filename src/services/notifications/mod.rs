//! Notification system with pluggable sinks.
//!
//! The core trait `NotificationSink` allows outcome notifications to be
//! delivered to a terminal, the log or an in-process channel.

mod broadcast_provider;
mod log_provider;
mod provider;

pub mod notification_service;

pub use broadcast_provider::BroadcastNotifier;
pub use log_provider::LogNotifier;
pub use notification_service::NotificationService;
pub use provider::{Notification, NotificationSink, Severity};
