//! Watches one fragment of a web page and fires a webhook when it changes.
//!
//! Each invocation fetches the page, extracts the first element matching a
//! CSS selector, fingerprints it with SHA-1 and compares the result with the
//! digest saved by the previous run. Scheduling is left to cron or a timer.

pub mod config;
pub mod detector;
pub mod digest;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod notify;
pub mod state;
pub mod worker;

pub use config::Config;
pub use digest::Digest;
pub use error::Error;
pub use notify::NotificationEvent;
pub use worker::{Monitor, RunOutcome};
