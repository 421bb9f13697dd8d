//! Delivery of stock alerts.
//!
//! The scheduler only knows the [`Notifier`] trait; the concrete sinks are a
//! Discord channel over REST, a JSON-lines artifact file, and the log.

pub mod alert;
pub mod artifact;
pub mod discord;
pub mod error;
pub mod log;

use async_trait::async_trait;
use stockwatch_core::{Destination, MonitorSpec, StockVerdict};

pub use alert::{Alert, Announcement};
pub use artifact::ArtifactNotifier;
pub use discord::DiscordNotifier;
pub use error::NotifyError;
pub use log::LogNotifier;

/// A place stock alerts can be delivered to.
///
/// Implementations must be cheap to share across monitor tasks; the
/// scheduler holds them behind an `Arc<dyn Notifier>`.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers an in-stock alert for `spec` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the alert could not be delivered. Callers
    /// log it and carry on; nothing is retried.
    async fn notify(
        &self,
        destination: &Destination,
        verdict: &StockVerdict,
        spec: &MonitorSpec,
    ) -> Result<(), NotifyError>;

    /// Posts a one-time "now watching" message. Sinks without a notion of
    /// removable messages return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the message could not be created.
    async fn announce(
        &self,
        _destination: &Destination,
        _spec: &MonitorSpec,
    ) -> Result<Option<Announcement>, NotifyError> {
        Ok(None)
    }

    /// Removes a message previously returned by [`Notifier::announce`].
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the message could not be removed.
    async fn retract(&self, _announcement: &Announcement) -> Result<(), NotifyError> {
        Ok(())
    }
}
