use async_trait::async_trait;
use stockwatch_core::{Destination, MonitorSpec, StockVerdict};

use crate::alert::Alert;
use crate::{Notifier, NotifyError};

/// Sink that only records alerts in the log. Used when posting is disabled
/// and no artifact file is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        destination: &Destination,
        verdict: &StockVerdict,
        spec: &MonitorSpec,
    ) -> Result<(), NotifyError> {
        let alert = Alert::new(spec, verdict);
        tracing::info!(
            monitor = %alert.title,
            url = %alert.url,
            price = %alert.price,
            sku = %alert.sku,
            item_type = %alert.item_type,
            destination = %destination,
            "IN STOCK (posting disabled)"
        );
        Ok(())
    }
}
