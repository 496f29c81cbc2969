//! Transfer extraction
//!
//! Pulls value-transfer records out of the event sequence during the same
//! single pass that reconstructs intervals. Any event carrying an `amount`
//! field yields one transfer; missing optional fields fall back to empty
//! strings so a partially-described event still produces a best-effort
//! record.

use crate::trace_source::{TraceEvent, Transfer};

/// Factor from source timestamps (seconds) to transfer times (milliseconds)
const TIME_SCALE: i64 = 1000;

/// Single-pass extractor of value transfers
#[derive(Debug)]
pub struct TransferExtractor {
    base_currency: String,
    transfers: Vec<Transfer>,
}

impl TransferExtractor {
    pub fn new(base_currency: impl Into<String>) -> Self {
        Self {
            base_currency: base_currency.into(),
            transfers: Vec::new(),
        }
    }

    /// Feed the next event; emits a transfer when it carries an `amount`
    ///
    /// The receiver is the event's lane. A base-currency transfer is modeled
    /// as the lane paying its caller's lane (`sender = receiver - 1`); any
    /// other token kind stays on the same lane (a self transfer).
    pub fn on_event(&mut self, event: &TraceEvent) {
        let Some(amount) = event.arg_str("amount") else {
            return;
        };

        let kind = event.arg_str("token_symbol").unwrap_or_default();
        let token_name = event.arg_str("token_name").unwrap_or_default();

        let receiver = event.lane;
        let sender = if kind == self.base_currency {
            receiver - 1
        } else {
            receiver
        };

        self.transfers.push(Transfer {
            sender,
            receiver,
            time: event.ts * TIME_SCALE,
            amount,
            kind,
            token_name,
        });
    }

    /// Finalize, yielding the transfers in arrival order
    pub fn finish(self) -> Vec<Transfer> {
        self.transfers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace_source::Phase;

    fn extract(events: &[TraceEvent]) -> Vec<Transfer> {
        let mut extractor = TransferExtractor::new("ETH");
        for event in events {
            extractor.on_event(event);
        }
        extractor.finish()
    }

    #[test]
    fn test_base_currency_pays_previous_lane() {
        let transfers = extract(&[TraceEvent::new(Phase::Other, 3, 7)
            .with_arg("amount", "1000")
            .with_arg("token_symbol", "ETH")]);

        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].receiver, 3);
        assert_eq!(transfers[0].sender, 2);
        assert_eq!(transfers[0].time, 7000);
        assert!(!transfers[0].is_self_transfer());
    }

    #[test]
    fn test_token_transfer_stays_on_lane() {
        let transfers = extract(&[TraceEvent::new(Phase::Other, 5, 1)
            .with_arg("amount", "417.25")
            .with_arg("token_symbol", "DAI")
            .with_arg("token_name", "Dai Stablecoin")]);

        assert_eq!(transfers[0].sender, 5);
        assert_eq!(transfers[0].receiver, 5);
        assert!(transfers[0].is_self_transfer());
        assert_eq!(transfers[0].amount, "417.25");
        assert_eq!(transfers[0].token_name, "Dai Stablecoin");
    }

    #[test]
    fn test_missing_optional_fields_default_empty() {
        let transfers = extract(&[TraceEvent::new(Phase::Other, 1, 0).with_arg("amount", "5")]);

        assert_eq!(transfers[0].kind, "");
        assert_eq!(transfers[0].token_name, "");
        // No symbol means not base currency, so a self transfer
        assert_eq!(transfers[0].sender, transfers[0].receiver);
    }

    #[test]
    fn test_event_without_amount_ignored() {
        let transfers = extract(&[
            TraceEvent::new(Phase::Begin, 1, 0).with_arg("token_symbol", "ETH"),
            TraceEvent::new(Phase::End, 1, 2),
        ]);
        assert!(transfers.is_empty());
    }

    #[test]
    fn test_amount_preserves_decimal_string() {
        let transfers = extract(&[
            TraceEvent::new(Phase::Other, 1, 0).with_arg("amount", "2500000000000000000")
        ]);
        assert_eq!(transfers[0].amount, "2500000000000000000");
    }
}
