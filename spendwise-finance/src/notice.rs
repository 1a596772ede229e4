//! Human-readable status for a parse attempt, and the seam through which a
//! caller surfaces it. The parser itself never notifies.

use serde::Serialize;
use spendwise_ingest::TransactionCandidate;
use tracing::info;

/// Currency symbol used in notice bodies
pub const CURRENCY_SYMBOL: &str = "₹";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub body: String,
}

/// Anything that can show a titled message to the user.
pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

/// Emits notices as `tracing` info events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        info!(title = %notice.title, "{}", notice.body);
    }
}

/// Notice for a parse result (`None` means no transaction was found).
pub fn detection_notice(candidate: Option<&TransactionCandidate>) -> Notice {
    match candidate {
        Some(c) => {
            let body = match c.amount {
                // Trailing zeros dropped: "₹500", "₹1250.5".
                Some(amount) => format!(
                    "{} {CURRENCY_SYMBOL}{}",
                    c.direction.verb(),
                    amount.normalize()
                ),
                None => c.direction.verb().to_string(),
            };
            Notice {
                title: "Transaction detected".to_string(),
                body,
            }
        }
        None => Notice {
            title: "No transaction found".to_string(),
            body: "Message did not contain debit/credit keywords".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendwise_ingest::parse_transaction_message;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingNotifier {
        seen: RefCell<Vec<Notice>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: &Notice) {
            self.seen.borrow_mut().push(notice.clone());
        }
    }

    #[test]
    fn test_detected_notice_includes_amount() {
        let c = parse_transaction_message("Rs 500 debited").unwrap();
        let notice = detection_notice(Some(&c));
        assert_eq!(notice.title, "Transaction detected");
        assert_eq!(notice.body, "Debited ₹500");
    }

    #[test]
    fn test_detected_notice_keeps_significant_decimals() {
        let c = parse_transaction_message("₹1,250.50 sent to Metro Mart").unwrap();
        assert_eq!(detection_notice(Some(&c)).body, "Debited ₹1250.5");
    }

    #[test]
    fn test_detected_notice_without_amount() {
        let c = parse_transaction_message("received from John").unwrap();
        assert_eq!(detection_notice(Some(&c)).body, "Credited");
    }

    #[test]
    fn test_no_match_notice() {
        let notice = detection_notice(parse_transaction_message("hello there").as_ref());
        assert_eq!(notice.title, "No transaction found");
        assert_eq!(notice.body, "Message did not contain debit/credit keywords");
    }

    #[test]
    fn test_notifier_receives_notice() {
        let notifier = RecordingNotifier::default();
        let c = parse_transaction_message("INR 20 credited").unwrap();
        notifier.notify(&detection_notice(Some(&c)));
        TracingNotifier.notify(&detection_notice(None));

        let seen = notifier.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].body, "Credited ₹20");
    }
}
