//! spendwise-finance: caller-side handling of parsed transaction candidates
//! (record drafting and detection notices).

pub mod notice;
pub mod record;

pub use notice::{detection_notice, Notice, Notifier, TracingNotifier};
pub use record::{draft_record, parse_manual_amount, DraftError, RecordCategory, RecordDraft, RecordKind};
