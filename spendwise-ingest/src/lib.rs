//! spendwise-ingest: heuristic parsing of free-text bank notifications
//! (SMS / email) into transaction candidates.

pub mod config;
pub mod parsers;
pub mod rules;
pub mod types;

pub use config::{ConfigError, ParserConfig};
pub use parsers::{default_parser, parse_transaction_message, MessageParser};
pub use types::{Direction, TransactionCandidate};
