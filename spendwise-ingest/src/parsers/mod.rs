pub mod message;

pub use message::{default_parser, parse_transaction_message, MessageParser};
