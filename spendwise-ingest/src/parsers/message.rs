//! Free-text bank notification parser (SMS / email)
//!
//! No fixed schema per bank: a message is classified by direction keywords,
//! then amount, date and counterparty are pulled out independently by the
//! ordered rules in [`crate::rules`].
//!
//! Example input:
//!   ₹1,250.50 sent to Metro Mart on 12-03-2024 via UPI ref 998877

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, trace};

use crate::config::{ConfigError, ParserConfig};
use crate::rules::{
    self, AmountRule, DateLayout, KeywordHits, VendorRule, VendorTrigger, AMOUNT_RULES,
    AMOUNT_SCALE, DATE_RULES, ELLIPSIS, VENDOR_RULES,
};
use crate::types::{Direction, TransactionCandidate};

static DEFAULT_PARSER: LazyLock<MessageParser> = LazyLock::new(|| {
    MessageParser::new(ParserConfig::default()).expect("built-in rule tables compile")
});

/// Shared parser built from the default rule tables.
pub fn default_parser() -> &'static MessageParser {
    &DEFAULT_PARSER
}

/// Parse a message with the default rules.
///
/// Returns `None` when the text is blank or carries no debit/credit keyword.
pub fn parse_transaction_message(text: &str) -> Option<TransactionCandidate> {
    DEFAULT_PARSER.parse(text)
}

struct CompiledAmountRule {
    rule: AmountRule,
    re: Regex,
}

struct CompiledDateRule {
    name: &'static str,
    layout: DateLayout,
    re: Regex,
}

struct CompiledVendorRule {
    rule: VendorRule,
    re: Regex,
}

/// Compiled rule set. Immutable after construction, so one instance can be
/// shared across threads.
pub struct MessageParser {
    config: ParserConfig,
    debit_re: Regex,
    credit_re: Regex,
    amount_rules: Vec<CompiledAmountRule>,
    date_rules: Vec<CompiledDateRule>,
    vendor_rules: Vec<CompiledVendorRule>,
    stop_words_re: Regex,
}

impl MessageParser {
    pub fn new(config: ParserConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let debit_re = Regex::new(&rules::word_alternation(&non_blank(&config.debit_keywords)))?;
        let credit_re = Regex::new(&rules::word_alternation(&non_blank(&config.credit_keywords)))?;

        let amount_rules = AMOUNT_RULES
            .iter()
            .map(|rule| -> Result<_, ConfigError> {
                Ok(CompiledAmountRule {
                    rule: *rule,
                    re: Regex::new(&rule.pattern())?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let date_rules = DATE_RULES
            .iter()
            .map(|rule| -> Result<_, ConfigError> {
                Ok(CompiledDateRule {
                    name: rule.name,
                    layout: rule.layout,
                    re: Regex::new(rule.pattern)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let banks = non_blank(&config.known_banks);
        let mut vendor_rules = Vec::with_capacity(VENDOR_RULES.len());
        for rule in VENDOR_RULES {
            let pattern = match rule.trigger {
                VendorTrigger::Phrase(phrase) => rules::phrase_pattern(phrase),
                // An empty alternation would match everywhere.
                VendorTrigger::KnownBank if banks.is_empty() => continue,
                VendorTrigger::KnownBank => rules::known_bank_pattern(&banks),
            };
            vendor_rules.push(CompiledVendorRule {
                rule: *rule,
                re: Regex::new(&pattern)?,
            });
        }

        Ok(Self {
            debit_re,
            credit_re,
            amount_rules,
            date_rules,
            vendor_rules,
            stop_words_re: Regex::new(&rules::stop_words_pattern())?,
            config,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse one notification into a candidate.
    ///
    /// Only the direction is required; amount, date and counterparty are
    /// `None` when their rules find nothing.
    pub fn parse(&self, text: &str) -> Option<TransactionCandidate> {
        let normalized = self.normalize(text);
        if normalized.is_empty() {
            trace!("blank input");
            return None;
        }

        let hits = self.keyword_hits(&normalized);
        let Some(direction) = self.resolve_direction(hits) else {
            debug!("no debit/credit keyword found");
            return None;
        };

        let amount = self.extract_amount(&normalized);
        let occurred_on = self.extract_date(&normalized);
        let counterparty = self.extract_counterparty(&normalized, hits);

        debug!(
            %direction,
            amount = ?amount,
            counterparty = ?counterparty,
            occurred_on = ?occurred_on,
            "transaction candidate detected"
        );

        Some(TransactionCandidate {
            raw: text.to_string(),
            direction,
            amount,
            counterparty,
            occurred_on,
        })
    }

    /// Collapse whitespace runs to one space, trim, and cap the length.
    pub fn normalize(&self, text: &str) -> String {
        let mut out = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let max = self.config.max_input_bytes;
        if out.len() > max {
            let mut cut = max;
            while !out.is_char_boundary(cut) {
                cut -= 1;
            }
            debug!(len = out.len(), cut, "input truncated before matching");
            out.truncate(cut);
            out.truncate(out.trim_end().len());
        }
        out
    }

    pub fn keyword_hits(&self, text: &str) -> KeywordHits {
        KeywordHits {
            debit: self.debit_re.is_match(text),
            credit: self.credit_re.is_match(text),
        }
    }

    pub fn detect_direction(&self, text: &str) -> Option<Direction> {
        self.resolve_direction(self.keyword_hits(text))
    }

    fn resolve_direction(&self, hits: KeywordHits) -> Option<Direction> {
        match (hits.debit, hits.credit) {
            (true, true) => {
                trace!(tie_break = %self.config.tie_break, "both debit and credit keywords");
                Some(self.config.tie_break)
            }
            (true, false) => Some(Direction::Debit),
            (false, true) => Some(Direction::Credit),
            (false, false) => None,
        }
    }

    pub fn extract_amount(&self, text: &str) -> Option<Decimal> {
        for compiled in &self.amount_rules {
            let Some(caps) = compiled.re.captures(text) else {
                continue;
            };
            let numeral = caps
                .name("pre")
                .or_else(|| caps.name("post"))
                .or_else(|| caps.name("num"))
                .map(|m| m.as_str());

            trace!(rule = compiled.rule.name(), numeral = ?numeral, "amount rule matched");
            // The first matching rule decides, even when its numeral is unusable.
            return numeral.and_then(parse_amount);
        }
        None
    }

    pub fn extract_date(&self, text: &str) -> Option<NaiveDate> {
        for compiled in &self.date_rules {
            for caps in compiled.re.captures_iter(text) {
                if let Some(date) = compiled
                    .layout
                    .to_date(&caps, self.config.two_digit_year_base)
                {
                    trace!(rule = compiled.name, %date, "date rule matched");
                    return Some(date);
                }
            }
        }
        None
    }

    /// `to` / `from` rules are gated on keyword presence, not on the resolved
    /// direction, so a tie-broken message can still name its vendor.
    pub fn extract_counterparty(&self, text: &str, hits: KeywordHits) -> Option<String> {
        for compiled in &self.vendor_rules {
            if !compiled.rule.applies_to(hits) {
                continue;
            }
            let Some(span) = compiled.re.captures(text).and_then(|c| c.get(1)) else {
                continue;
            };
            if let Some(vendor) = self.clean_vendor(span.as_str()) {
                trace!(rule = compiled.rule.name, %vendor, "counterparty rule matched");
                return Some(vendor);
            }
        }
        None
    }

    /// Drop trailing reference boilerplate, then cap the length.
    fn clean_vendor(&self, span: &str) -> Option<String> {
        let stripped = self.stop_words_re.replace(span.trim(), "");
        let vendor = stripped.trim();
        if vendor.is_empty() {
            return None;
        }
        Some(truncate_label(vendor, self.config.vendor_max_chars))
    }
}

/// Strip separators and parse. Anything unparseable is "no amount".
fn parse_amount(numeral: &str) -> Option<Decimal> {
    let digits = numeral.replace(',', "");
    let mut value = Decimal::from_str(&digits).ok()?;
    if value.is_sign_negative() {
        return None;
    }
    value.rescale(AMOUNT_SCALE);
    // rescale silently keeps a smaller scale near the 28-digit limit.
    if value.scale() != AMOUNT_SCALE {
        return None;
    }
    Some(value)
}

fn truncate_label(label: &str, max_chars: usize) -> String {
    match label.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}{}", &label[..idx], ELLIPSIS),
        None => label.to_string(),
    }
}

fn non_blank(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}
