//! Rule tables for free-text transaction messages.
//!
//! Every table is ordered: earlier entries take precedence. Patterns are
//! matched against the whitespace-normalized message.

use chrono::NaiveDate;
use regex::Captures;

use crate::types::Direction;

/// Whole-word, case-insensitive keywords marking money leaving the account.
pub const DEBIT_KEYWORDS: &[&str] = &["sent", "debited", "dr", "withdrawn", "paid"];

/// Whole-word, case-insensitive keywords marking money entering the account.
pub const CREDIT_KEYWORDS: &[&str] = &["received", "credited", "cr", "deposit"];

/// Direction used when a message carries both debit and credit keywords.
pub const TIE_BREAK: Direction = Direction::Debit;

/// Currency markers allowed right before a numeral: `₹`, `Rs`, `Rs.`, `INR`.
pub const PREFIX_CURRENCY_MARKERS: &[&str] = &[r"₹", r"\bRs\.?", r"\bINR"];

/// Currency markers allowed right after a numeral.
pub const SUFFIX_CURRENCY_MARKERS: &[&str] = &[r"₹", r"Rs\b\.?", r"INR\b"];

/// Digits with optional comma grouping and at most two decimals.
pub const NUMERAL: &str = r"\d(?:[\d,]*\d)?(?:\.\d{1,2})?";

/// Decimal places kept on every extracted amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Century added to two-digit years. No pivot: `99` becomes 2099.
pub const TWO_DIGIT_YEAR_BASE: i32 = 2000;

/// Bank names recognised anywhere in the text as a last-resort counterparty.
pub const KNOWN_BANKS: &[&str] = &[
    "kotak bank",
    "kotak",
    "airtel payments bank",
    "airtel",
    "uco bank",
    "uco",
];

/// Vendor text following a trigger phrase: 2-80 chars without `, . ; @`.
pub const VENDOR_SPAN: &str = r"([^,.;@\n]{2,80})";

/// Words that start reference boilerplate; the vendor is cut at the first
/// one. `upi ref` is covered by `upi`.
pub const VENDOR_STOP_WORDS: &[&str] = &["on", "upi", "ref"];

pub const VENDOR_MAX_CHARS: usize = 40;
pub const ELLIPSIS: &str = "...";

/// Normalized messages longer than this are cut before matching.
pub const MAX_INPUT_BYTES: usize = 4096;

/// Amount rules in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountRule {
    /// First numeral with a currency marker on either side.
    CurrencyMarked,
    /// First numeral starting on a word boundary.
    Bare,
}

pub const AMOUNT_RULES: &[AmountRule] = &[AmountRule::CurrencyMarked, AmountRule::Bare];

impl AmountRule {
    pub fn name(&self) -> &'static str {
        match self {
            AmountRule::CurrencyMarked => "currency-marked",
            AmountRule::Bare => "bare",
        }
    }

    /// Regex source. The numeral is captured as `num` (bare), or as `pre` /
    /// `post` depending on which side the marker sits.
    pub fn pattern(&self) -> String {
        match self {
            AmountRule::CurrencyMarked => format!(
                r"(?i)(?:{prefix})\s*(?P<pre>{num})|(?P<post>{num})\s*(?:{suffix})",
                prefix = PREFIX_CURRENCY_MARKERS.join("|"),
                suffix = SUFFIX_CURRENCY_MARKERS.join("|"),
                num = NUMERAL,
            ),
            AmountRule::Bare => format!(r"\b(?P<num>{NUMERAL})"),
        }
    }
}

/// Field order of a date shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLayout {
    YearMonthDay,
    DayMonthYear,
    /// Two-digit year, expanded with the configured century base.
    DayMonthShortYear,
}

impl DateLayout {
    /// Build a date from the three participating groups, or `None` when the
    /// numbers do not form a real calendar date. Patterns with one branch per
    /// separator only ever fill one branch's groups.
    pub fn to_date(&self, caps: &Captures<'_>, year_base: i32) -> Option<NaiveDate> {
        let parts: Vec<&str> = caps.iter().skip(1).flatten().map(|m| m.as_str()).collect();
        let [first, m, last] = parts.as_slice() else {
            return None;
        };
        let (y, d) = match self {
            DateLayout::YearMonthDay => (first, last),
            DateLayout::DayMonthYear | DateLayout::DayMonthShortYear => (last, first),
        };

        let mut year: i32 = y.parse().ok()?;
        if *self == DateLayout::DayMonthShortYear {
            year = year.checked_add(year_base)?;
        }
        NaiveDate::from_ymd_opt(year, m.parse().ok()?, d.parse().ok()?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRule {
    pub name: &'static str,
    pub pattern: &'static str,
    pub layout: DateLayout,
}

/// Date shapes in precedence order. Both separators of a date must agree.
pub const DATE_RULES: &[DateRule] = &[
    DateRule {
        name: "iso",
        pattern: r"\b(\d{4})-(\d{2})-(\d{2})\b",
        layout: DateLayout::YearMonthDay,
    },
    DateRule {
        name: "day-month-year",
        pattern: r"\b(\d{1,2})-(\d{1,2})-(\d{4})\b|\b(\d{1,2})/(\d{1,2})/(\d{4})\b",
        layout: DateLayout::DayMonthYear,
    },
    DateRule {
        name: "day-month-short-year",
        pattern: r"\b(\d{1,2})-(\d{1,2})-(\d{2})\b|\b(\d{1,2})/(\d{1,2})/(\d{2})\b",
        layout: DateLayout::DayMonthShortYear,
    },
];

/// What a counterparty rule looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorTrigger {
    /// Capture the vendor span after this phrase.
    Phrase(&'static str),
    /// Capture one of the configured bank names, wherever it appears.
    KnownBank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorRule {
    pub name: &'static str,
    pub trigger: VendorTrigger,
    /// Rule only applies when the message carries a keyword of this class,
    /// whichever direction the message finally resolves to.
    pub requires: Option<Direction>,
}

/// Counterparty rules in precedence order.
pub const VENDOR_RULES: &[VendorRule] = &[
    VendorRule {
        name: "debit-to",
        trigger: VendorTrigger::Phrase("to"),
        requires: Some(Direction::Debit),
    },
    VendorRule {
        name: "credit-from",
        trigger: VendorTrigger::Phrase("from"),
        requires: Some(Direction::Credit),
    },
    VendorRule {
        name: "in-your",
        trigger: VendorTrigger::Phrase("in your"),
        requires: None,
    },
    VendorRule {
        name: "known-bank",
        trigger: VendorTrigger::KnownBank,
        requires: None,
    },
];

/// Which keyword classes a message contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordHits {
    pub debit: bool,
    pub credit: bool,
}

impl KeywordHits {
    pub fn has(&self, class: Direction) -> bool {
        match class {
            Direction::Debit => self.debit,
            Direction::Credit => self.credit,
        }
    }
}

impl VendorRule {
    pub fn applies_to(&self, hits: KeywordHits) -> bool {
        self.requires.is_none_or(|class| hits.has(class))
    }
}

/// Case-insensitive whole-word alternation over literal words.
pub fn word_alternation(words: &[String]) -> String {
    let escaped: Vec<String> = words
        .iter()
        .map(|w| {
            w.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();
    format!(r"(?i)\b(?:{})\b", escaped.join("|"))
}

/// Regex source for a phrase-triggered vendor span.
pub fn phrase_pattern(phrase: &str) -> String {
    let phrase = phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    format!(r"(?i)\b{phrase}\b\s+{VENDOR_SPAN}")
}

/// Regex source capturing any of `banks`, longest name first so that
/// "kotak bank" wins over "kotak".
pub fn known_bank_pattern(banks: &[String]) -> String {
    let mut sorted: Vec<&String> = banks.iter().collect();
    sorted.sort_by_key(|b| std::cmp::Reverse(b.len()));
    let escaped: Vec<String> = sorted
        .iter()
        .map(|b| {
            b.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .collect();
    format!(r"(?i)\b({})\b", escaped.join("|"))
}

/// Regex source matching the first stop word and everything after it.
pub fn stop_words_pattern() -> String {
    format!(r"(?i)\b(?:{})\b.*$", VENDOR_STOP_WORDS.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_word_alternation_is_whole_word() {
        let re = Regex::new(&word_alternation(&strings(DEBIT_KEYWORDS))).unwrap();
        assert!(re.is_match("Amount DEBITED today"));
        assert!(re.is_match("Dr. card 1234"));
        assert!(!re.is_match("Dear customer, your address is updated"));
        assert!(!re.is_match("unpaid invoice"));
    }

    #[test]
    fn test_currency_marked_prefers_leftmost_marker() {
        let re = Regex::new(&AmountRule::CurrencyMarked.pattern()).unwrap();
        let caps = re.captures("A/c 5521 debited INR 1,200.00 and Rs 50").unwrap();
        assert_eq!(caps.name("pre").unwrap().as_str(), "1,200.00");

        let caps = re.captures("750 INR received").unwrap();
        assert_eq!(caps.name("post").unwrap().as_str(), "750");
    }

    #[test]
    fn test_currency_marked_ignores_words_starting_with_rs() {
        let re = Regex::new(&AmountRule::CurrencyMarked.pattern()).unwrap();
        assert!(re.captures("paid hrs 40").is_none());
    }

    #[test]
    fn test_bare_numeral_skips_glued_digits() {
        let re = Regex::new(&AmountRule::Bare.pattern()).unwrap();
        let caps = re.captures("A/c XX1234 debited 300").unwrap();
        assert_eq!(caps.name("num").unwrap().as_str(), "300");
    }

    #[test]
    fn test_date_layouts() {
        let iso = Regex::new(DATE_RULES[0].pattern).unwrap();
        let caps = iso.captures("on 2024-06-05").unwrap();
        assert_eq!(
            DATE_RULES[0].layout.to_date(&caps, TWO_DIGIT_YEAR_BASE),
            NaiveDate::from_ymd_opt(2024, 6, 5)
        );

        let short = Regex::new(DATE_RULES[2].pattern).unwrap();
        let caps = short.captures("on 5/6/99").unwrap();
        assert_eq!(
            DATE_RULES[2].layout.to_date(&caps, TWO_DIGIT_YEAR_BASE),
            NaiveDate::from_ymd_opt(2099, 6, 5)
        );
    }

    #[test]
    fn test_invalid_calendar_date_is_rejected() {
        let re = Regex::new(DATE_RULES[1].pattern).unwrap();
        let caps = re.captures("31-02-2024").unwrap();
        assert_eq!(DATE_RULES[1].layout.to_date(&caps, TWO_DIGIT_YEAR_BASE), None);
    }

    #[test]
    fn test_short_year_shape_does_not_match_inside_full_year() {
        let re = Regex::new(DATE_RULES[2].pattern).unwrap();
        assert!(re.captures("12-03-2024").is_none());
    }

    #[test]
    fn test_known_bank_pattern_prefers_longest_name() {
        let re = Regex::new(&known_bank_pattern(&strings(KNOWN_BANKS))).unwrap();
        let caps = re.captures("credited to your Kotak Bank a/c").unwrap();
        assert_eq!(&caps[1], "Kotak Bank");
        assert!(re.captures("pucon store").is_none());
    }

    #[test]
    fn test_vendor_rules_gate_on_keyword_presence() {
        let debit_only = KeywordHits { debit: true, credit: false };
        let both = KeywordHits { debit: true, credit: true };
        assert!(VENDOR_RULES[0].applies_to(debit_only));
        assert!(!VENDOR_RULES[1].applies_to(debit_only));
        assert!(VENDOR_RULES[1].applies_to(both));
        assert!(VENDOR_RULES[2].applies_to(KeywordHits::default()));
    }

    #[test]
    fn test_mixed_separators_are_not_dates() {
        for rule in &DATE_RULES[1..] {
            let re = Regex::new(rule.pattern).unwrap();
            assert!(re.captures("paid on 05-06/2024").is_none(), "{}", rule.name);
            assert!(re.captures("paid on 05/06-24").is_none(), "{}", rule.name);
        }
    }

    #[test]
    fn test_slash_branch_fills_its_own_groups() {
        let re = Regex::new(DATE_RULES[1].pattern).unwrap();
        let caps = re.captures("on 5/6/2024").unwrap();
        assert_eq!(
            DATE_RULES[1].layout.to_date(&caps, TWO_DIGIT_YEAR_BASE),
            NaiveDate::from_ymd_opt(2024, 6, 5)
        );
    }

    #[test]
    fn test_huge_year_base_does_not_overflow() {
        let re = Regex::new(DATE_RULES[2].pattern).unwrap();
        let caps = re.captures("on 05-06-24").unwrap();
        assert_eq!(DATE_RULES[2].layout.to_date(&caps, i32::MAX), None);
    }
}
