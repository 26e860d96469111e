use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::sync::LazyLock;
use thiserror::Error;

/// Matches the three shapes that need no further splitting: "-N", "N-" and "N".
static SIMPLE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:-(?P<to>[0-9]+)|(?P<from>[0-9]+)-|(?P<page>[0-9]+))$")
        .expect("token pattern is valid")
});

/// A run of digits as typed, with its value for comparisons.
///
/// The value saturates at `u64::MAX`; messages print `digits` instead so they
/// always show the number the user entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumber<'a> {
    pub value: u64,
    /// Leading zeros removed, `"0"` if nothing else is left
    pub digits: &'a str,
}

impl<'a> PageNumber<'a> {
    fn from_digits(digits: &'a str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        PageNumber {
            value: saturating_digits(trimmed),
            digits: if trimmed.is_empty() { "0" } else { trimmed },
        }
    }
}

/// One comma-separated unit of a page specification, classified by shape.
///
/// Numbers are 1-based, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// "-N": pages 1 through N
    OpenStart { raw: &'a str, end: PageNumber<'a> },
    /// "N-": pages N through the last page
    OpenEnd { raw: &'a str, start: PageNumber<'a> },
    /// "M-N": pages M through N
    Bounded { raw: &'a str, start: i64, end: i64 },
    /// Contains a hyphen, but the halves are not both integers
    MalformedRange { raw: &'a str },
    /// "N": a single page
    Single { raw: &'a str, page: u64 },
    /// Anything else
    Invalid { raw: &'a str },
}

impl<'a> Token<'a> {
    /// Classify a token that has already had whitespace removed.
    pub fn classify(raw: &'a str) -> Self {
        if let Some(caps) = SIMPLE_TOKEN.captures(raw) {
            if let Some(end) = caps.name("to") {
                return Token::OpenStart {
                    raw,
                    end: PageNumber::from_digits(end.as_str()),
                };
            }
            if let Some(start) = caps.name("from") {
                return Token::OpenEnd {
                    raw,
                    start: PageNumber::from_digits(start.as_str()),
                };
            }
            if let Some(page) = caps.name("page") {
                return Token::Single {
                    raw,
                    page: saturating_digits(page.as_str()),
                };
            }
        }

        if let Some((start_str, end_str)) = raw.split_once('-') {
            return match (parse_integer(start_str), parse_integer(end_str)) {
                (Some(start), Some(end)) => Token::Bounded { raw, start, end },
                _ => Token::MalformedRange { raw },
            };
        }

        Token::Invalid { raw }
    }

    /// The token text exactly as it appeared in the (whitespace-stripped) input.
    pub fn raw(&self) -> &'a str {
        match *self {
            Token::OpenStart { raw, .. }
            | Token::OpenEnd { raw, .. }
            | Token::Bounded { raw, .. }
            | Token::MalformedRange { raw }
            | Token::Single { raw, .. }
            | Token::Invalid { raw } => raw,
        }
    }

    /// Validate against the document size and return the zero-based indices
    /// this token selects.
    pub fn resolve(&self, num_pages: u32) -> Result<RangeInclusive<u32>, RangeError> {
        let token = self.raw().to_string();
        let max = u64::from(num_pages);

        match *self {
            Token::OpenStart { end, .. } => {
                if end.value < 1 {
                    Err(RangeError::BelowOne { token })
                } else if end.value > max {
                    Err(RangeError::EndsPastLast {
                        token,
                        end: end.digits.to_string(),
                        num_pages,
                    })
                } else {
                    Ok(0..=(end.value - 1) as u32)
                }
            }
            Token::OpenEnd { start, .. } => {
                if start.value < 1 {
                    Err(RangeError::StartsBelowOne { token })
                } else if start.value > max {
                    Err(RangeError::StartsPastLast {
                        token,
                        start: start.digits.to_string(),
                        num_pages,
                    })
                } else {
                    Ok((start.value - 1) as u32..=num_pages - 1)
                }
            }
            Token::Bounded { start, end, .. } => {
                let max = i64::from(num_pages);
                if start < 1 || end < 1 {
                    Err(RangeError::RangeBelowOne { token })
                } else if start > max || end > max {
                    Err(RangeError::RangeOutOfBounds { token, num_pages })
                } else if start > end {
                    Err(RangeError::Inverted { token, start, end })
                } else {
                    Ok((start - 1) as u32..=(end - 1) as u32)
                }
            }
            Token::MalformedRange { .. } => Err(RangeError::MalformedRange { token }),
            Token::Single { page, .. } => {
                if page < 1 {
                    Err(RangeError::BelowOne { token })
                } else if page > max {
                    Err(RangeError::PageOutOfBounds { token, num_pages })
                } else {
                    let idx = (page - 1) as u32;
                    Ok(idx..=idx)
                }
            }
            Token::Invalid { .. } => Err(RangeError::Unrecognized { token, num_pages }),
        }
    }
}

/// A rejected token. The message always quotes the token verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("'{token}' is below 1.")]
    BelowOne { token: String },

    #[error("'{token}' starts below 1.")]
    StartsBelowOne { token: String },

    #[error("'{token}' ends at {end}, but max page is {num_pages}.")]
    EndsPastLast {
        token: String,
        end: String,
        num_pages: u32,
    },

    #[error("'{token}' starts at {start}, but max page is {num_pages}.")]
    StartsPastLast {
        token: String,
        start: String,
        num_pages: u32,
    },

    #[error("'{token}' range contains numbers < 1.")]
    RangeBelowOne { token: String },

    #[error("'{token}' range out of bounds (max page: {num_pages}).")]
    RangeOutOfBounds { token: String, num_pages: u32 },

    #[error("'{token}': start {start} greater than end {end}.")]
    Inverted { token: String, start: i64, end: i64 },

    #[error("'{token}' is malformed range.")]
    MalformedRange { token: String },

    #[error("'{token}' is out of bounds (max page: {num_pages}).")]
    PageOutOfBounds { token: String, num_pages: u32 },

    #[error("'{token}' is not valid (numbers from 1 to {num_pages} only).")]
    Unrecognized { token: String, num_pages: u32 },
}

/// Coarse classification of a [`RangeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RangeErrorCategory {
    OutOfRangeLow,
    OutOfRangeHigh,
    InvertedRange,
    MalformedRange,
    UnrecognizedToken,
}

impl RangeError {
    pub fn token(&self) -> &str {
        match self {
            RangeError::BelowOne { token }
            | RangeError::StartsBelowOne { token }
            | RangeError::EndsPastLast { token, .. }
            | RangeError::StartsPastLast { token, .. }
            | RangeError::RangeBelowOne { token }
            | RangeError::RangeOutOfBounds { token, .. }
            | RangeError::Inverted { token, .. }
            | RangeError::MalformedRange { token }
            | RangeError::PageOutOfBounds { token, .. }
            | RangeError::Unrecognized { token, .. } => token,
        }
    }

    pub fn category(&self) -> RangeErrorCategory {
        match self {
            RangeError::BelowOne { .. }
            | RangeError::StartsBelowOne { .. }
            | RangeError::RangeBelowOne { .. } => RangeErrorCategory::OutOfRangeLow,
            RangeError::EndsPastLast { .. }
            | RangeError::StartsPastLast { .. }
            | RangeError::RangeOutOfBounds { .. }
            | RangeError::PageOutOfBounds { .. } => RangeErrorCategory::OutOfRangeHigh,
            RangeError::Inverted { .. } => RangeErrorCategory::InvertedRange,
            RangeError::MalformedRange { .. } => RangeErrorCategory::MalformedRange,
            RangeError::Unrecognized { .. } => RangeErrorCategory::UnrecognizedToken,
        }
    }
}

/// Outcome of parsing a page specification: the valid pages and one error per
/// rejected token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSelection {
    /// Zero-based, ascending, no duplicates
    pub indices: Vec<u32>,
    /// In the order the offending tokens appeared
    pub errors: Vec<RangeError>,
}

impl PageSelection {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when nothing was selected and nothing was rejected.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() && self.errors.is_empty()
    }

    /// Selected pages as 1-based page numbers
    pub fn page_numbers(&self) -> Vec<u32> {
        self.indices.iter().map(|idx| idx + 1).collect()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Parse a specification like "-4,15,19,40-65,90-" against a document with
/// `num_pages` pages.
///
/// Never fails: each token either contributes pages or contributes an error.
pub fn parse_page_ranges(spec: &str, num_pages: u32) -> PageSelection {
    let normalized: String = spec.chars().filter(|c| !c.is_whitespace()).collect();

    let mut pages = BTreeSet::new();
    let mut errors = Vec::new();

    for raw in normalized.split(',').filter(|part| !part.is_empty()) {
        match Token::classify(raw).resolve(num_pages) {
            Ok(range) => pages.extend(range),
            Err(e) => errors.push(e),
        }
    }

    PageSelection {
        indices: pages.into_iter().collect(),
        errors,
    }
}

/// Text shown to the user when a specification is rejected.
pub fn invalid_input_report(errors: &[RangeError]) -> String {
    let mut report = String::from("Invalid input:\n");
    for e in errors {
        report.push_str(&e.to_string());
        report.push('\n');
    }
    report.push_str("Please re-enter valid page numbers/ranges.");
    report
}

/// Format help for a document of the given size.
pub fn format_help(num_pages: u32) -> String {
    format!(
        "This file has {num_pages} pages (1 to {num_pages}).\n\
         Format examples:\n  \
         - Use dashes for ranges (e.g. 40-65)\n  \
         - Use '-N' for start to N (e.g. -4 means 1-4)\n  \
         - Use 'N-' for N to end (e.g. 90- means 90 to end)\n  \
         - Separate any with commas (e.g. -4,15,19,40-65,90-)"
    )
}

fn saturating_digits(digits: &str) -> u64 {
    digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    })
}

/// An optionally signed run of ASCII digits. Overflow saturates.
fn parse_integer(s: &str) -> Option<i64> {
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude = i64::try_from(saturating_digits(digits)).unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> Vec<u32> {
        (start..=end).collect()
    }

    #[test]
    fn test_single_page() {
        for k in 1..=10 {
            let sel = parse_page_ranges(&k.to_string(), 10);
            assert_eq!(sel.indices, vec![k - 1]);
            assert!(sel.errors.is_empty());
        }
    }

    #[test]
    fn test_single_page_out_of_bounds() {
        for spec in ["0", "11", "500"] {
            let sel = parse_page_ranges(spec, 10);
            assert!(sel.indices.is_empty());
            assert_eq!(sel.errors.len(), 1);
        }
        let sel = parse_page_ranges("11", 10);
        assert_eq!(
            sel.errors[0].to_string(),
            "'11' is out of bounds (max page: 10)."
        );
        assert_eq!(sel.errors[0].category(), RangeErrorCategory::OutOfRangeHigh);
        let sel = parse_page_ranges("0", 10);
        assert_eq!(sel.errors[0].to_string(), "'0' is below 1.");
        assert_eq!(sel.errors[0].category(), RangeErrorCategory::OutOfRangeLow);
    }

    #[test]
    fn test_open_start() {
        for n in 1..=7 {
            let sel = parse_page_ranges(&format!("-{n}"), 7);
            assert_eq!(sel.indices, range(0, n - 1));
            assert!(sel.is_valid());
        }
        let sel = parse_page_ranges("-8", 7);
        assert!(sel.indices.is_empty());
        assert_eq!(
            sel.error_messages(),
            vec!["'-8' ends at 8, but max page is 7."]
        );
    }

    #[test]
    fn test_open_end() {
        for n in 1..=7 {
            let sel = parse_page_ranges(&format!("{n}-"), 7);
            assert_eq!(sel.indices, range(n - 1, 6));
            assert!(sel.is_valid());
        }
        assert_eq!(
            parse_page_ranges("0-", 7).error_messages(),
            vec!["'0-' starts below 1."]
        );
        assert_eq!(
            parse_page_ranges("8-", 7).error_messages(),
            vec!["'8-' starts at 8, but max page is 7."]
        );
    }

    #[test]
    fn test_bounded_range() {
        let sel = parse_page_ranges("3-6", 10);
        assert_eq!(sel.indices, vec![2, 3, 4, 5]);

        let sel = parse_page_ranges("4-4", 10);
        assert_eq!(sel.indices, vec![3]);

        let sel = parse_page_ranges("1-10", 10);
        assert_eq!(sel.indices, range(0, 9));
    }

    #[test]
    fn test_inverted_range() {
        let sel = parse_page_ranges("6-3", 10);
        assert!(sel.indices.is_empty());
        assert_eq!(sel.errors.len(), 1);
        assert_eq!(sel.errors[0].category(), RangeErrorCategory::InvertedRange);
        assert_eq!(
            sel.errors[0].to_string(),
            "'6-3': start 6 greater than end 3."
        );
    }

    #[test]
    fn test_bounded_range_checks_in_order() {
        // Below-one wins over out-of-bounds, which wins over inversion
        assert_eq!(
            parse_page_ranges("20-0", 10).error_messages(),
            vec!["'20-0' range contains numbers < 1."]
        );
        assert_eq!(
            parse_page_ranges("20-5", 10).error_messages(),
            vec!["'20-5' range out of bounds (max page: 10)."]
        );
        assert_eq!(
            parse_page_ranges("3--5", 10).error_messages(),
            vec!["'3--5' range contains numbers < 1."]
        );
    }

    #[test]
    fn test_malformed_range() {
        for spec in ["1-x", "a-3", "-", "--", "5--", "-3-", "1-2-3"] {
            let sel = parse_page_ranges(spec, 10);
            assert!(sel.indices.is_empty(), "{spec}");
            assert_eq!(sel.errors.len(), 1, "{spec}");
            assert_eq!(
                sel.errors[0].category(),
                RangeErrorCategory::MalformedRange,
                "{spec}"
            );
        }
        assert_eq!(
            parse_page_ranges("1-x", 10).error_messages(),
            vec!["'1-x' is malformed range."]
        );
    }

    #[test]
    fn test_unrecognized_token() {
        let sel = parse_page_ranges("2,abc,4", 5);
        assert_eq!(sel.indices, vec![1, 3]);
        assert_eq!(
            sel.error_messages(),
            vec!["'abc' is not valid (numbers from 1 to 5 only)."]
        );
        assert_eq!(
            sel.errors[0].category(),
            RangeErrorCategory::UnrecognizedToken
        );
        assert_eq!(sel.errors[0].token(), "abc");
    }

    #[test]
    fn test_only_ascii_digits_are_page_numbers() {
        let sel = parse_page_ranges("٣,2-٥", 5);
        assert!(sel.indices.is_empty());
        assert_eq!(
            sel.error_messages(),
            vec![
                "'٣' is not valid (numbers from 1 to 5 only).",
                "'2-٥' is malformed range.",
            ]
        );
    }

    #[test]
    fn test_overlap_collapses() {
        let sel = parse_page_ranges("2,1-3", 5);
        assert_eq!(sel.indices, vec![0, 1, 2]);
        let sel = parse_page_ranges("4-,-2,3,2", 5);
        assert_eq!(sel.indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_input() {
        for spec in ["", ",,,", "  ", " , ,"] {
            let sel = parse_page_ranges(spec, 5);
            assert!(sel.is_empty(), "{spec:?}");
        }
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let sel = parse_page_ranges(" 1 - 3 ,\t5\n", 5);
        assert_eq!(sel.indices, vec![0, 1, 2, 4]);
        assert!(sel.is_valid());
    }

    #[test]
    fn test_full_example() {
        let sel = parse_page_ranges("-4,15,19,40-65,90-", 100);
        let mut expected = vec![0, 1, 2, 3, 14, 18];
        expected.extend(39..=64);
        expected.extend(89..=99);
        assert_eq!(sel.indices, expected);
        assert!(sel.errors.is_empty());
    }

    #[test]
    fn test_errors_keep_token_order() {
        let sel = parse_page_ranges("0,101,50-10", 100);
        assert!(sel.indices.is_empty());
        assert_eq!(
            sel.error_messages(),
            vec![
                "'0' is below 1.",
                "'101' is out of bounds (max page: 100).",
                "'50-10': start 50 greater than end 10.",
            ]
        );
    }

    #[test]
    fn test_zero_pages() {
        let sel = parse_page_ranges("1,2-,-3,1-1", 0);
        assert!(sel.indices.is_empty());
        assert_eq!(sel.errors.len(), 4);

        let sel = parse_page_ranges("-0", 0);
        assert_eq!(sel.error_messages(), vec!["'-0' is below 1."]);
    }

    #[test]
    fn test_huge_numbers_do_not_overflow() {
        let sel = parse_page_ranges("99999999999999999999999", 10);
        assert_eq!(sel.errors[0].category(), RangeErrorCategory::OutOfRangeHigh);

        let sel = parse_page_ranges("1-99999999999999999999999", 10);
        assert_eq!(sel.errors[0].category(), RangeErrorCategory::OutOfRangeHigh);

        let sel = parse_page_ranges("-99999999999999999999999", 10);
        assert_eq!(sel.errors[0].category(), RangeErrorCategory::OutOfRangeHigh);
    }

    #[test]
    fn test_past_last_messages_show_typed_number() {
        assert_eq!(
            parse_page_ranges("-99999999999999999999999", 10).error_messages(),
            vec!["'-99999999999999999999999' ends at 99999999999999999999999, but max page is 10."]
        );
        assert_eq!(
            parse_page_ranges("99999999999999999999999-", 10).error_messages(),
            vec!["'99999999999999999999999-' starts at 99999999999999999999999, but max page is 10."]
        );
        assert_eq!(
            parse_page_ranges("-0012", 10).error_messages(),
            vec!["'-0012' ends at 12, but max page is 10."]
        );
        assert_eq!(
            parse_page_ranges("011-", 10).error_messages(),
            vec!["'011-' starts at 11, but max page is 10."]
        );
        assert_eq!(
            parse_page_ranges("-000,000-", 10).error_messages(),
            vec!["'-000' is below 1.", "'000-' starts below 1."]
        );
    }

    #[test]
    fn test_token_classification() {
        assert_eq!(
            Token::classify("-4"),
            Token::OpenStart {
                raw: "-4",
                end: PageNumber {
                    value: 4,
                    digits: "4"
                }
            }
        );
        assert_eq!(
            Token::classify("09-"),
            Token::OpenEnd {
                raw: "09-",
                start: PageNumber {
                    value: 9,
                    digits: "9"
                }
            }
        );
        assert_eq!(
            Token::classify("2-7"),
            Token::Bounded {
                raw: "2-7",
                start: 2,
                end: 7
            }
        );
        assert_eq!(Token::classify("12"), Token::Single { raw: "12", page: 12 });
        assert_eq!(Token::classify("x-"), Token::MalformedRange { raw: "x-" });
        assert_eq!(Token::classify("1.5"), Token::Invalid { raw: "1.5" });
    }

    #[test]
    fn test_page_numbers() {
        let sel = parse_page_ranges("2,4-5", 5);
        assert_eq!(sel.page_numbers(), vec![2, 4, 5]);
    }

    #[test]
    fn test_invalid_input_report() {
        let sel = parse_page_ranges("0,x", 3);
        assert_eq!(
            invalid_input_report(&sel.errors),
            "Invalid input:\n\
             '0' is below 1.\n\
             'x' is not valid (numbers from 1 to 3 only).\n\
             Please re-enter valid page numbers/ranges."
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        let a = parse_page_ranges("5-,x,2", 9);
        let b = parse_page_ranges("5-,x,2", 9);
        assert_eq!(a, b);
    }
}
