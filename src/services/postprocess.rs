//! Post-processors turning raw extracted strings into typed values.
//!
//! Every function here is total: unparseable input yields `None`.

use chrono::NaiveDate;

use crate::models::{FieldValue, PostProcessor};

/// Input format for year-less dates once the year is appended.
pub const DEFAULT_DATE_FORMAT: &str = "%b %d %Y";

/// Output date format (ISO-8601 calendar date).
pub const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Values shared by every post-processor for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessContext {
    /// Year appended to year-less dates
    pub year: i32,
}

impl ProcessContext {
    pub fn new(year: i32) -> Self {
        Self { year }
    }

    /// Apply `processor` to `raw` with the rule's extra arguments.
    pub fn apply(
        &self,
        processor: PostProcessor,
        raw: &str,
        args: &[String],
    ) -> Option<FieldValue> {
        match processor {
            PostProcessor::Number => price_as_number(raw).map(FieldValue::Number),
            PostProcessor::Date => {
                let format = args.first().map_or(DEFAULT_DATE_FORMAT, String::as_str);
                date_with_year(raw, self.year, format).map(FieldValue::Text)
            }
        }
    }
}

/// Keep only digits and `.` and parse what remains as a float.
///
/// `"$1,234.56"` becomes `1234.56`; `"Free"` and `"1.2.3"` become `None`.
pub fn price_as_number(raw: &str) -> Option<f64> {
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if stripped.is_empty() {
        return None;
    }
    stripped.parse().ok()
}

/// Append `year` to a year-less date and reformat it as `YYYY-MM-DD`.
///
/// Runs of whitespace in the input are collapsed and the ends trimmed
/// before parsing, so padded markup such as `"  Jan 5 "` is accepted.
pub fn date_with_year(raw: &str, year: i32, format: &str) -> Option<String> {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(&format!("{text} {year}"), format)
        .ok()
        .map(|date| date.format(OUTPUT_DATE_FORMAT).to_string())
}
