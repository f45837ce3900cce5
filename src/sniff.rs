//! Dialect and header detection heuristics.
//!
//! Both detectors work on an in-memory slice of the stream: dialect
//! sniffing on the leading sample, header detection on the full content.
//! They are best-effort heuristics; callers that know their schema can
//! bypass header detection by supplying custom headers to the parser.

use csv::ReaderBuilder;

use crate::error::RosterParserError;

/// Delimiters tried during sniffing, in preference order.
pub(crate) const CANDIDATE_DELIMITERS: [u8; 5] = [b',', b'\t', b';', b'|', b':'];

/// Quote characters recognized as field wrappers.
const CANDIDATE_QUOTES: [u8; 2] = [b'"', b'\''];

/// Maximum number of data rows inspected by the header heuristic.
const MAX_HEADER_ROWS: usize = 20;

/// A detected CSV dialect: delimiter and quote character.
///
/// Computed once from the leading sample of a stream and never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// The field separator.
    pub delimiter: u8,
    /// The character wrapping fields that contain the delimiter.
    pub quote: u8,
}

/// Sniffs the delimiter and quote character from a sample of the stream.
///
/// Candidate delimiters are tried in preference order; the first one that
/// splits every sampled row into the same field count of at least two wins.
/// A trailing line without a terminator may have been cut by the sample
/// window and is excluded from the consistency check.
///
/// # Errors
///
/// Returns [`RosterParserError::DialectDetection`] when the sample is empty
/// or no candidate produces a consistent multi-column split.
pub fn detect_dialect(sample: &str) -> Result<Dialect, RosterParserError> {
    if sample.trim().is_empty() {
        return Err(RosterParserError::DialectDetection(
            "sample is empty".to_string(),
        ));
    }

    let quote = detect_quote(sample);
    for &delimiter in &CANDIDATE_DELIMITERS {
        if let Some(fields) = uniform_field_count(sample, delimiter, quote) {
            if fields >= 2 {
                return Ok(Dialect { delimiter, quote });
            }
        }
    }

    Err(RosterParserError::DialectDetection(
        "no consistent delimiter found in sample".to_string(),
    ))
}

/// Field count shared by every sampled row for `delimiter`, or `None` when
/// the rows disagree.
fn uniform_field_count(sample: &str, delimiter: u8, quote: u8) -> Option<usize> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .quote(quote)
        .has_headers(false)
        .flexible(true)
        .from_reader(sample.as_bytes());

    let mut counts = Vec::new();
    for record in reader.records() {
        counts.push(record.ok()?.len());
    }
    // the sample window can cut the last line mid-record
    if counts.len() > 1 && !sample.ends_with('\n') {
        counts.pop();
    }

    let first = *counts.first()?;
    counts.iter().all(|&count| count == first).then_some(first)
}

/// Picks the quote character used to wrap fields, defaulting to `"` when
/// the sample carries no quoting at all.
fn detect_quote(sample: &str) -> u8 {
    for &quote in &CANDIDATE_QUOTES {
        if opens_field(sample, quote) {
            return quote;
        }
    }
    b'"'
}

/// True when `quote` appears where a field can start: at a line start or
/// immediately after a candidate delimiter.
fn opens_field(sample: &str, quote: u8) -> bool {
    let quote = quote as char;
    if sample.matches(quote).count() < 2 {
        return false;
    }
    sample.lines().any(|line| {
        line.starts_with(quote)
            || CANDIDATE_DELIMITERS
                .iter()
                .any(|&delimiter| line.contains(&format!("{}{}", delimiter as char, quote)))
    })
}

/// Value class assigned to a column by the header heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnClass {
    Int,
    Float,
    Len(usize),
}

/// Running state of a column while data rows are inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Unseen,
    Seen(ColumnClass),
    Dropped,
}

fn classify(value: &str) -> ColumnClass {
    let trimmed = value.trim();
    if trimmed.parse::<i64>().is_ok() {
        ColumnClass::Int
    } else if trimmed.parse::<f64>().is_ok() {
        ColumnClass::Float
    } else {
        ColumnClass::Len(value.chars().count())
    }
}

fn fits(value: &str, class: ColumnClass) -> bool {
    match class {
        ColumnClass::Int => value.trim().parse::<i64>().is_ok(),
        ColumnClass::Float => value.trim().parse::<f64>().is_ok(),
        ColumnClass::Len(len) => value.chars().count() == len,
    }
}

/// Decides whether row 1 of `content` is a header rather than data.
///
/// Row 1 is the header candidate. Each column of up to twenty following
/// rows is classified as integer, float, or string-of-length-n;
/// columns without a uniform class abstain. A surviving column votes for a
/// header when the candidate value does not fit the column class and
/// against it when it does. A lone row has nothing to compare against and
/// counts as data.
pub fn detect_header(content: &str, dialect: &Dialect) -> Result<bool, RosterParserError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(dialect.delimiter)
        .quote(dialect.quote)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let candidate = match records.next() {
        Some(record) => record?,
        None => return Ok(false),
    };
    let columns = candidate.len();

    let mut classes = vec![Column::Unseen; columns];
    for (checked, record) in records.enumerate() {
        if checked >= MAX_HEADER_ROWS {
            break;
        }
        let record = record?;
        if record.len() != columns {
            continue;
        }
        for (col, value) in record.iter().enumerate() {
            classes[col] = match (classes[col], classify(value)) {
                (Column::Unseen, class) => Column::Seen(class),
                (Column::Seen(previous), class) if previous == class => Column::Seen(class),
                (Column::Seen(_), _) | (Column::Dropped, _) => Column::Dropped,
            };
        }
    }

    let mut votes = 0i32;
    for (col, state) in classes.iter().enumerate() {
        let Column::Seen(class) = *state else {
            continue;
        };
        if fits(&candidate[col], class) {
            votes -= 1;
        } else {
            votes += 1;
        }
    }
    Ok(votes > 0)
}
