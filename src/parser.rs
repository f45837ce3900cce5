//! Roster parser.
//!
//! [`RosterParser`] wires the detection phases together and drives row
//! normalization. Construction sniffs the dialect from a leading sample,
//! decides header presence from the full content, and leaves the stream
//! rewound; `parse()` re-reads the stream and yields the accepted records
//! in source order.

use std::io::{Read, Seek, SeekFrom};

use csv::{ReaderBuilder, StringRecord};

use crate::error::RosterParserError;
use crate::record::{PersonRecord, UNKNOWN};
use crate::sniff::{self, Dialect};

/// Number of bytes sampled for dialect detection.
const SAMPLE_SIZE: usize = 1024;

/// CSV parser producing validated roster records from a seekable stream.
///
/// The parser borrows the read cursor of an externally owned stream: it
/// rewinds between detection phases and before each parse, but never opens
/// or closes the underlying handle. The caller must not touch the stream
/// while construction or [`parse`](RosterParser::parse) is in progress.
///
/// # Features
///
/// - Sniffs delimiter and quote character from the first 1024 bytes of
///   the stream
/// - Decides header presence from the full stream content
/// - Maps every row onto the fixed schema name, surname, age, city,
///   country, position, substituting [`UNKNOWN`] for absent optional fields
/// - Silently filters rows without a surname or a digit-only age
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use roster_parser::parser::RosterParser;
///
/// let stream = Cursor::new("name,surname,age\nAlice,Smith,30\n");
/// let mut parser = RosterParser::new(stream, None).unwrap();
/// let records = parser.parse().unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].age, 30);
/// ```
#[derive(Debug)]
pub struct RosterParser<R> {
    /// The borrowed stream handle; only its cursor is moved.
    stream: R,
    /// Field names used when the stream has no header row.
    custom_headers: Option<Vec<String>>,
    /// Dialect computed at construction, never recomputed.
    dialect: Dialect,
    /// Whether row 1 of the stream is a header rather than data.
    has_header: bool,
}

impl<R: Read + Seek> RosterParser<R> {
    /// Creates a parser, running dialect and header detection.
    ///
    /// The stream is rewound before each detection phase and once more
    /// afterwards, leaving the cursor at the start.
    ///
    /// # Errors
    ///
    /// - [`RosterParserError::Io`] when the stream refuses any rewind or
    ///   read
    /// - [`RosterParserError::DialectDetection`] when no consistent
    ///   delimiter/quote convention can be inferred from the sample
    pub fn new(
        mut stream: R,
        custom_headers: Option<Vec<String>>,
    ) -> Result<Self, RosterParserError> {
        rewind(&mut stream)?;
        let sample = read_sample(&mut stream)?;
        let dialect = sniff::detect_dialect(&sample)?;

        rewind(&mut stream)?;
        let mut content = String::new();
        stream.read_to_string(&mut content)?;
        let has_header = sniff::detect_header(&content, &dialect)?;

        rewind(&mut stream)?;

        let delimiter = dialect.delimiter as char;
        let quote = dialect.quote as char;
        tracing::debug!(%delimiter, %quote, has_header, "roster parser ready");

        Ok(Self {
            stream,
            custom_headers,
            dialect,
            has_header,
        })
    }

    /// The detected delimiter. No side effects.
    #[must_use]
    pub fn delimiter(&self) -> char {
        self.dialect.delimiter as char
    }

    /// The detected quote character. No side effects.
    #[must_use]
    pub fn quotechar(&self) -> char {
        self.dialect.quote as char
    }

    /// The detected dialect.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Whether row 1 of the stream was detected as a header.
    #[must_use]
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    /// Parses the stream into validated records, preserving row order.
    ///
    /// Field names come from the first row when a header was detected,
    /// otherwise from the custom headers given at construction. Rows that
    /// are entirely empty, lack a surname, or lack a digit-only age are
    /// skipped without error. Re-entrant: every call rewinds and re-reads,
    /// so an unchanged stream always yields the same result.
    ///
    /// # Errors
    ///
    /// - [`RosterParserError::Io`] when the rewind or read fails
    /// - [`RosterParserError::Schema`] when no header row was detected and
    ///   no custom headers were supplied
    /// - [`RosterParserError::Csv`] when the reader fails at the CSV layer
    pub fn parse(&mut self) -> Result<Vec<PersonRecord>, RosterParserError> {
        rewind(&mut self.stream)?;
        let mut content = String::new();
        self.stream.read_to_string(&mut content)?;

        let mut reader = ReaderBuilder::new()
            .delimiter(self.dialect.delimiter)
            .quote(self.dialect.quote)
            .has_headers(self.has_header)
            .flexible(true)
            .from_reader(content.as_bytes());

        let fieldnames: Vec<String> = if self.has_header {
            reader
                .headers()?
                .iter()
                .map(|name| name.trim_start().to_string())
                .collect()
        } else {
            match &self.custom_headers {
                Some(names) => names.clone(),
                None => {
                    return Err(RosterParserError::Schema(
                        "no headers detected or specified".to_string(),
                    ))
                }
            }
        };

        let mut records = Vec::new();
        for result in reader.records() {
            let row = RawRow::new(&fieldnames, &result?);
            if row.is_blank() {
                continue;
            }
            if let Some(record) = row.normalize() {
                records.push(record);
            }
        }
        tracing::debug!(records = records.len(), "parse complete");
        Ok(records)
    }
}

/// Repositions the cursor at the stream start, failing when the stream
/// does not support seeking.
fn rewind<S: Seek>(stream: &mut S) -> Result<(), RosterParserError> {
    stream.seek(SeekFrom::Start(0))?;
    Ok(())
}

/// Reads up to `SAMPLE_SIZE` bytes, clipped to a valid UTF-8 boundary.
fn read_sample<R: Read>(stream: &mut R) -> Result<String, RosterParserError> {
    let mut buf = [0u8; SAMPLE_SIZE];
    let mut filled = 0;
    while filled < SAMPLE_SIZE {
        let n = stream.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    let sample = match std::str::from_utf8(&buf[..filled]) {
        Ok(text) => text.to_string(),
        // the byte window can split a multi-byte character; keep the valid prefix
        Err(err) => String::from_utf8_lossy(&buf[..err.valid_up_to()]).into_owned(),
    };
    Ok(sample)
}

/// A parsed row before normalization: values aligned with the field names,
/// plus any overflow past the last named column. The overflow never reaches
/// a record and never causes rejection.
struct RawRow<'a> {
    fieldnames: &'a [String],
    values: Vec<Option<String>>,
    extra: Vec<String>,
}

impl<'a> RawRow<'a> {
    fn new(fieldnames: &'a [String], record: &StringRecord) -> Self {
        let values = (0..fieldnames.len())
            .map(|i| record.get(i).map(|value| value.trim_start().to_string()))
            .collect();
        let extra = record
            .iter()
            .skip(fieldnames.len())
            .map(|value| value.trim_start().to_string())
            .collect();
        Self {
            fieldnames,
            values,
            extra,
        }
    }

    /// Looks a field up by name. Duplicate names resolve the way a
    /// key/value zip collapses them: the last name wins among the columns
    /// the row actually filled.
    fn get(&self, name: &str) -> Option<&str> {
        self.fieldnames
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, field)| field.as_str() == name)
            .find_map(|(i, _)| self.values[i].as_deref())
    }

    fn is_blank(&self) -> bool {
        self.extra.is_empty()
            && self
                .values
                .iter()
                .all(|value| value.as_deref().map_or(true, str::is_empty))
    }

    /// Applies default substitution and required-field checks; `None`
    /// drops the row.
    fn normalize(&self) -> Option<PersonRecord> {
        let surname = trimmed_or_unknown(self.get("surname"));
        // a surname that normalized to the placeholder is indistinguishable
        // from a missing one and drops with it
        if surname == UNKNOWN {
            return None;
        }
        let age = parse_age(self.get("age"))?;
        Some(PersonRecord {
            name: trimmed_or_unknown(self.get("name")),
            surname,
            age,
            city: value_or_unknown(self.get("city")),
            country: value_or_unknown(self.get("country")),
            position: value_or_unknown(self.get("position")),
        })
    }
}

fn trimmed_or_unknown(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

fn value_or_unknown(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Ages must be digit-only text; anything else means "no value", which is
/// a sentinel rather than an error.
fn parse_age(value: Option<&str>) -> Option<u32> {
    let value = value.unwrap_or("");
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
