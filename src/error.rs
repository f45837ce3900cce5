//! Error module
//!
//! Defines custom error types using `thiserror` for the roster parser.
//! This module provides a unified error type that wraps all possible error
//! sources and implements the `From` trait for automatic conversion from
//! underlying error types.

use thiserror::Error;

/// The main error type for the roster parser.
///
/// This enum represents all possible errors that can occur while
/// constructing a parser or parsing a stream, including stream access
/// errors, detection failures, and schema errors.
///
/// # Error Categories
///
/// - **Stream errors**: the stream refused a rewind or read operation
/// - **Detection errors**: the dialect sniffer could not settle on a
///   delimiter/quote convention
/// - **Schema errors**: no header row was detected and no custom header
///   list was supplied
///
/// Row-level data problems (missing required fields, malformed ages) are
/// never reported through this type. Such rows are filtered silently as a
/// data-cleaning policy.
///
/// # Example
///
/// ```rust,ignore
/// use roster_parser::error::RosterParserError;
///
/// fn example() -> Result<(), RosterParserError> {
///     // Errors from underlying types are automatically converted
///     let file = std::fs::File::open("roster.csv")?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum RosterParserError {
    /// Stream access error.
    ///
    /// This error occurs when the supplied stream does not support a
    /// required rewind (`seek`) or read operation. Every rewind during
    /// construction and parsing is checked, not only the first.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading error from the underlying reader.
    ///
    /// This error occurs when iterating records fails at the CSV layer.
    /// It does not cover rows that merely fail validation.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Dialect detection failure.
    ///
    /// This error occurs when the sniffer cannot determine a consistent
    /// delimiter/quote convention from the leading sample, for example
    /// when the sample is empty or single-column.
    #[error("dialect detection failed: {0}")]
    DialectDetection(String),

    /// Missing schema error.
    ///
    /// This error occurs inside `parse()` when no header row was detected
    /// in the stream and no custom header list was supplied at
    /// construction.
    #[error("schema error: {0}")]
    Schema(String),
}
