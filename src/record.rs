//! Roster record types.
//!
//! Defines [`PersonRecord`], the fixed six-field output entry, and the
//! [`UNKNOWN`] placeholder substituted for absent optional fields.

use serde::{Deserialize, Serialize};

/// The placeholder value substituted for absent optional textual fields.
///
/// A surname that normalizes to this value is treated as missing and causes
/// the row to be rejected, so a person literally surnamed "Unknown" is
/// indistinguishable from a missing surname. This mirrors the upstream data
/// source and is kept as documented behavior.
pub const UNKNOWN: &str = "Unknown";

/// A single validated, normalized roster entry.
///
/// This struct represents one accepted row of the input stream after
/// default substitution and required-field checks. It is designed to be
/// serialized with the six keys in declaration order.
///
/// # Fields
///
/// * `name` - trimmed given name, or [`UNKNOWN`] when the field was empty
/// * `surname` - trimmed family name; rows without one are never emitted
/// * `age` - non-negative age parsed from digit-only text
/// * `city` - city of residence, or [`UNKNOWN`] when the field was empty
/// * `country` - country of residence, or [`UNKNOWN`] when the field was empty
/// * `position` - job title, or [`UNKNOWN`] when the field was empty
///
/// # Example
///
/// ```
/// use roster_parser::record::PersonRecord;
///
/// let record = PersonRecord::new(
///     "Alice".to_string(),
///     "Smith".to_string(),
///     30,
///     "Paris".to_string(),
///     "France".to_string(),
///     "Engineer".to_string(),
/// );
/// assert_eq!(record.age, 30);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonRecord {
    /// Given name, trimmed of surrounding whitespace.
    pub name: String,

    /// Family name, trimmed of surrounding whitespace.
    ///
    /// Always a concrete value: rows whose surname resolved to the
    /// placeholder are dropped before a record is built.
    pub surname: String,

    /// Age in years.
    ///
    /// Only digit-only field text produces an age; anything else marks the
    /// age as absent and the row is dropped.
    pub age: u32,

    /// City of residence, unmodified field text.
    pub city: String,

    /// Country of residence, unmodified field text.
    pub country: String,

    /// Job title, unmodified field text.
    pub position: String,
}

impl PersonRecord {
    /// Creates a new PersonRecord with the given values.
    pub fn new(
        name: String,
        surname: String,
        age: u32,
        city: String,
        country: String,
        position: String,
    ) -> Self {
        Self {
            name,
            surname,
            age,
            city,
            country,
            position,
        }
    }
}
