//! Frequency-to-mode lookup tables.
//!
//! A table is a JSON array of ranges:
//!
//! ```json
//! [
//!   {"freq_from": 14000, "freq_to": 14070, "mode": "CW"},
//!   {"freq_from": 14070, "freq_to": 14350, "mode": "USB"}
//! ]
//! ```
//!
//! Ranges are half-open `[freq_from, freq_to)` and scanned in declared
//! order, so the first matching range wins.

use serde_json::Value;

use super::TableError;

/// One `[from, to)` range of a lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyRange {
    /// Inclusive lower bound.
    pub from: u64,
    /// Exclusive upper bound.
    pub to: u64,
    /// Mode applied inside the range.
    pub mode: String,
}

impl FrequencyRange {
    /// Returns `true` if `frequency` lies in `[from, to)`.
    #[must_use]
    pub const fn contains(&self, frequency: u64) -> bool {
        self.from <= frequency && frequency < self.to
    }
}

/// Validated, immutable lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable {
    name: String,
    ranges: Vec<FrequencyRange>,
}

impl LookupTable {
    /// Parses and validates raw table content.
    ///
    /// The whole table is rejected if any single range is malformed.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Invalid`] if the content is not JSON, is not
    /// an array, or contains a range with a missing/zero bound, an empty
    /// mode, or `freq_from > freq_to`.
    pub fn parse(name: &str, raw: &[u8]) -> Result<Self, TableError> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| TableError::invalid(name, format!("malformed JSON: {e}")))?;
        Self::from_value(name, &value)
    }

    /// Validates an already-decoded JSON value.
    ///
    /// # Errors
    ///
    /// See [`LookupTable::parse`].
    pub fn from_value(name: &str, value: &Value) -> Result<Self, TableError> {
        let items = value
            .as_array()
            .ok_or_else(|| TableError::invalid(name, "lookup table should be a json array"))?;

        let mut ranges = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            let from = positive_int(item, "freq_from");
            let to = positive_int(item, "freq_to");
            let mode = item
                .get("mode")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty());

            let (Some(from), Some(to), Some(mode)) = (from, to, mode) else {
                return Err(TableError::invalid(
                    name,
                    format!("range #{idx} is not valid"),
                ));
            };
            if from > to {
                return Err(TableError::invalid(
                    name,
                    format!("range #{idx} has start freq greater than end freq"),
                ));
            }
            ranges.push(FrequencyRange {
                from,
                to,
                mode: mode.to_string(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            ranges,
        })
    }

    /// Returns the mode of the first range containing `frequency`.
    #[must_use]
    pub fn mode_for(&self, frequency: u64) -> Option<&str> {
        self.ranges
            .iter()
            .find(|r| r.contains(frequency))
            .map(|r| r.mode.as_str())
    }

    /// Table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ranges in declared order.
    #[must_use]
    pub fn ranges(&self) -> &[FrequencyRange] {
        &self.ranges
    }
}

/// Reads a strictly positive integer field. Zero counts as missing.
fn positive_int(item: &Value, key: &str) -> Option<u64> {
    item.get(key).and_then(Value::as_u64).filter(|v| *v > 0)
}
