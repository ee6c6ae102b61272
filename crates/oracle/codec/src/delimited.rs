//! `|`-joined records.
//!
//! Node results used to travel through consensus as a single delimited
//! string (`balance|senderRejected|receiverRejected`). Reduction now works
//! on structured values; the delimited form is what gets logged.

use std::fmt;

/// Placeholder a node emits for a field it could not obtain.
pub const ERROR_SENTINEL: &str = "error";

pub const DELIMITER: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedRecord {
    fields: Vec<String>,
}

impl DelimitedRecord {
    /// Build a record, replacing any embedded delimiter with `/`.
    pub fn sanitized<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|f| f.into().replace(DELIMITER, "/"))
                .collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl fmt::Display for DelimitedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, field) in self.fields.iter().enumerate() {
            if index > 0 {
                write!(f, "{DELIMITER}")?;
            }
            f.write_str(field)?;
        }
        Ok(())
    }
}
