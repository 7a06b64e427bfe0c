//! Row identity

use uuid::Uuid;

/// A freshly generated row identifier
///
/// Ids come from random v4 UUIDs (122 bits of entropy), rendered in the
/// hyphenated form, which is URL-safe. `RowId` is not `Clone`:
/// each generated value is moved into exactly one row.
#[derive(Debug, PartialEq, Eq)]
pub struct RowId(String);

impl RowId {
    /// Generate a new random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
