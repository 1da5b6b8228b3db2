//! Project-scoped reference data: dictionaries, global variables, reserved
//! number ranges, and projects themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A project owning tags, templates, and reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// One code in a free-form dictionary category.
///
/// Codes should be unique within `(project_id, category)`; the write path
/// enforces this, the read path resolves first match in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryItem {
    pub id: String,
    pub project_id: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    pub code: String,
    pub value: String,
    #[serde(default)]
    pub description: String,
}

/// A project-scoped named constant, looked up case-sensitively by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalVariable {
    pub id: String,
    pub project_id: String,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub description: String,
}

/// A number range withheld from issuance for one prefix.
///
/// `scope` must equal the computed prefix string for the range to apply;
/// `start..=end` is inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedRange {
    pub id: String,
    pub project_id: String,
    pub scope: String,
    pub start: u64,
    pub end: u64,
    #[serde(default)]
    pub reason: String,
}

impl ReservedRange {
    /// Whether `n` falls inside this range.
    #[must_use]
    pub const fn covers(&self, n: u64) -> bool {
        self.start <= n && n <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::ReservedRange;

    fn range(start: u64, end: u64) -> ReservedRange {
        ReservedRange {
            id: "r1".to_string(),
            project_id: "p1".to_string(),
            scope: "P-".to_string(),
            start,
            end,
            reason: String::new(),
        }
    }

    #[test]
    fn covers_is_inclusive_on_both_ends() {
        let r = range(660, 666);
        assert!(r.covers(660));
        assert!(r.covers(663));
        assert!(r.covers(666));
        assert!(!r.covers(659));
        assert!(!r.covers(667));
    }

    #[test]
    fn single_number_range_covers_itself() {
        assert!(range(5, 5).covers(5));
        assert!(!range(5, 5).covers(6));
    }
}
