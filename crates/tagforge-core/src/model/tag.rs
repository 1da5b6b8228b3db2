use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};

use super::{ParseEnumError, normalize};

/// Lifecycle states of a tag record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagStatus {
    Draft,
    Active,
    Review,
    Approved,
    Archived,
    Reserved,
}

impl TagStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Review => "review",
            Self::Approved => "approved",
            Self::Archived => "archived",
            Self::Reserved => "reserved",
        }
    }

    /// All statuses, in lifecycle order, for CLI help and filters.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Draft,
            Self::Active,
            Self::Review,
            Self::Approved,
            Self::Archived,
            Self::Reserved,
        ]
    }
}

impl Default for TagStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl fmt::Display for TagStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "review" => Ok(Self::Review),
            "approved" => Ok(Self::Approved),
            "archived" => Ok(Self::Archived),
            "reserved" => Ok(Self::Reserved),
            _ => Err(ParseEnumError {
                expected: "tag status",
                got: s.to_string(),
            }),
        }
    }
}

/// One append-only history entry on a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: String,
    pub user: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AuditEntry {
    #[must_use]
    pub fn new(action: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            user: user.into(),
            timestamp: Utc::now(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// A generated structured identifier for a piece of equipment.
///
/// Invariant: `full_tag` equals the concatenation of `parts` in template
/// block order. The engine is the sole writer of this invariant, at both
/// creation ([`crate::generate`]) and edit ([`crate::edit`]) time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub project_id: String,
    pub template_id: String,
    pub full_tag: String,
    /// Block id → resolved value, covering every block of the template.
    #[serde(default)]
    pub parts: BTreeMap<String, String>,
    #[serde(default)]
    pub status: TagStatus,
    /// Hierarchy placement. Independent from the inheritance-source parent:
    /// a tag may inherit values from one tag and be nested under another.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub history: Vec<AuditEntry>,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Reassemble the full tag string from `parts` in template block order.
    ///
    /// Used to verify the round-trip invariant; blocks missing from `parts`
    /// contribute nothing.
    #[must_use]
    pub fn assemble_from_parts(&self, template: &super::template::Template) -> String {
        template
            .blocks
            .iter()
            .filter_map(|b| self.parts.get(&b.id).map(String::as_str))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{AuditEntry, Tag, TagStatus};
    use crate::model::block::{BlockKind, TemplateBlock};
    use crate::model::template::Template;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::str::FromStr;

    #[test]
    fn status_json_roundtrips() {
        assert_eq!(
            serde_json::to_string(&TagStatus::Draft).unwrap(),
            "\"draft\""
        );
        assert_eq!(
            serde_json::from_str::<TagStatus>("\"approved\"").unwrap(),
            TagStatus::Approved
        );
    }

    #[test]
    fn status_display_parse_roundtrips() {
        for status in TagStatus::all() {
            let rendered = status.to_string();
            assert_eq!(TagStatus::from_str(&rendered).unwrap(), status);
        }
        assert!(TagStatus::from_str("pending").is_err());
    }

    #[test]
    fn assemble_from_parts_follows_block_order() {
        let template = Template {
            id: "t1".to_string(),
            project_id: "p1".to_string(),
            name: String::new(),
            description: String::new(),
            blocks: vec![
                TemplateBlock::new("b1", BlockKind::Literal { text: "P".into() }),
                TemplateBlock::new("b2", BlockKind::Separator { text: "-".into() }),
                TemplateBlock::new("b3", BlockKind::AutoNumber { padding: 3 }),
            ],
            created_at: Utc::now(),
        };
        let mut parts = BTreeMap::new();
        parts.insert("b3".to_string(), "001".to_string());
        parts.insert("b1".to_string(), "P".to_string());
        parts.insert("b2".to_string(), "-".to_string());

        let tag = Tag {
            id: "tag1".to_string(),
            project_id: "p1".to_string(),
            template_id: "t1".to_string(),
            full_tag: "P-001".to_string(),
            parts,
            status: TagStatus::Draft,
            parent_id: None,
            notes: None,
            history: vec![AuditEntry::new("Created", "tests")],
            created_at: Utc::now(),
        };
        assert_eq!(tag.assemble_from_parts(&template), tag.full_tag);
    }
}
