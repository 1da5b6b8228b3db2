use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{ParseEnumError, normalize};

/// Which value a parent-reference block copies from the selected parent tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentSource {
    /// The parent's auto-number value (zero-padded, as stored).
    Number,
    /// The parent's resolved project/system (WBS) dictionary code.
    WbsCode,
    /// The parent's full tag string verbatim.
    FullTag,
}

impl ParentSource {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::WbsCode => "wbs_code",
            Self::FullTag => "full_tag",
        }
    }
}

impl fmt::Display for ParentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParentSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "number" => Ok(Self::Number),
            "wbs_code" | "wbs" => Ok(Self::WbsCode),
            "full_tag" | "full" => Ok(Self::FullTag),
            _ => Err(ParseEnumError {
                expected: "parent source",
                got: s.to_string(),
            }),
        }
    }
}

/// The closed set of block kinds a template may contain.
///
/// A template has at most one [`BlockKind::AutoNumber`] and at most one
/// [`BlockKind::Suffix`]; violations are structural errors caught by
/// [`crate::model::template::Template::validate`], not user-input validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    /// Fixed string emitted verbatim.
    Literal { text: String },
    /// Fixed short string, semantically a literal but edited as its own unit.
    Separator { text: String },
    /// Resolves to a code chosen from dictionary entries in `category`.
    Dictionary { category: String },
    /// Resolves to the current value of a project-scoped named constant.
    GlobalVar { key: String },
    /// The auto-incrementing numeric block, zero-padded to `padding` digits.
    AutoNumber { padding: usize },
    /// Single-letter block (A, B, C…) used by parallel generation.
    Suffix,
    /// Resolved from a chosen parent tag at generation time.
    ParentRef { source: ParentSource },
    /// Free-text manual reference to another tag; value supplied by the user.
    LegacyParentRef,
}

impl BlockKind {
    /// Short kind name for display and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Literal { .. } => "literal",
            Self::Separator { .. } => "separator",
            Self::Dictionary { .. } => "dictionary",
            Self::GlobalVar { .. } => "global_var",
            Self::AutoNumber { .. } => "auto_number",
            Self::Suffix => "suffix",
            Self::ParentRef { .. } => "parent_ref",
            Self::LegacyParentRef => "legacy_parent_ref",
        }
    }

    /// Fixed text carried by the block itself, if any.
    #[must_use]
    pub fn fixed_text(&self) -> Option<&str> {
        match self {
            Self::Literal { text } | Self::Separator { text } => Some(text),
            _ => None,
        }
    }

    /// Whether the block's value comes from user input or a resolver rather
    /// than the template definition.
    #[must_use]
    pub const fn needs_value(&self) -> bool {
        matches!(
            self,
            Self::Dictionary { .. }
                | Self::GlobalVar { .. }
                | Self::ParentRef { .. }
                | Self::LegacyParentRef
        )
    }
}

/// One ordered element of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateBlock {
    pub id: String,
    #[serde(flatten)]
    pub kind: BlockKind,
}

impl TemplateBlock {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BlockKind, ParentSource, TemplateBlock};
    use std::str::FromStr;

    #[test]
    fn block_json_carries_kind_tag() {
        let block = TemplateBlock::new(
            "b1",
            BlockKind::Dictionary {
                category: "Система".to_string(),
            },
        );
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "dictionary");
        assert_eq!(json["category"], "Система");
        assert_eq!(json["id"], "b1");

        let back: TemplateBlock = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn parent_source_roundtrips() {
        for source in [
            ParentSource::Number,
            ParentSource::WbsCode,
            ParentSource::FullTag,
        ] {
            let rendered = source.to_string();
            assert_eq!(ParentSource::from_str(&rendered).unwrap(), source);
        }
        assert_eq!(
            ParentSource::from_str("WBS").unwrap(),
            ParentSource::WbsCode
        );
        assert!(ParentSource::from_str("sibling").is_err());
    }

    #[test]
    fn needs_value_covers_resolver_kinds() {
        assert!(
            BlockKind::Dictionary {
                category: "x".into()
            }
            .needs_value()
        );
        assert!(BlockKind::GlobalVar { key: "x".into() }.needs_value());
        assert!(
            BlockKind::ParentRef {
                source: ParentSource::Number
            }
            .needs_value()
        );
        assert!(BlockKind::LegacyParentRef.needs_value());
        assert!(!BlockKind::Literal { text: "x".into() }.needs_value());
        assert!(!BlockKind::AutoNumber { padding: 3 }.needs_value());
        assert!(!BlockKind::Suffix.needs_value());
    }
}
