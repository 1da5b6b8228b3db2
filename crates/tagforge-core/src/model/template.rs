use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::block::{BlockKind, TemplateBlock};

/// Default zero-padding for auto-number blocks that omit one in stored data.
pub const DEFAULT_PADDING: usize = 3;

/// Structural template errors.
///
/// These indicate a malformed template definition (a configuration bug), not
/// bad user input, and are kept distinct from generation-time validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template '{template_id}' has more than one auto-number block")]
    DuplicateAutoNumber { template_id: String },
    #[error("template '{template_id}' has more than one suffix block")]
    DuplicateSuffix { template_id: String },
}

impl TemplateError {
    /// Stable code identifier for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DuplicateAutoNumber { .. } => "E3001",
            Self::DuplicateSuffix { .. } => "E3002",
        }
    }
}

/// An ordered block sequence defining how a tag string is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub blocks: Vec<TemplateBlock>,
    pub created_at: DateTime<Utc>,
}

impl Template {
    /// Check structural invariants: at most one auto-number block and at most
    /// one suffix block.
    ///
    /// # Errors
    ///
    /// [`TemplateError`] naming the violated invariant.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let numbers = self
            .blocks
            .iter()
            .filter(|b| matches!(b.kind, BlockKind::AutoNumber { .. }))
            .count();
        if numbers > 1 {
            return Err(TemplateError::DuplicateAutoNumber {
                template_id: self.id.clone(),
            });
        }

        let suffixes = self
            .blocks
            .iter()
            .filter(|b| matches!(b.kind, BlockKind::Suffix))
            .count();
        if suffixes > 1 {
            return Err(TemplateError::DuplicateSuffix {
                template_id: self.id.clone(),
            });
        }

        Ok(())
    }

    /// The auto-number block and its padding, if the template has one.
    #[must_use]
    pub fn auto_number(&self) -> Option<(&TemplateBlock, usize)> {
        self.blocks.iter().find_map(|b| match b.kind {
            BlockKind::AutoNumber { padding } => {
                let padding = if padding == 0 { DEFAULT_PADDING } else { padding };
                Some((b, padding))
            }
            _ => None,
        })
    }

    /// The suffix block, if the template has one.
    #[must_use]
    pub fn suffix_block(&self) -> Option<&TemplateBlock> {
        self.blocks
            .iter()
            .find(|b| matches!(b.kind, BlockKind::Suffix))
    }

    /// Blocks that resolve from a selected parent tag.
    pub fn parent_ref_blocks(&self) -> impl Iterator<Item = &TemplateBlock> {
        self.blocks
            .iter()
            .filter(|b| matches!(b.kind, BlockKind::ParentRef { .. }))
    }

    /// Whether generation must refuse to run until a parent tag is selected.
    #[must_use]
    pub fn requires_parent(&self) -> bool {
        self.parent_ref_blocks().next().is_some()
    }

    /// Blocks strictly preceding the auto-number block (or, if absent, the
    /// suffix block). Their resolved values form the tag's prefix.
    #[must_use]
    pub fn prefix_blocks(&self) -> &[TemplateBlock] {
        let cut = self
            .blocks
            .iter()
            .position(|b| matches!(b.kind, BlockKind::AutoNumber { .. }))
            .or_else(|| {
                self.blocks
                    .iter()
                    .position(|b| matches!(b.kind, BlockKind::Suffix))
            })
            .unwrap_or(self.blocks.len());
        &self.blocks[..cut]
    }
}
