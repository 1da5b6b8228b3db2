//! Parent inheritance: copying resolved values from a selected parent tag
//! into a new tag's parent-reference blocks.

use crate::model::block::{BlockKind, ParentSource};
use crate::model::tag::Tag;
use crate::model::template::Template;

/// Resolve one parent-reference source against the selected parent.
///
/// `parent_template` must be the template the parent was generated from;
/// values are read out of `parent.parts` by block id. Returns `None` when
/// the parent does not carry the requested value (e.g. its template has no
/// auto-number block, or no recognized WBS category).
#[must_use]
pub fn resolve_parent_ref(
    source: ParentSource,
    parent: &Tag,
    parent_template: &Template,
    wbs_categories: &[String],
) -> Option<String> {
    match source {
        ParentSource::FullTag => Some(parent.full_tag.clone()),
        ParentSource::Number => {
            let (block, _) = parent_template.auto_number()?;
            parent.parts.get(&block.id).cloned()
        }
        ParentSource::WbsCode => {
            let block = parent_template.blocks.iter().find(|b| match &b.kind {
                BlockKind::Dictionary { category } => {
                    let category = category.to_lowercase();
                    wbs_categories.iter().any(|c| c.to_lowercase() == category)
                }
                _ => false,
            })?;
            parent.parts.get(&block.id).cloned()
        }
    }
}
