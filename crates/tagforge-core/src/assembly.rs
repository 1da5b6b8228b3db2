//! Assembly pattern expansion.
//!
//! An assembly is an abstract equipment hierarchy (roles with fixed
//! prefixes). Given one root tag string typed by the user, every descendant
//! shares the root's trailing numeric identity but carries its own prefix:
//! root `AHU-101` with a child prefixed `M` yields `M-101`. This generator
//! bypasses templates entirely and operates on the tag string alone.

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;

use crate::model::tag::{AuditEntry, Tag, TagStatus};

/// Template id recorded on tags created from an assembly.
pub const ASSEMBLY_TEMPLATE_ID: &str = "assembly";

static PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)([a-zA-Z]*)$").expect("static pattern compiles"));

/// One node of an abstract component tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyComponent {
    /// Role name, e.g. "Supply Fan Motor".
    pub name: String,
    /// Role prefix, e.g. "M" or "TE".
    #[serde(default)]
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub children: Vec<AssemblyComponent>,
}

/// One flattened expansion record, linked by temporary ids until persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedTag {
    pub full_tag: String,
    /// Temporary id of this node, referenced by children's `parent_ref`.
    pub temp_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ref: Option<String>,
    pub description: String,
}

/// Trailing `(digits)(letters)` pattern of a root tag string.
///
/// The longest digit run immediately followed by the longest letter run at
/// the very end of the string; both empty when the string has no trailing
/// number, in which case descendants collapse to their bare prefix (the
/// expander does not detect the resulting duplicates).
#[must_use]
pub fn extract_pattern(root: &str) -> (String, String) {
    PATTERN.captures(root).map_or_else(
        || (String::new(), String::new()),
        |caps| {
            let number = caps.get(1).map_or("", |m| m.as_str()).to_string();
            let suffix = caps.get(2).map_or("", |m| m.as_str()).to_string();
            (number, suffix)
        },
    )
}

fn traverse(
    node: &AssemblyComponent,
    parent_temp_id: Option<&str>,
    root_tag: &str,
    number: &str,
    suffix: &str,
    out: &mut Vec<ExpandedTag>,
) {
    let full_tag = if parent_temp_id.is_none() {
        root_tag.to_string()
    } else {
        format!("{}-{number}{suffix}", node.prefix)
    };

    let temp_id = Uuid::new_v4().to_string();
    out.push(ExpandedTag {
        full_tag,
        temp_id: temp_id.clone(),
        parent_ref: parent_temp_id.map(ToString::to_string),
        description: node.name.clone(),
    });

    for child in &node.children {
        traverse(child, Some(&temp_id), root_tag, number, suffix, out);
    }
}

/// Expand an abstract component tree against one root tag string.
///
/// The root node takes `root_tag` verbatim; every descendant gets
/// `{prefix}-{number}{suffix}` from the root's extracted pattern. Records
/// are flattened depth-first, preserving parent linkage via temporary ids.
#[must_use]
pub fn expand_assembly(root: &AssemblyComponent, root_tag: &str) -> Vec<ExpandedTag> {
    let (number, suffix) = extract_pattern(root_tag);
    let mut out = Vec::new();
    traverse(root, None, root_tag, &number, &suffix, &mut out);
    out
}

/// Turn expansion records into draft tags, mapping temp-id linkage onto the
/// created record ids.
///
/// The created tags carry empty `parts` (assembly tags have no template
/// blocks) and a single import history entry.
#[must_use]
pub fn instantiate_assembly(
    expanded: &[ExpandedTag],
    project_id: &str,
    actor: &str,
) -> Vec<Tag> {
    let now = Utc::now();
    expanded
        .iter()
        .map(|record| Tag {
            id: record.temp_id.clone(),
            project_id: project_id.to_string(),
            template_id: ASSEMBLY_TEMPLATE_ID.to_string(),
            full_tag: record.full_tag.clone(),
            parts: std::collections::BTreeMap::new(),
            status: TagStatus::Draft,
            parent_id: record.parent_ref.clone(),
            notes: Some(record.description.clone()),
            history: vec![AuditEntry {
                action: "Imported from assembly".to_string(),
                user: actor.to_string(),
                timestamp: now,
                details: None,
            }],
            created_at: now,
        })
        .collect()
}
