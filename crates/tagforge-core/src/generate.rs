//! Tag assembly and batch generation.
//!
//! [`generate`] turns a template plus user-chosen block values into one or
//! more concrete [`Tag`] records, pulling the batch's start number from the
//! counter engine once and then iterating in sequence (number increments) or
//! parallel (letter suffix increments) mode. A collision with any existing or
//! just-produced tag halts the batch; tags assembled before the collision are
//! still returned (best-effort partial, never a rollback).

use chrono::Utc;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ProjectConfig;
use crate::counter::{UNRESOLVED_MARK, compute_prefix, next_number, peek_next_number};
use crate::dataset::{Counters, Dataset};
use crate::inherit::resolve_parent_ref;
use crate::model::block::BlockKind;
use crate::model::tag::{AuditEntry, Tag, TagStatus};
use crate::model::template::{Template, TemplateError};
use crate::resolve::resolve_global_var;

/// How a batch iterates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerateMode {
    /// Consecutive numbers, constant suffix.
    #[default]
    Sequence,
    /// One number, iterating letter suffixes (A, B, C, …).
    Parallel,
}

/// User-input validation errors that refuse generation.
///
/// Structural template defects surface as [`GenerateError::Template`], a
/// configuration error rather than bad input; everything else here is
/// something the caller can fix on the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("template requires a parent selection before generating")]
    MissingParent,
    #[error("parent-reference block '{block_id}' did not resolve to a value")]
    ParentFieldUnresolved { block_id: String },
    #[error("parallel mode requires a suffix block in the template")]
    ParallelWithoutSuffix,
    #[error("quantity {quantity} outside allowed range 1..={max}")]
    QuantityOutOfRange { quantity: usize, max: usize },
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl GenerateError {
    /// Stable code identifier for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingParent => "E2001",
            Self::ParentFieldUnresolved { .. } => "E2002",
            Self::ParallelWithoutSuffix => "E2003",
            Self::QuantityOutOfRange { .. } => "E2004",
            Self::Template(e) => e.code(),
        }
    }
}

/// One batch-generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    pub template: &'a Template,
    /// Block id → user-chosen value (dictionary codes, suffix letter,
    /// legacy parent text).
    pub values: &'a BTreeMap<String, String>,
    pub quantity: usize,
    pub mode: GenerateMode,
    /// Inheritance source for `ParentRef` blocks.
    pub parent: Option<&'a Tag>,
    /// Hierarchy placement for created tags. Independent from `parent`:
    /// a tag may inherit from one tag and be nested under another.
    pub nest_under: Option<String>,
    /// Actor recorded in each created tag's history.
    pub actor: &'a str,
}

/// Result of a batch run.
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub created: Vec<Tag>,
    /// True when the batch stopped early on a duplicate full tag.
    pub stopped_on_collision: bool,
}

/// Letter suffix for parallel slot `i`: A..Z, then AA, AB, …
#[must_use]
pub fn suffix_letters(mut i: usize) -> String {
    let mut out = Vec::new();
    loop {
        #[allow(clippy::cast_possible_truncation)]
        out.push(b'A' + (i % 26) as u8);
        i /= 26;
        if i == 0 {
            break;
        }
        i -= 1;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Resolve every non-fixed, non-iterating block to its concrete value.
///
/// Missing dictionary/variable/legacy values resolve to the empty string per
/// the resolution-gap rule; unresolved parent references are hard errors.
fn resolve_values(
    dataset: &Dataset,
    config: &ProjectConfig,
    request: &GenerateRequest<'_>,
) -> Result<BTreeMap<String, String>, GenerateError> {
    let template = request.template;
    let mut resolved = BTreeMap::new();

    for block in &template.blocks {
        let value = match &block.kind {
            BlockKind::Literal { text } | BlockKind::Separator { text } => text.clone(),
            BlockKind::Dictionary { .. } | BlockKind::LegacyParentRef | BlockKind::Suffix => {
                request.values.get(&block.id).cloned().unwrap_or_default()
            }
            BlockKind::GlobalVar { key } => resolve_global_var(dataset, &template.project_id, key)
                .map(|v| v.value.clone())
                .unwrap_or_default(),
            BlockKind::ParentRef { source } => {
                let parent = request.parent.ok_or(GenerateError::MissingParent)?;
                let parent_template =
                    dataset.template(&parent.project_id, &parent.template_id);
                let value = parent_template
                    .and_then(|pt| {
                        resolve_parent_ref(*source, parent, pt, &config.inherit.wbs_categories)
                    })
                    .filter(|v| !v.is_empty());
                value.ok_or_else(|| GenerateError::ParentFieldUnresolved {
                    block_id: block.id.clone(),
                })?
            }
            BlockKind::AutoNumber { .. } => continue,
        };
        resolved.insert(block.id.clone(), value);
    }

    Ok(resolved)
}

/// Generate a batch of tags.
///
/// The start number is taken from [`next_number`] once for the whole batch,
/// so the counter records it as issued even if the batch later collides.
///
/// # Errors
///
/// [`GenerateError`] for refused input; structural template defects come
/// through as [`GenerateError::Template`].
pub fn generate(
    dataset: &Dataset,
    counters: &mut Counters,
    config: &ProjectConfig,
    request: &GenerateRequest<'_>,
) -> Result<GenerateOutcome, GenerateError> {
    let template = request.template;
    template.validate()?;

    let max = config.generate.max_batch;
    if request.quantity == 0 || request.quantity > max {
        return Err(GenerateError::QuantityOutOfRange {
            quantity: request.quantity,
            max,
        });
    }

    let suffix_block = template.suffix_block();
    if request.mode == GenerateMode::Parallel && suffix_block.is_none() {
        return Err(GenerateError::ParallelWithoutSuffix);
    }

    if template.requires_parent() && request.parent.is_none() {
        return Err(GenerateError::MissingParent);
    }

    let resolved = resolve_values(dataset, config, request)?;
    let prefix = compute_prefix(template, &resolved);
    let auto = template.auto_number();
    let start = auto.map(|_| next_number(dataset, counters, &template.project_id, &prefix));

    let mut created: Vec<Tag> = Vec::with_capacity(request.quantity);
    let mut stopped_on_collision = false;

    for i in 0..request.quantity {
        let mut parts = resolved.clone();

        if let (Some((block, padding)), Some(start)) = (auto, start) {
            let number = match request.mode {
                GenerateMode::Sequence => start + i as u64,
                GenerateMode::Parallel => start,
            };
            parts.insert(block.id.clone(), format!("{number:0padding$}"));
        }

        if let Some(block) = suffix_block {
            if request.mode == GenerateMode::Parallel {
                parts.insert(block.id.clone(), suffix_letters(i));
            }
        }

        let full_tag: String = template
            .blocks
            .iter()
            .filter_map(|b| parts.get(&b.id).map(String::as_str))
            .collect();

        let collides = dataset.tag_exists(&template.project_id, &full_tag)
            || created.iter().any(|t| t.full_tag == full_tag);
        if collides {
            warn!(%full_tag, produced = created.len(), "collision halted batch");
            stopped_on_collision = true;
            break;
        }

        let now = Utc::now();
        created.push(Tag {
            id: Uuid::new_v4().to_string(),
            project_id: template.project_id.clone(),
            template_id: template.id.clone(),
            full_tag,
            parts,
            status: TagStatus::Draft,
            parent_id: request.nest_under.clone(),
            notes: None,
            history: vec![AuditEntry {
                action: "Created".to_string(),
                user: request.actor.to_string(),
                timestamp: now,
                details: None,
            }],
            created_at: now,
        });
    }

    debug!(
        template = %template.id,
        requested = request.quantity,
        produced = created.len(),
        "batch generated"
    );
    Ok(GenerateOutcome {
        created,
        stopped_on_collision,
    })
}

/// Best-effort live preview of the next tag this template would produce.
///
/// Unresolved dictionary and parent blocks render as `?`, missing global
/// variables as `{KEY}`, and the number block as `#` padding until every
/// input block is filled — at which point the real next number is peeked
/// (without advancing the counter).
#[must_use]
pub fn compute_preview(
    dataset: &Dataset,
    counters: &Counters,
    config: &ProjectConfig,
    template: &Template,
    values: &BTreeMap<String, String>,
    parent: Option<&Tag>,
) -> String {
    let mut resolved = values.clone();
    let mut complete = true;

    for block in &template.blocks {
        match &block.kind {
            BlockKind::GlobalVar { key } => {
                match resolve_global_var(dataset, &template.project_id, key) {
                    Some(var) => {
                        resolved.insert(block.id.clone(), var.value.clone());
                    }
                    None => {
                        complete = false;
                        resolved.insert(block.id.clone(), format!("{{{key}}}"));
                    }
                }
            }
            BlockKind::ParentRef { source } => {
                let value = parent.and_then(|p| {
                    dataset
                        .template(&p.project_id, &p.template_id)
                        .and_then(|pt| {
                            resolve_parent_ref(*source, p, pt, &config.inherit.wbs_categories)
                        })
                });
                match value.filter(|v| !v.is_empty()) {
                    Some(v) => {
                        resolved.insert(block.id.clone(), v);
                    }
                    None => complete = false,
                }
            }
            BlockKind::Dictionary { .. } | BlockKind::LegacyParentRef => {
                if resolved.get(&block.id).is_none_or(|v| v.is_empty()) {
                    complete = false;
                }
            }
            _ => {}
        }
    }

    let number_text = template.auto_number().map(|(_, padding)| {
        if complete {
            let prefix = compute_prefix(template, &resolved);
            let next = peek_next_number(dataset, counters, &template.project_id, &prefix);
            format!("{next:0padding$}")
        } else {
            "#".repeat(padding)
        }
    });

    let mut out = String::new();
    for block in &template.blocks {
        match &block.kind {
            BlockKind::Literal { text } | BlockKind::Separator { text } => out.push_str(text),
            BlockKind::AutoNumber { .. } => {
                if let Some(ref text) = number_text {
                    out.push_str(text);
                }
            }
            BlockKind::Suffix => {
                if let Some(v) = resolved.get(&block.id) {
                    out.push_str(v);
                }
            }
            _ => out.push_str(resolved.get(&block.id).map_or(UNRESOLVED_MARK, String::as_str)),
        }
    }
    out
}
