//! Manual tag edits.
//!
//! Edits never touch `full_tag` directly: changed parts are applied, the
//! full string is re-assembled from the template block order, and a history
//! entry describing the diff is appended. This keeps the engine the sole
//! writer of the assembly invariant after creation.

use std::collections::BTreeMap;

use crate::model::tag::{AuditEntry, Tag, TagStatus};
use crate::model::template::Template;

/// Apply part-value changes to a tag, re-assembling `full_tag`.
///
/// `changes` maps block id → new value. Unknown block ids (not present in
/// the template) are ignored. Returns the list of block ids that actually
/// changed; an empty list means no edit happened and no history was written.
pub fn update_parts(
    tag: &mut Tag,
    template: &Template,
    changes: &BTreeMap<String, String>,
    actor: &str,
) -> Vec<String> {
    let mut diffs = Vec::new();
    let mut changed = Vec::new();

    for block in &template.blocks {
        let Some(new_value) = changes.get(&block.id) else {
            continue;
        };
        let old_value = tag.parts.get(&block.id).cloned().unwrap_or_default();
        if &old_value == new_value {
            continue;
        }
        diffs.push(format!("{}: '{}' -> '{}'", block.id, old_value, new_value));
        tag.parts.insert(block.id.clone(), new_value.clone());
        changed.push(block.id.clone());
    }

    if changed.is_empty() {
        return changed;
    }

    tag.full_tag = tag.assemble_from_parts(template);
    tag.history
        .push(AuditEntry::new("Edited", actor).with_details(diffs.join("; ")));
    changed
}

/// Transition a tag's status, recording the change.
pub fn set_status(tag: &mut Tag, status: TagStatus, actor: &str) {
    if tag.status == status {
        return;
    }
    let old = tag.status;
    tag.status = status;
    tag.history
        .push(AuditEntry::new("Status changed", actor).with_details(format!("{old} -> {status}")));
}

/// Replace a tag's notes, recording the change.
pub fn set_notes(tag: &mut Tag, notes: Option<String>, actor: &str) {
    if tag.notes == notes {
        return;
    }
    tag.notes = notes;
    tag.history.push(AuditEntry::new("Notes updated", actor));
}

#[cfg(test)]
mod tests {
    use super::{set_status, update_parts};
    use crate::model::block::{BlockKind, TemplateBlock};
    use crate::model::tag::{AuditEntry, Tag, TagStatus};
    use crate::model::template::Template;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn fixture() -> (Tag, Template) {
        let template = Template {
            id: "t1".to_string(),
            project_id: "p1".to_string(),
            name: String::new(),
            description: String::new(),
            blocks: vec![
                TemplateBlock::new(
                    "b1",
                    BlockKind::Dictionary {
                        category: "Система".into(),
                    },
                ),
                TemplateBlock::new("b2", BlockKind::Separator { text: "-".into() }),
                TemplateBlock::new("b3", BlockKind::AutoNumber { padding: 3 }),
            ],
            created_at: Utc::now(),
        };
        let mut parts = BTreeMap::new();
        parts.insert("b1".to_string(), "HVAC".to_string());
        parts.insert("b2".to_string(), "-".to_string());
        parts.insert("b3".to_string(), "001".to_string());
        let tag = Tag {
            id: "tag1".to_string(),
            project_id: "p1".to_string(),
            template_id: "t1".to_string(),
            full_tag: "HVAC-001".to_string(),
            parts,
            status: TagStatus::Draft,
            parent_id: None,
            notes: None,
            history: vec![AuditEntry::new("Created", "tests")],
            created_at: Utc::now(),
        };
        (tag, template)
    }

    #[test]
    fn edit_reassembles_full_tag_and_logs_diff() {
        let (mut tag, template) = fixture();
        let mut changes = BTreeMap::new();
        changes.insert("b1".to_string(), "ELEC".to_string());

        let changed = update_parts(&mut tag, &template, &changes, "editor");
        assert_eq!(changed, ["b1"]);
        assert_eq!(tag.full_tag, "ELEC-001");
        assert_eq!(tag.history.len(), 2);
        let entry = &tag.history[1];
        assert_eq!(entry.action, "Edited");
        assert_eq!(entry.user, "editor");
        assert_eq!(entry.details.as_deref(), Some("b1: 'HVAC' -> 'ELEC'"));
    }

    #[test]
    fn noop_edit_writes_no_history() {
        let (mut tag, template) = fixture();
        let mut changes = BTreeMap::new();
        changes.insert("b1".to_string(), "HVAC".to_string());
        changes.insert("b9".to_string(), "ignored".to_string());

        let changed = update_parts(&mut tag, &template, &changes, "editor");
        assert!(changed.is_empty());
        assert_eq!(tag.history.len(), 1);
        assert_eq!(tag.full_tag, "HVAC-001");
    }

    #[test]
    fn status_change_is_recorded_once() {
        let (mut tag, _) = fixture();
        set_status(&mut tag, TagStatus::Active, "editor");
        set_status(&mut tag, TagStatus::Active, "editor");
        assert_eq!(tag.status, TagStatus::Active);
        assert_eq!(tag.history.len(), 2);
        assert_eq!(
            tag.history[1].details.as_deref(),
            Some("draft -> active")
        );
    }
}
