//! Edge cases: collisions, inheritance, cold caches, assembly oddities.

use chrono::Utc;
use std::collections::BTreeMap;

use tagforge_core::{
    AssemblyComponent, BlockKind, CounterKey, Counters, Dataset, GenerateMode, GenerateRequest,
    ParentSource, ProjectConfig, Tag, TagStatus, Template, TemplateBlock, expand_assembly,
    generate, instantiate_assembly, next_number,
};

const PROJECT: &str = "p1";

fn template(blocks: Vec<TemplateBlock>) -> Template {
    Template {
        id: "t1".to_string(),
        project_id: PROJECT.to_string(),
        name: String::new(),
        description: String::new(),
        blocks,
        created_at: Utc::now(),
    }
}

fn numbered_template() -> Template {
    template(vec![
        TemplateBlock::new(
            "b1",
            BlockKind::Literal {
                text: "P-".to_string(),
            },
        ),
        TemplateBlock::new("b2", BlockKind::AutoNumber { padding: 3 }),
    ])
}

fn existing_tag(full_tag: &str, template: &Template, number: &str) -> Tag {
    let mut parts = BTreeMap::new();
    parts.insert("b1".to_string(), "P-".to_string());
    parts.insert("b2".to_string(), number.to_string());
    Tag {
        id: format!("tag-{full_tag}"),
        project_id: PROJECT.to_string(),
        template_id: template.id.clone(),
        full_tag: full_tag.to_string(),
        parts,
        status: TagStatus::Active,
        parent_id: None,
        notes: None,
        history: Vec::new(),
        created_at: Utc::now(),
    }
}

#[test]
fn collision_halts_but_keeps_earlier_tags() {
    // P-004 exists (imported outside the counter's view) while the counter
    // believes it last issued 1. The batch of 5 runs 2, 3, then hits 4:
    // exactly 2 of 5 commit, nothing rolls back.
    let t = numbered_template();
    let dataset = Dataset {
        tags: vec![existing_tag("P-004", &t, "004")],
        ..Dataset::default()
    };
    let mut counters = Counters::default();
    counters.set(CounterKey::new(PROJECT, "P-"), 1);
    let values = BTreeMap::new();

    let outcome = generate(
        &dataset,
        &mut counters,
        &ProjectConfig::default(),
        &GenerateRequest {
            template: &t,
            values: &values,
            quantity: 5,
            mode: GenerateMode::Sequence,
            parent: None,
            nest_under: None,
            actor: "tests",
        },
    )
    .unwrap();

    assert!(outcome.stopped_on_collision);
    let tags: Vec<&str> = outcome.created.iter().map(|t| t.full_tag.as_str()).collect();
    assert_eq!(tags, ["P-002", "P-003"]);
}

#[test]
fn template_without_number_collides_on_second_item() {
    let t = template(vec![TemplateBlock::new(
        "b1",
        BlockKind::Literal {
            text: "FIXED".to_string(),
        },
    )]);
    let dataset = Dataset::default();
    let mut counters = Counters::default();
    let values = BTreeMap::new();

    let outcome = generate(
        &dataset,
        &mut counters,
        &ProjectConfig::default(),
        &GenerateRequest {
            template: &t,
            values: &values,
            quantity: 3,
            mode: GenerateMode::Sequence,
            parent: None,
            nest_under: None,
            actor: "tests",
        },
    )
    .unwrap();

    assert!(outcome.stopped_on_collision);
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.created[0].full_tag, "FIXED");
}

#[test]
fn inherited_values_flow_from_parent_tag() {
    let parent_template = Template {
        id: "tp".to_string(),
        ..numbered_template()
    };
    let parent = existing_tag("P-007", &parent_template, "007");
    let child_template = template(vec![
        TemplateBlock::new(
            "c1",
            BlockKind::ParentRef {
                source: ParentSource::FullTag,
            },
        ),
        TemplateBlock::new(
            "c2",
            BlockKind::Separator {
                text: "/".to_string(),
            },
        ),
        TemplateBlock::new(
            "c3",
            BlockKind::ParentRef {
                source: ParentSource::Number,
            },
        ),
        TemplateBlock::new("c4", BlockKind::AutoNumber { padding: 2 }),
    ]);
    let dataset = Dataset {
        tags: vec![parent.clone()],
        templates: vec![parent_template],
        ..Dataset::default()
    };
    let mut counters = Counters::default();
    let values = BTreeMap::new();

    let outcome = generate(
        &dataset,
        &mut counters,
        &ProjectConfig::default(),
        &GenerateRequest {
            template: &child_template,
            values: &values,
            quantity: 1,
            mode: GenerateMode::Sequence,
            parent: Some(&parent),
            nest_under: Some(parent.id.clone()),
            actor: "tests",
        },
    )
    .unwrap();

    let tag = &outcome.created[0];
    assert_eq!(tag.full_tag, "P-007/00701");
    assert_eq!(tag.parent_id.as_deref(), Some(parent.id.as_str()));
}

#[test]
fn counters_rebuild_matches_tag_scan() {
    let t = numbered_template();
    let dataset = Dataset {
        tags: vec![
            existing_tag("P-003", &t, "003"),
            existing_tag("P-009", &t, "009"),
        ],
        ..Dataset::default()
    };
    let mut counters = Counters::default();
    counters.set(CounterKey::new(PROJECT, "P-"), 1); // stale
    counters.set(CounterKey::new(PROJECT, "Z-"), 4); // orphaned

    counters.rebuild(&dataset);
    assert_eq!(counters.get(&CounterKey::new(PROJECT, "P-")), Some(9));
    assert_eq!(counters.get(&CounterKey::new(PROJECT, "Z-")), None);

    assert_eq!(next_number(&dataset, &mut counters, PROJECT, "P-"), 10);
}

#[test]
fn assembly_commit_avoids_template_machinery() {
    let tree = AssemblyComponent {
        name: "Pump skid".to_string(),
        prefix: "P".to_string(),
        description: None,
        children: vec![AssemblyComponent {
            name: "Drive motor".to_string(),
            prefix: "M".to_string(),
            description: None,
            children: Vec::new(),
        }],
    };
    let records = expand_assembly(&tree, "P-200");
    let tags = instantiate_assembly(&records, PROJECT, "importer");

    assert_eq!(tags[0].full_tag, "P-200");
    assert_eq!(tags[1].full_tag, "M-200");
    assert_eq!(tags[1].parent_id.as_deref(), Some(tags[0].id.as_str()));
    assert!(tags.iter().all(|t| t.template_id == "assembly"));
}
