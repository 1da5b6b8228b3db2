//! `tg template` — inspect and import tag templates.

use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Deserialize;
use std::io::{self, Write};
use std::path::PathBuf;
use uuid::Uuid;

use crate::cmd::find_template;
use crate::output::{OutputMode, Renderable, pretty_kv, pretty_section, render_item, render_list, render_success};
use crate::store::Store;
use tagforge_core::{Template, TemplateBlock};

#[derive(Args, Debug)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub action: TemplateAction,
}

#[derive(Subcommand, Debug)]
pub enum TemplateAction {
    /// Import a template definition from a JSON file.
    Add {
        /// JSON file with `{name, description?, blocks}`.
        file: PathBuf,
    },
    /// List templates in the active project.
    List,
    /// Show one template's block sequence.
    Show { template: String },
}

/// On-disk import shape: everything but identity and ownership.
#[derive(Debug, Deserialize)]
struct TemplateSpec {
    name: String,
    #[serde(default)]
    description: String,
    blocks: Vec<TemplateBlock>,
}

struct TemplateRow {
    id: String,
    name: String,
    blocks: usize,
}

impl Renderable for TemplateRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}  [{}] ({} blocks)", self.name, self.id, self.blocks)
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        let value = serde_json::json!({
            "id": self.id,
            "name": self.name,
            "blocks": self.blocks,
        });
        serde_json::to_writer_pretty(w, &value).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}  {}  {}", self.id, self.name, self.blocks)
    }

    fn table_headers() -> &'static [&'static str] {
        &["id", "name", "blocks"]
    }
}

struct TemplateDetails(Template);

impl Renderable for TemplateDetails {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        pretty_section(w, &self.0.name)?;
        pretty_kv(w, "id", &self.0.id)?;
        if !self.0.description.is_empty() {
            pretty_kv(w, "description", &self.0.description)?;
        }
        pretty_kv(w, "requires", if self.0.requires_parent() { "parent selection" } else { "-" })?;
        writeln!(w)?;
        for block in &self.0.blocks {
            let detail = block.kind.fixed_text().map_or_else(
                || match &block.kind {
                    tagforge_core::BlockKind::Dictionary { category } => category.clone(),
                    tagforge_core::BlockKind::GlobalVar { key } => key.clone(),
                    tagforge_core::BlockKind::AutoNumber { padding } => format!("padding {padding}"),
                    tagforge_core::BlockKind::ParentRef { source } => source.to_string(),
                    _ => String::new(),
                },
                ToString::to_string,
            );
            writeln!(w, "  {:<10} {:<18} {detail}", block.id, block.kind.name())?;
        }
        Ok(())
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(w, &self.0).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        for block in &self.0.blocks {
            writeln!(w, "{}  {}  {}", self.0.id, block.id, block.kind.name())?;
        }
        Ok(())
    }

    fn table_headers() -> &'static [&'static str] {
        &["template", "block", "kind"]
    }
}

pub fn run_template(
    args: &TemplateArgs,
    project_flag: Option<&str>,
    output: OutputMode,
    root: &std::path::Path,
) -> anyhow::Result<()> {
    let mut store = Store::open(root)?;
    let project_id = store.project_id(project_flag)?;

    match &args.action {
        TemplateAction::Add { file } => {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let spec: TemplateSpec = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            if spec.blocks.is_empty() {
                bail!("template '{}' has no blocks", spec.name);
            }

            let template = Template {
                id: Uuid::new_v4().to_string(),
                project_id,
                name: spec.name.clone(),
                description: spec.description,
                blocks: spec.blocks,
                created_at: Utc::now(),
            };
            template.validate()?;
            store.state.dataset.templates.push(template);
            store.save()?;
            render_success(output, &format!("Imported template '{}'", spec.name))?;
        }
        TemplateAction::List => {
            let rows: Vec<TemplateRow> = store
                .state
                .dataset
                .templates_in(&project_id)
                .map(|t| TemplateRow {
                    id: t.id.clone(),
                    name: t.name.clone(),
                    blocks: t.blocks.len(),
                })
                .collect();
            render_list(&rows, output)?;
        }
        TemplateAction::Show { template } => {
            let found = find_template(&store.state.dataset, &project_id, template)?;
            render_item(&TemplateDetails(found.clone()), output)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_show_parses_selector() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: TemplateArgs,
        }
        let w = Wrapper::parse_from(["test", "show", "Standard"]);
        match w.args.action {
            TemplateAction::Show { template } => assert_eq!(template, "Standard"),
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn template_spec_deserializes_blocks() {
        let json = r#"{
            "name": "Std",
            "blocks": [
                {"id": "b1", "type": "dictionary", "category": "Система"},
                {"id": "b2", "type": "separator", "text": "-"},
                {"id": "b3", "type": "auto_number", "padding": 3}
            ]
        }"#;
        let spec: TemplateSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.name, "Std");
        assert_eq!(spec.blocks.len(), 3);
    }
}
