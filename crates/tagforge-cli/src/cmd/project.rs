//! `tg project` — manage and select projects.

use anyhow::bail;
use chrono::Utc;
use clap::{Args, Subcommand};
use std::io::{self, Write};
use uuid::Uuid;

use crate::output::{OutputMode, Renderable, render_list, render_success};
use crate::store::Store;
use tagforge_core::Project;

#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub action: ProjectAction,
}

#[derive(Subcommand, Debug)]
pub enum ProjectAction {
    /// Add a new project.
    Add {
        /// Project name.
        name: String,
        /// Optional description.
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List projects.
    List,
    /// Select the active project by name or id.
    Use { name: String },
}

struct ProjectRow {
    id: String,
    name: String,
    description: String,
    active: bool,
}

impl Renderable for ProjectRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let marker = if self.active { "*" } else { " " };
        writeln!(w, "{marker} {}  [{}]", self.name, self.id)?;
        if !self.description.is_empty() {
            writeln!(w, "    {}", self.description)?;
        }
        Ok(())
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        let value = serde_json::json!({
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "active": self.active,
        });
        serde_json::to_writer_pretty(w, &value).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let marker = if self.active { "*" } else { "-" };
        writeln!(w, "{}  {}  {marker}", self.id, self.name)
    }

    fn table_headers() -> &'static [&'static str] {
        &["id", "name", "active"]
    }
}

pub fn run_project(
    args: &ProjectArgs,
    output: OutputMode,
    root: &std::path::Path,
) -> anyhow::Result<()> {
    let mut store = Store::open(root)?;

    match &args.action {
        ProjectAction::Add { name, description } => {
            if store.state.dataset.projects.iter().any(|p| &p.name == name) {
                bail!("project '{name}' already exists");
            }
            let project = Project {
                id: Uuid::new_v4().to_string(),
                name: name.clone(),
                description: description.clone().unwrap_or_default(),
                created_at: Utc::now(),
            };
            let id = project.id.clone();
            store.state.dataset.projects.push(project);
            if store.state.active_project.is_none() {
                store.state.active_project = Some(id);
            }
            store.save()?;
            render_success(output, &format!("Added project '{name}'"))?;
        }
        ProjectAction::List => {
            let rows: Vec<ProjectRow> = store
                .state
                .dataset
                .projects
                .iter()
                .map(|p| ProjectRow {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    description: p.description.clone(),
                    active: store.state.active_project.as_deref() == Some(p.id.as_str()),
                })
                .collect();
            render_list(&rows, output)?;
        }
        ProjectAction::Use { name } => {
            let id = store.project_id(Some(name))?;
            store.state.active_project = Some(id);
            store.save()?;
            render_success(output, &format!("Switched to project '{name}'"))?;
        }
    }
    Ok(())
}
