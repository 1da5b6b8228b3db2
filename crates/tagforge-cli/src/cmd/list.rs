//! `tg list` — list tags in the register.

use clap::Args;
use std::io::{self, Write};
use std::str::FromStr;

use crate::output::{OutputMode, Renderable, render_list};
use crate::store::Store;
use tagforge_core::{Tag, TagStatus};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by status: draft, active, review, approved, archived, reserved.
    #[arg(short, long)]
    pub status: Option<String>,

    /// Substring filter on the full tag or notes.
    #[arg(long)]
    pub search: Option<String>,

    /// Maximum tags to show.
    #[arg(short = 'n', long, default_value = "50")]
    pub limit: usize,
}

struct TagRow {
    id: String,
    full_tag: String,
    status: String,
    notes: String,
}

impl From<&Tag> for TagRow {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id.clone(),
            full_tag: tag.full_tag.clone(),
            status: tag.status.to_string(),
            notes: tag.notes.clone().unwrap_or_default(),
        }
    }
}

impl Renderable for TagRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{:<24} {:<9} {}",
            self.full_tag,
            self.status,
            &self.id[..8.min(self.id.len())]
        )
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        let value = serde_json::json!({
            "id": self.id,
            "full_tag": self.full_tag,
            "status": self.status,
            "notes": self.notes,
        });
        serde_json::to_writer_pretty(w, &value).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}  {}  {}", self.id, self.full_tag, self.status)
    }

    fn table_headers() -> &'static [&'static str] {
        &["id", "full_tag", "status"]
    }
}

pub fn run_list(
    args: &ListArgs,
    project_flag: Option<&str>,
    output: OutputMode,
    root: &std::path::Path,
) -> anyhow::Result<()> {
    let store = Store::open(root)?;
    let project_id = store.project_id(project_flag)?;

    let status = args
        .status
        .as_deref()
        .map(TagStatus::from_str)
        .transpose()?;
    let needle = args.search.as_deref().map(str::to_lowercase);

    let rows: Vec<TagRow> = store
        .state
        .dataset
        .tags_in(&project_id)
        .filter(|t| status.is_none_or(|s| t.status == s))
        .filter(|t| {
            needle.as_deref().is_none_or(|n| {
                t.full_tag.to_lowercase().contains(n)
                    || t.notes.as_deref().is_some_and(|notes| notes.to_lowercase().contains(n))
            })
        })
        .take(args.limit)
        .map(TagRow::from)
        .collect();

    render_list(&rows, output)?;
    Ok(())
}
