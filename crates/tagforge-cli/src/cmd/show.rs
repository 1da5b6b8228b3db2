//! `tg show` — full details for a single tag.

use anyhow::bail;
use clap::Args;
use std::io::{self, Write};

use crate::output::{OutputMode, Renderable, pretty_kv, pretty_section, render_item};
use crate::store::Store;
use tagforge_core::Tag;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Tag record id or full tag string.
    pub tag: String,
}

struct TagDetails(Tag);

impl Renderable for TagDetails {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let tag = &self.0;
        pretty_section(w, &tag.full_tag)?;
        pretty_kv(w, "id", &tag.id)?;
        pretty_kv(w, "status", tag.status.to_string())?;
        pretty_kv(w, "template", &tag.template_id)?;
        if let Some(ref parent) = tag.parent_id {
            pretty_kv(w, "nested under", parent)?;
        }
        if let Some(ref notes) = tag.notes {
            pretty_kv(w, "notes", notes)?;
        }
        pretty_kv(w, "created", tag.created_at.to_rfc3339())?;

        if !tag.parts.is_empty() {
            writeln!(w)?;
            writeln!(w, "parts")?;
            for (block_id, value) in &tag.parts {
                writeln!(w, "  {block_id:<10} {value}")?;
            }
        }

        if !tag.history.is_empty() {
            writeln!(w)?;
            writeln!(w, "history")?;
            for entry in &tag.history {
                write!(
                    w,
                    "  {}  {} by {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.action,
                    entry.user
                )?;
                match entry.details {
                    Some(ref details) => writeln!(w, " ({details})")?,
                    None => writeln!(w)?,
                }
            }
        }
        Ok(())
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(w, &self.0).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}  {}  {}", self.0.id, self.0.full_tag, self.0.status)
    }

    fn table_headers() -> &'static [&'static str] {
        &["id", "full_tag", "status"]
    }
}

pub fn run_show(
    args: &ShowArgs,
    project_flag: Option<&str>,
    output: OutputMode,
    root: &std::path::Path,
) -> anyhow::Result<()> {
    let store = Store::open(root)?;
    let project_id = store.project_id(project_flag)?;

    let Some(tag) = store.state.dataset.find_tag(&project_id, &args.tag) else {
        bail!("no tag matching '{}'", args.tag);
    };
    render_item(&TagDetails(tag.clone()), output)?;
    Ok(())
}
