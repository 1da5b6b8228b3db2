//! `tg assembly` — expand an abstract component tree against a root tag.

use anyhow::Context;
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::output::{CliError, OutputMode, Renderable, render_error, render_list, render_success};
use crate::store::Store;
use crate::user;
use tagforge_core::{AssemblyComponent, ExpandedTag, expand_assembly, instantiate_assembly};

#[derive(Args, Debug)]
pub struct AssemblyArgs {
    /// JSON file holding the component tree (`{name, prefix, children}`).
    #[arg(short, long)]
    pub file: PathBuf,

    /// Root tag string, e.g. "AHU-101". Descendants inherit its number.
    #[arg(short, long)]
    pub root: String,

    /// Create draft tags instead of just previewing the expansion.
    #[arg(long)]
    pub commit: bool,
}

struct ExpandedRow<'a>(&'a ExpandedTag);

impl Renderable for ExpandedRow<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let indent = if self.0.parent_ref.is_some() { "  └ " } else { "" };
        writeln!(w, "{indent}{:<16} {}", self.0.full_tag, self.0.description)
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(w, self.0).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}  {}", self.0.full_tag, self.0.description)
    }

    fn table_headers() -> &'static [&'static str] {
        &["full_tag", "role"]
    }
}

pub fn run_assembly(
    args: &AssemblyArgs,
    user_flag: Option<&str>,
    project_flag: Option<&str>,
    output: OutputMode,
    root: &std::path::Path,
) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let tree: AssemblyComponent = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;

    let expanded = expand_assembly(&tree, &args.root);

    if !args.commit {
        let rows: Vec<ExpandedRow<'_>> = expanded.iter().map(ExpandedRow).collect();
        render_list(&rows, output)?;
        return Ok(());
    }

    let actor = match user::require_user(user_flag, None) {
        Ok(a) => a,
        Err(e) => {
            render_error(
                output,
                &CliError::with_details(&e.message, "Set --user, TAGFORGE_USER, or USER", e.code),
            )?;
            anyhow::bail!("{}", e.message);
        }
    };

    let mut store = Store::open(root)?;
    let project_id = store.project_id(project_flag)?;

    let duplicates: Vec<&str> = expanded
        .iter()
        .filter(|r| store.state.dataset.tag_exists(&project_id, &r.full_tag))
        .map(|r| r.full_tag.as_str())
        .collect();
    if !duplicates.is_empty() {
        render_error(
            output,
            &CliError::with_details(
                format!("expansion collides with existing tags: {}", duplicates.join(", ")),
                "Pick a different root tag or archive the existing tags",
                "duplicate_code",
            ),
        )?;
        anyhow::bail!("assembly collision");
    }

    let tags = instantiate_assembly(&expanded, &project_id, &actor);
    let count = tags.len();
    store.state.dataset.tags.extend(tags);
    store.save()?;
    render_success(output, &format!("Imported {count} tags from assembly"))?;
    Ok(())
}
