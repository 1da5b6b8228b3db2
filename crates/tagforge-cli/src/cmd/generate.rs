//! `tg generate` — create tags from a template.

use anyhow::bail;
use clap::Args;
use std::io::{self, Write};

use crate::cmd::{find_template, parse_set};
use crate::output::{CliError, OutputMode, Renderable, render_error, render_list};
use crate::store::Store;
use crate::user;
use tagforge_core::config::load_project_config;
use tagforge_core::{GenerateMode, GenerateRequest, Tag, generate};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Template id or name.
    #[arg(short, long)]
    pub template: String,

    /// Block values as BLOCK=VALUE (repeatable).
    #[arg(short, long)]
    pub set: Vec<String>,

    /// How many tags to create.
    #[arg(short, long, default_value = "1")]
    pub quantity: usize,

    /// Parallel mode: one number, iterating letter suffixes.
    #[arg(long)]
    pub parallel: bool,

    /// Parent tag (id or full tag) to inherit parent-reference values from.
    #[arg(long)]
    pub parent: Option<String>,

    /// Tag (id or full tag) to nest the created tags under in the hierarchy.
    #[arg(long)]
    pub nest: Option<String>,
}

struct CreatedRow {
    full_tag: String,
    id: String,
    status: String,
}

impl From<&Tag> for CreatedRow {
    fn from(tag: &Tag) -> Self {
        Self {
            full_tag: tag.full_tag.clone(),
            id: tag.id.clone(),
            status: tag.status.to_string(),
        }
    }
}

impl Renderable for CreatedRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "  {}  [{}]", self.full_tag, &self.id[..8.min(self.id.len())])
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        let value = serde_json::json!({
            "id": self.id,
            "full_tag": self.full_tag,
            "status": self.status,
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

pub fn run_generate(
    args: &GenerateArgs,
    user_flag: Option<&str>,
    project_flag: Option<&str>,
    output: OutputMode,
    root: &std::path::Path,
) -> anyhow::Result<()> {
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
    let config = load_project_config(root)?;
    let values = parse_set(&args.set)?;

    let template = find_template(&store.state.dataset, &project_id, &args.template)?.clone();

    let parent = match &args.parent {
        Some(key) => match store.state.dataset.find_tag(&project_id, key) {
            Some(tag) => Some(tag.clone()),
            None => bail!("unknown parent tag '{key}'"),
        },
        None => None,
    };
    let nest_under = match &args.nest {
        Some(key) => match store.state.dataset.find_tag(&project_id, key) {
            Some(tag) => Some(tag.id.clone()),
            None => bail!("unknown tag '{key}' for --nest"),
        },
        None => None,
    };

    let mode = if args.parallel {
        GenerateMode::Parallel
    } else {
        GenerateMode::Sequence
    };

    let outcome = match generate(
        &store.state.dataset,
        &mut store.state.counters,
        &config,
        &GenerateRequest {
            template: &template,
            values: &values,
            quantity: args.quantity,
            mode,
            parent: parent.as_ref(),
            nest_under,
            actor: &actor,
        },
    ) {
        Ok(outcome) => outcome,
        Err(e) => {
            render_error(
                output,
                &CliError::with_details(e.to_string(), "Fix the request and retry", e.code()),
            )?;
            anyhow::bail!("{e}");
        }
    };

    let rows: Vec<CreatedRow> = outcome.created.iter().map(CreatedRow::from).collect();
    let produced = outcome.created.len();
    store.state.dataset.tags.extend(outcome.created);
    store.save()?;

    if !output.is_json() {
        let note = if outcome.stopped_on_collision {
            " (stopped on collision)"
        } else {
            ""
        };
        println!("Created {produced} of {} tags{note}", args.quantity);
    }
    render_list(&rows, output)?;

    if outcome.stopped_on_collision {
        render_error(
            output,
            &CliError::new(format!(
                "duplicate full tag stopped the batch after {produced} of {}",
                args.quantity
            )),
        )?;
    }
    Ok(())
}
