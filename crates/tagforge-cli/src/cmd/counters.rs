//! `tg counters` — inspect or rebuild the per-prefix counter cache.

use clap::{Args, Subcommand};
use std::io::{self, Write};

use crate::output::{OutputMode, Renderable, render_list, render_success};
use crate::store::Store;

#[derive(Args, Debug)]
pub struct CountersArgs {
    #[command(subcommand)]
    pub action: CountersAction,
}

#[derive(Subcommand, Debug)]
pub enum CountersAction {
    /// Show cached last-issued numbers.
    Show,
    /// Recompute every cached entry from the tag set.
    Rebuild,
}

struct CounterRow {
    prefix: String,
    last_issued: u64,
}

impl Renderable for CounterRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{:<16} {}", self.prefix, self.last_issued)
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        let value = serde_json::json!({
            "prefix": self.prefix,
            "last_issued": self.last_issued,
        });
        serde_json::to_writer_pretty(w, &value).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}  {}", self.prefix, self.last_issued)
    }

    fn table_headers() -> &'static [&'static str] {
        &["prefix", "last_issued"]
    }
}

pub fn run_counters(
    args: &CountersArgs,
    project_flag: Option<&str>,
    output: OutputMode,
    root: &std::path::Path,
) -> anyhow::Result<()> {
    let mut store = Store::open(root)?;
    let project_id = store.project_id(project_flag)?;

    match args.action {
        CountersAction::Show => {
            let rows: Vec<CounterRow> = store
                .state
                .counters
                .entries()
                .filter(|(key, _)| key.project_id == project_id)
                .map(|(key, last_issued)| CounterRow {
                    prefix: key.prefix.clone(),
                    last_issued,
                })
                .collect();
            render_list(&rows, output)?;
        }
        CountersAction::Rebuild => {
            store.state.counters.rebuild(&store.state.dataset);
            store.save()?;
            render_success(output, "Counters rebuilt from the tag register")?;
        }
    }
    Ok(())
}
