//! `tg range` — reserved number ranges.

use anyhow::bail;
use clap::{Args, Subcommand};
use std::io::{self, Write};
use uuid::Uuid;

use crate::output::{OutputMode, Renderable, render_list, render_success};
use crate::store::Store;
use tagforge_core::ReservedRange;

#[derive(Args, Debug)]
pub struct RangeArgs {
    #[command(subcommand)]
    pub action: RangeAction,
}

#[derive(Subcommand, Debug)]
pub enum RangeAction {
    /// Reserve an inclusive number range for one prefix scope.
    Add {
        /// Prefix the range applies to, e.g. "P-210".
        #[arg(long)]
        scope: String,
        /// First reserved number (inclusive).
        #[arg(long)]
        start: u64,
        /// Last reserved number (inclusive).
        #[arg(long)]
        end: u64,
        /// Why the range is withheld.
        #[arg(short, long, default_value = "")]
        reason: String,
    },
    /// List reserved ranges.
    List,
}

struct RangeRow {
    scope: String,
    start: u64,
    end: u64,
    reason: String,
}

impl Renderable for RangeRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{:<12} {:>6}..={:<6} {}",
            self.scope, self.start, self.end, self.reason
        )
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        let value = serde_json::json!({
            "scope": self.scope,
            "start": self.start,
            "end": self.end,
            "reason": self.reason,
        });
        serde_json::to_writer_pretty(w, &value).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}  {}  {}  {}", self.scope, self.start, self.end, self.reason)
    }

    fn table_headers() -> &'static [&'static str] {
        &["scope", "start", "end", "reason"]
    }
}

pub fn run_range(
    args: &RangeArgs,
    project_flag: Option<&str>,
    output: OutputMode,
    root: &std::path::Path,
) -> anyhow::Result<()> {
    let mut store = Store::open(root)?;
    let project_id = store.project_id(project_flag)?;

    match &args.action {
        RangeAction::Add {
            scope,
            start,
            end,
            reason,
        } => {
            if start > end {
                bail!("range start {start} is after end {end}");
            }
            store.state.dataset.reserved_ranges.push(ReservedRange {
                id: Uuid::new_v4().to_string(),
                project_id,
                scope: scope.clone(),
                start: *start,
                end: *end,
                reason: reason.clone(),
            });
            store.save()?;
            render_success(output, &format!("Reserved {scope} {start}..={end}"))?;
        }
        RangeAction::List => {
            let rows: Vec<RangeRow> = store
                .state
                .dataset
                .reserved_ranges
                .iter()
                .filter(|r| r.project_id == project_id)
                .map(|r| RangeRow {
                    scope: r.scope.clone(),
                    start: r.start,
                    end: r.end,
                    reason: r.reason.clone(),
                })
                .collect();
            render_list(&rows, output)?;
        }
    }
    Ok(())
}
