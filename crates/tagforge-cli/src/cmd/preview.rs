//! `tg preview` — live tag preview without creating anything.

use anyhow::bail;
use clap::Args;

use crate::cmd::{find_template, parse_set};
use crate::output::OutputMode;
use crate::store::Store;
use tagforge_core::config::load_project_config;
use tagforge_core::compute_preview;

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Template id or name.
    #[arg(short, long)]
    pub template: String,

    /// Block values as BLOCK=VALUE (repeatable).
    #[arg(short, long)]
    pub set: Vec<String>,

    /// Parent tag (id or full tag) for parent-reference blocks.
    #[arg(long)]
    pub parent: Option<String>,
}

pub fn run_preview(
    args: &PreviewArgs,
    project_flag: Option<&str>,
    output: OutputMode,
    root: &std::path::Path,
) -> anyhow::Result<()> {
    let store = Store::open(root)?;
    let project_id = store.project_id(project_flag)?;
    let config = load_project_config(root)?;
    let values = parse_set(&args.set)?;

    let template = find_template(&store.state.dataset, &project_id, &args.template)?;
    let parent = match &args.parent {
        Some(key) => match store.state.dataset.find_tag(&project_id, key) {
            Some(tag) => Some(tag),
            None => bail!("unknown parent tag '{key}'"),
        },
        None => None,
    };

    let preview = compute_preview(
        &store.state.dataset,
        &store.state.counters,
        &config,
        template,
        &values,
        parent,
    );

    if output.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "preview": preview }))?
        );
    } else {
        println!("{preview}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_args_accept_repeated_set() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: PreviewArgs,
        }
        let w = Wrapper::parse_from([
            "test",
            "--template",
            "Std",
            "--set",
            "b1=HVAC",
            "--set",
            "b3=210",
        ]);
        assert_eq!(w.args.set.len(), 2);
        assert!(w.args.parent.is_none());
    }
}
