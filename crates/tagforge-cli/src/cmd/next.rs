//! `tg next` — peek the next free number for a prefix.

use clap::Args;

use crate::output::OutputMode;
use crate::store::Store;
use tagforge_core::peek_next_number;

#[derive(Args, Debug)]
pub struct NextArgs {
    /// The literal prefix preceding the number, e.g. "P-210".
    #[arg(long)]
    pub prefix: String,
}

pub fn run_next(
    args: &NextArgs,
    project_flag: Option<&str>,
    output: OutputMode,
    root: &std::path::Path,
) -> anyhow::Result<()> {
    let store = Store::open(root)?;
    let project_id = store.project_id(project_flag)?;

    let next = peek_next_number(
        &store.state.dataset,
        &store.state.counters,
        &project_id,
        &args.prefix,
    );

    if output.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "prefix": args.prefix,
                "next": next,
            }))?
        );
    } else {
        println!("{next}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_args_require_prefix() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: NextArgs,
        }
        let w = Wrapper::parse_from(["test", "--prefix", "P-210"]);
        assert_eq!(w.args.prefix, "P-210");
        assert!(Wrapper::try_parse_from(["test"]).is_err());
    }
}
