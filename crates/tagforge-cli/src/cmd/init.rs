//! `tg init` — initialize a tag register in the current directory.

use chrono::Utc;
use clap::Args;
use uuid::Uuid;

use crate::output::{OutputMode, render_success};
use crate::store::Store;
use tagforge_core::Project;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Name of the initial project.
    #[arg(long, default_value = "Main")]
    pub name: String,
}

pub fn run_init(args: &InitArgs, output: OutputMode, root: &std::path::Path) -> anyhow::Result<()> {
    let project = Project {
        id: Uuid::new_v4().to_string(),
        name: args.name.clone(),
        description: String::new(),
        created_at: Utc::now(),
    };
    Store::init(root, project)?;
    render_success(
        output,
        &format!("Initialized tag register with project '{}'", args.name),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_args_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: InitArgs,
        }
        let w = Wrapper::parse_from(["test"]);
        assert_eq!(w.args.name, "Main");
    }
}
