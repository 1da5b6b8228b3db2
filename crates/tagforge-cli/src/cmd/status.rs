//! `tg status` — transition a tag's lifecycle status.

use anyhow::bail;
use clap::Args;
use std::str::FromStr;

use crate::output::{CliError, OutputMode, render_error, render_success};
use crate::store::Store;
use crate::user;
use tagforge_core::TagStatus;
use tagforge_core::edit::set_status;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Tag record id or full tag string.
    pub tag: String,

    /// New status: draft, active, review, approved, archived, reserved.
    pub status: String,
}

pub fn run_status(
    args: &StatusArgs,
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

    let status = TagStatus::from_str(&args.status)?;

    let mut store = Store::open(root)?;
    let project_id = store.project_id(project_flag)?;
    let Some(tag) = store
        .state
        .dataset
        .tags
        .iter_mut()
        .find(|t| t.project_id == project_id && (t.id == args.tag || t.full_tag == args.tag))
    else {
        bail!("no tag matching '{}'", args.tag);
    };

    let full_tag = tag.full_tag.clone();
    set_status(tag, status, &actor);
    store.save()?;
    render_success(output, &format!("{full_tag} is now {status}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_args_are_positional() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: StatusArgs,
        }
        let w = Wrapper::parse_from(["test", "P-21001", "active"]);
        assert_eq!(w.args.tag, "P-21001");
        assert_eq!(w.args.status, "active");
    }
}
