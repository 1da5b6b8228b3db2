//! `tg edit` — change a tag's part values through the assembly invariant.

use anyhow::bail;
use clap::Args;

use crate::cmd::parse_set;
use crate::output::{CliError, OutputMode, render_error, render_success};
use crate::store::Store;
use crate::user;
use tagforge_core::edit::update_parts;

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Tag record id or full tag string.
    pub tag: String,

    /// Part changes as BLOCK=VALUE (repeatable).
    #[arg(short, long, required = true)]
    pub set: Vec<String>,
}

pub fn run_edit(
    args: &EditArgs,
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

    let changes = parse_set(&args.set)?;
    let mut store = Store::open(root)?;
    let project_id = store.project_id(project_flag)?;

    let Some(index) = store
        .state
        .dataset
        .tags
        .iter()
        .position(|t| t.project_id == project_id && (t.id == args.tag || t.full_tag == args.tag))
    else {
        bail!("no tag matching '{}'", args.tag);
    };

    let template_id = store.state.dataset.tags[index].template_id.clone();
    let Some(template) = store.state.dataset.template(&project_id, &template_id).cloned() else {
        bail!("tag '{}' has no template; only notes can be edited", args.tag);
    };

    let tag = &mut store.state.dataset.tags[index];
    let changed = update_parts(tag, &template, &changes, &actor);
    if changed.is_empty() {
        render_success(output, "No changes")?;
        return Ok(());
    }

    let new_full = tag.full_tag.clone();
    if store
        .state
        .dataset
        .tags_in(&project_id)
        .filter(|t| t.full_tag == new_full)
        .count()
        > 1
    {
        bail!("edit would duplicate existing tag '{new_full}'; aborted");
    }

    store.save()?;
    render_success(
        output,
        &format!("Updated {} part(s); tag is now {new_full}", changed.len()),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_args_require_set() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: EditArgs,
        }
        let w = Wrapper::parse_from(["test", "P-21001", "--set", "b1=ELEC"]);
        assert_eq!(w.args.tag, "P-21001");
        assert_eq!(w.args.set, ["b1=ELEC"]);
        assert!(Wrapper::try_parse_from(["test", "P-21001"]).is_err());
    }
}
