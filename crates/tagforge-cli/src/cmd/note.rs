//! `tg note` — set or clear a tag's notes.

use anyhow::bail;
use clap::Args;

use crate::output::{CliError, OutputMode, render_error, render_success};
use crate::store::Store;
use crate::user;
use tagforge_core::edit::set_notes;

#[derive(Args, Debug)]
pub struct NoteArgs {
    /// Tag record id or full tag string.
    pub tag: String,

    /// Note text. Omit together with --clear to remove the note.
    pub text: Option<String>,

    /// Remove the existing note.
    #[arg(long, conflicts_with = "text")]
    pub clear: bool,
}

pub fn run_note(
    args: &NoteArgs,
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

    if args.text.is_none() && !args.clear {
        bail!("provide note text or --clear");
    }

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
    set_notes(tag, args.text.clone(), &actor);
    store.save()?;
    let message = if args.clear {
        format!("Cleared notes on {full_tag}")
    } else {
        format!("Updated notes on {full_tag}")
    };
    render_success(output, &message)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_args_clear_conflicts_with_text() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: NoteArgs,
        }
        let w = Wrapper::parse_from(["test", "P-21001", "--clear"]);
        assert!(w.args.clear);
        assert!(Wrapper::try_parse_from(["test", "P-21001", "text", "--clear"]).is_err());
    }
}
