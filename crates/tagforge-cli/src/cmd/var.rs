//! `tg var` — project-scoped global variables.

use clap::{Args, Subcommand};
use std::io::{self, Write};
use uuid::Uuid;

use crate::output::{OutputMode, Renderable, render_list, render_success};
use crate::store::Store;
use tagforge_core::GlobalVariable;

#[derive(Args, Debug)]
pub struct VarArgs {
    #[command(subcommand)]
    pub action: VarAction,
}

#[derive(Subcommand, Debug)]
pub enum VarAction {
    /// Set a variable, creating or replacing its value.
    Set {
        /// Variable key (case-sensitive in templates).
        key: String,
        /// Current value.
        value: String,
        /// Optional description.
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List variables.
    List,
}

struct VarRow {
    key: String,
    value: String,
}

impl Renderable for VarRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{:<16} {}", self.key, self.value)
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        let value = serde_json::json!({ "key": self.key, "value": self.value });
        serde_json::to_writer_pretty(w, &value).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}  {}", self.key, self.value)
    }

    fn table_headers() -> &'static [&'static str] {
        &["key", "value"]
    }
}

pub fn run_var(
    args: &VarArgs,
    project_flag: Option<&str>,
    output: OutputMode,
    root: &std::path::Path,
) -> anyhow::Result<()> {
    let mut store = Store::open(root)?;
    let project_id = store.project_id(project_flag)?;

    match &args.action {
        VarAction::Set {
            key,
            value,
            description,
        } => {
            let existing = store
                .state
                .dataset
                .global_variables
                .iter_mut()
                .find(|v| v.project_id == project_id && &v.key == key);
            match existing {
                Some(var) => {
                    var.value = value.clone();
                    if let Some(d) = description {
                        var.description = d.clone();
                    }
                }
                None => store.state.dataset.global_variables.push(GlobalVariable {
                    id: Uuid::new_v4().to_string(),
                    project_id,
                    key: key.clone(),
                    value: value.clone(),
                    description: description.clone().unwrap_or_default(),
                }),
            }
            store.save()?;
            render_success(output, &format!("{key} = {value}"))?;
        }
        VarAction::List => {
            let rows: Vec<VarRow> = store
                .state
                .dataset
                .global_variables
                .iter()
                .filter(|v| v.project_id == project_id)
                .map(|v| VarRow {
                    key: v.key.clone(),
                    value: v.value.clone(),
                })
                .collect();
            render_list(&rows, output)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_set_is_positional() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: VarArgs,
        }
        let w = Wrapper::parse_from(["test", "set", "SITE", "A1"]);
        match w.args.action {
            VarAction::Set { key, value, .. } => {
                assert_eq!(key, "SITE");
                assert_eq!(value, "A1");
            }
            VarAction::List => panic!("expected set"),
        }
    }
}
