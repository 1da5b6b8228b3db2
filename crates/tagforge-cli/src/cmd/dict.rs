//! `tg dict` — dictionary categories and codes.

use clap::{Args, Subcommand};
use std::io::{self, Write};
use uuid::Uuid;

use crate::output::{CliError, OutputMode, Renderable, render_error, render_list, render_success};
use crate::store::Store;
use tagforge_core::DictionaryItem;
use tagforge_core::resolve::code_is_unique;

#[derive(Args, Debug)]
pub struct DictArgs {
    #[command(subcommand)]
    pub action: DictAction,
}

#[derive(Subcommand, Debug)]
pub enum DictAction {
    /// Add one dictionary code. Refuses duplicates within the category.
    Add {
        /// Category name, e.g. "Система".
        category: String,
        /// Code emitted into tags, e.g. "HVAC".
        code: String,
        /// Human value behind the code.
        value: String,
        /// Optional sub-category.
        #[arg(long)]
        sub_category: Option<String>,
        /// Optional description.
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List codes, optionally of one category.
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
}

struct DictRow {
    category: String,
    code: String,
    value: String,
}

impl Renderable for DictRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{:<20} {:<8} {}", self.category, self.code, self.value)
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        let value = serde_json::json!({
            "category": self.category,
            "code": self.code,
            "value": self.value,
        });
        serde_json::to_writer_pretty(w, &value).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}  {}  {}", self.category, self.code, self.value)
    }

    fn table_headers() -> &'static [&'static str] {
        &["category", "code", "value"]
    }
}

pub fn run_dict(
    args: &DictArgs,
    project_flag: Option<&str>,
    output: OutputMode,
    root: &std::path::Path,
) -> anyhow::Result<()> {
    let mut store = Store::open(root)?;
    let project_id = store.project_id(project_flag)?;

    match &args.action {
        DictAction::Add {
            category,
            code,
            value,
            sub_category,
            description,
        } => {
            if !code_is_unique(&store.state.dataset, &project_id, category, code) {
                render_error(
                    output,
                    &CliError::with_details(
                        format!("code '{code}' already exists in category '{category}'"),
                        "Codes must be unique per category for unambiguous resolution",
                        "duplicate_code",
                    ),
                )?;
                anyhow::bail!("duplicate dictionary code");
            }

            store.state.dataset.dictionaries.push(DictionaryItem {
                id: Uuid::new_v4().to_string(),
                project_id,
                category: category.clone(),
                sub_category: sub_category.clone(),
                code: code.clone(),
                value: value.clone(),
                description: description.clone().unwrap_or_default(),
            });
            store.save()?;
            render_success(output, &format!("Added {category}/{code}"))?;
        }
        DictAction::List { category } => {
            let rows: Vec<DictRow> = store
                .state
                .dataset
                .dictionaries
                .iter()
                .filter(|d| d.project_id == project_id)
                .filter(|d| category.as_deref().is_none_or(|c| d.category == c))
                .map(|d| DictRow {
                    category: d.category.clone(),
                    code: d.code.clone(),
                    value: d.value.clone(),
                })
                .collect();
            render_list(&rows, output)?;
        }
    }
    Ok(())
}
