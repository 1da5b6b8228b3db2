#![forbid(unsafe_code)]

mod cmd;
mod output;
mod store;
mod user;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tagforge: equipment tag templating and numbering",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Override the acting user recorded in tag history.
    #[arg(long, global = true)]
    user: Option<String>,

    /// Work in this project (id or name) instead of the active one.
    #[arg(short, long, global = true)]
    project: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }

    fn project_flag(&self) -> Option<&str> {
        self.project.as_deref()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Setup",
        about = "Initialize a tag register",
        after_help = "EXAMPLES:\n    # Initialize with the default project\n    tg init\n\n    # Name the first project\n    tg init --name \"Alpha Plant\""
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Manage and select projects",
        after_help = "EXAMPLES:\n    tg project add \"Beta Extension\"\n    tg project use \"Beta Extension\"\n    tg project list"
    )]
    Project(cmd::project::ProjectArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Inspect and import templates",
        after_help = "EXAMPLES:\n    tg template add standard.json\n    tg template show Standard"
    )]
    Template(cmd::template::TemplateArgs),

    #[command(
        next_help_heading = "Generation",
        about = "Preview the next tag without creating it",
        after_help = "EXAMPLES:\n    tg preview --template Standard --set b1=PRJ1 --set b3=HVAC"
    )]
    Preview(cmd::preview::PreviewArgs),

    #[command(
        next_help_heading = "Generation",
        about = "Generate tags from a template",
        after_help = "EXAMPLES:\n    # Three consecutive numbers\n    tg generate --template Standard --set b1=PRJ1 --set b3=HVAC --quantity 3\n\n    # Parallel equipment: one number, suffixes A/B/C\n    tg generate --template Pumps --set b1=P --quantity 3 --parallel"
    )]
    Generate(cmd::generate::GenerateArgs),

    #[command(
        next_help_heading = "Generation",
        about = "Peek the next free number for a prefix",
        after_help = "EXAMPLES:\n    tg next --prefix P-210"
    )]
    Next(cmd::next::NextArgs),

    #[command(
        next_help_heading = "Generation",
        about = "Expand an assembly against a root tag",
        after_help = "EXAMPLES:\n    # Preview\n    tg assembly --file ahu.json --root AHU-101\n\n    # Create draft tags\n    tg assembly --file ahu.json --root AHU-101 --commit"
    )]
    Assembly(cmd::assembly::AssemblyArgs),

    #[command(
        next_help_heading = "Registry",
        about = "List tags",
        after_help = "EXAMPLES:\n    tg list --status draft\n    tg list --search AHU"
    )]
    List(cmd::list::ListArgs),

    #[command(next_help_heading = "Registry", about = "Show one tag in full")]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Registry",
        about = "Transition a tag's status",
        after_help = "EXAMPLES:\n    tg status PRJ1-HVAC-001 active"
    )]
    Status(cmd::status::StatusArgs),

    #[command(
        next_help_heading = "Registry",
        about = "Edit a tag's part values",
        after_help = "EXAMPLES:\n    tg edit PRJ1-HVAC-001 --set b3=ELEC"
    )]
    Edit(cmd::edit::EditArgs),

    #[command(next_help_heading = "Registry", about = "Set or clear a tag's notes")]
    Note(cmd::note::NoteArgs),

    #[command(
        next_help_heading = "Reference data",
        about = "Dictionary categories and codes",
        after_help = "EXAMPLES:\n    tg dict add \"Система\" HVAC \"ОВиК\"\n    tg dict list --category \"Система\""
    )]
    Dict(cmd::dict::DictArgs),

    #[command(next_help_heading = "Reference data", about = "Project-scoped variables")]
    Var(cmd::var::VarArgs),

    #[command(
        next_help_heading = "Reference data",
        about = "Reserved number ranges",
        after_help = "EXAMPLES:\n    tg range add --scope P-210 --start 660 --end 666 --reason \"superstition\""
    )]
    Range(cmd::range::RangeArgs),

    #[command(next_help_heading = "Maintenance", about = "Inspect or rebuild number counters")]
    Counters(cmd::counters::CountersArgs),
}

fn init_tracing(json_output: bool) {
    let filter = EnvFilter::try_from_env("TAGFORGE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "debug"
        } else {
            "warn"
        })
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json_output {
        registry.with(fmt::layer().json().with_ansi(false)).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let output = cli.output_mode();
    init_tracing(output.is_json());

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let root = std::env::current_dir()?;

    // Fold the user-config identity into the chain here so command handlers
    // only see one flag: --user > TAGFORGE_USER > user config > USER.
    let user_config = tagforge_core::config::load_user_config().unwrap_or_default();
    let actor = user::resolve_user(cli.user.as_deref(), user_config.user.as_deref());

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, output, &root),
        Commands::Project(ref args) => cmd::project::run_project(args, output, &root),
        Commands::Template(ref args) => {
            cmd::template::run_template(args, cli.project_flag(), output, &root)
        }
        Commands::Preview(ref args) => {
            cmd::preview::run_preview(args, cli.project_flag(), output, &root)
        }
        Commands::Generate(ref args) => cmd::generate::run_generate(
            args,
            actor.as_deref(),
            cli.project_flag(),
            output,
            &root,
        ),
        Commands::Next(ref args) => cmd::next::run_next(args, cli.project_flag(), output, &root),
        Commands::Assembly(ref args) => cmd::assembly::run_assembly(
            args,
            actor.as_deref(),
            cli.project_flag(),
            output,
            &root,
        ),
        Commands::List(ref args) => cmd::list::run_list(args, cli.project_flag(), output, &root),
        Commands::Show(ref args) => cmd::show::run_show(args, cli.project_flag(), output, &root),
        Commands::Status(ref args) => cmd::status::run_status(
            args,
            actor.as_deref(),
            cli.project_flag(),
            output,
            &root,
        ),
        Commands::Edit(ref args) => {
            cmd::edit::run_edit(args, actor.as_deref(), cli.project_flag(), output, &root)
        }
        Commands::Note(ref args) => {
            cmd::note::run_note(args, actor.as_deref(), cli.project_flag(), output, &root)
        }
        Commands::Dict(ref args) => cmd::dict::run_dict(args, cli.project_flag(), output, &root),
        Commands::Var(ref args) => cmd::var::run_var(args, cli.project_flag(), output, &root),
        Commands::Range(ref args) => cmd::range::run_range(args, cli.project_flag(), output, &root),
        Commands::Counters(ref args) => {
            cmd::counters::run_counters(args, cli.project_flag(), output, &root)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn global_flags_parse_anywhere() {
        let cli = Cli::parse_from(["tg", "list", "--json", "--project", "Alpha"]);
        assert!(cli.json);
        assert_eq!(cli.project.as_deref(), Some("Alpha"));
    }

    #[test]
    fn generate_subcommand_parses() {
        let cli = Cli::parse_from([
            "tg", "generate", "--template", "Std", "--set", "b1=P", "--quantity", "2",
        ]);
        match cli.command {
            super::Commands::Generate(args) => {
                assert_eq!(args.quantity, 2);
            }
            _ => panic!("expected generate"),
        }
    }
}
