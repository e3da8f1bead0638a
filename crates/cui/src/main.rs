use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;

mod config;
mod file_walker;
mod lint;
mod list;
mod migrate;
mod pipeline;
mod report;

#[derive(Parser)]
#[command(name = "cui")]
#[command(about = "Migrate and lint projects that use Circuit UI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite source files with a codemod
    #[command(alias = "m")]
    Migrate(migrate::MigrateArgs),

    /// Check source files for outdated Circuit UI usage
    #[command(alias = "l")]
    Lint(lint::LintArgs),

    /// List available codemods and lint rules
    List(list::ListArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default level depends on --debug; RUST_LOG still wins.
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    match cli.command {
        Commands::Migrate(args) => migrate::execute(args),
        Commands::Lint(args) => lint::execute(args),
        Commands::List(args) => list::execute(args),
    }
}
