use clap::{Parser, Subcommand};

mod args;
mod commands;
mod preprocess;
mod util;

#[derive(Parser)]
#[command(name = "collection-schema", about = "Content collection schema utilities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a collection's JSON-Schema with its declarative schema source
    Merge(commands::merge::Args),
    /// Convert a generated JSON-Schema into the field list only
    Parse(commands::parse::Args),
    /// List image and reference annotations found in a declarative source
    Annotations(commands::annotations::Args),
}

fn main() {
    util::init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Merge(args) => commands::merge::run(args),
        Commands::Parse(args) => commands::parse::run(args),
        Commands::Annotations(args) => commands::annotations::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
