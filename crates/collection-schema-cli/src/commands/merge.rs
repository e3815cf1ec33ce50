use collection_schema::{Fidelity, SchemaMerger};
use tracing::info;

use crate::args::ConfigArgs;
use crate::preprocess::strip_comments;
use crate::util::{print_json, read_optional_input};

#[derive(clap::Args)]
pub struct Args {
    /// Collection name (the definition looked up in the JSON-Schema)
    pub collection: String,
    /// Path to the generated JSON-Schema (use - for stdin)
    #[arg(short = 'j', long)]
    pub json_schema: Option<String>,
    /// Path to the declarative schema source (use - for stdin)
    #[arg(short = 's', long)]
    pub source: Option<String>,
    /// Do not strip comments from the declarative source
    #[arg(long)]
    pub keep_comments: bool,
    /// Pretty print JSON output
    #[arg(short, long)]
    pub pretty: bool,
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    if args.json_schema.as_deref() == Some("-") && args.source.as_deref() == Some("-") {
        anyhow::bail!("Only one input can be read from stdin");
    }

    let json_schema = read_optional_input(args.json_schema.as_deref())?;
    let source = read_optional_input(args.source.as_deref())?.map(|text| {
        if args.keep_comments {
            text
        } else {
            strip_comments(&text)
        }
    });

    let merger = SchemaMerger::new(args.config.to_config());
    let merged = merger.merge(&args.collection, json_schema.as_deref(), source.as_deref())?;

    for diagnostic in &merged.diagnostics {
        eprintln!("warning: {diagnostic}");
    }
    if merged.fidelity == Fidelity::Degraded {
        eprintln!(
            "warning: `{}` uses the declarative source only; constraints and precise types are unavailable",
            args.collection
        );
    }
    info!(
        collection = %args.collection,
        fields = merged.schema.fields.len(),
        "schema merged"
    );

    print_json(&merged.schema, args.pretty)
}
