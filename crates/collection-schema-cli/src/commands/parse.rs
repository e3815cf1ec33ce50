use collection_schema::parse_json_schema;

use crate::args::ConfigArgs;
use crate::util::{print_json, read_input};

#[derive(clap::Args)]
pub struct Args {
    /// Path to the generated JSON-Schema (use - for stdin)
    pub file: String,
    /// Collection name (the definition looked up in the JSON-Schema)
    #[arg(short, long)]
    pub collection: String,
    /// Pretty print JSON output
    #[arg(short, long)]
    pub pretty: bool,
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let contents = read_input(&args.file)?;
    let schema = parse_json_schema(&contents, &args.collection, &args.config.to_config())?;
    print_json(&schema, args.pretty)
}
