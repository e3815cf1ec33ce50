use collection_schema::{Annotation, FieldAnnotation, extract_annotations};
use serde_json::{Value, json};

use crate::args::ConfigArgs;
use crate::preprocess::strip_comments;
use crate::util::{print_json, read_input};

#[derive(clap::Args)]
pub struct Args {
    /// Path to the declarative schema source (use - for stdin)
    pub file: String,
    /// Collection name used in log messages
    #[arg(short, long, default_value = "<unnamed>")]
    pub collection: String,
    /// Do not strip comments before scanning
    #[arg(long)]
    pub keep_comments: bool,
    /// Pretty print JSON output
    #[arg(short, long)]
    pub pretty: bool,
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let mut contents = read_input(&args.file)?;
    if !args.keep_comments {
        contents = strip_comments(&contents);
    }

    let extraction = extract_annotations(&args.collection, &contents, &args.config.to_config());
    for failure in &extraction.failures {
        eprintln!("warning: {failure}");
    }

    let annotations: Vec<Value> = extraction.annotations.iter().map(annotation_json).collect();
    print_json(&annotations, args.pretty)
}

fn annotation_json(annotation: &FieldAnnotation) -> Value {
    let (kind, collection) = match &annotation.annotation {
        Annotation::Image => ("image", None),
        Annotation::Reference { collection } => ("reference", Some(collection.as_str())),
    };
    json!({
        "path": annotation.path,
        "kind": kind,
        "collection": collection,
        "array": annotation.array_wrapped,
        "offset": annotation.offset,
    })
}
