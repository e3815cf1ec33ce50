//! Shared argument definitions.

use collection_schema::{Config, DescriptionSource};

/// Engine options.
///
/// Can be embedded in other command Args using `#[command(flatten)]`.
#[derive(clap::Args, Clone)]
pub struct ConfigArgs {
    /// Name of the helper marking image fields
    #[arg(long, default_value = "image")]
    pub image_helper: String,

    /// Name of the helper marking reference fields
    #[arg(long, default_value = "reference")]
    pub reference_helper: String,

    /// Prefer `markdownDescription` over `description`
    #[arg(long)]
    pub prefer_markdown_description: bool,

    /// Mark fields synthesized from the declarative source alone as optional
    #[arg(long)]
    pub degraded_optional: bool,
}

impl ConfigArgs {
    /// Build the engine Config from command-line arguments.
    pub fn to_config(&self) -> Config {
        Config {
            image_helper: self.image_helper.clone(),
            reference_helper: self.reference_helper.clone(),
            description_source: if self.prefer_markdown_description {
                DescriptionSource::MarkdownDescription
            } else {
                DescriptionSource::Description
            },
            degraded_required: !self.degraded_optional,
        }
    }
}
