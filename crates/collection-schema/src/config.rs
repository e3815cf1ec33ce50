/// Which JSON-Schema key supplies a field's description when both are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptionSource {
    #[default]
    Description,
    MarkdownDescription,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Name of the zero-argument helper marking image fields.
    pub image_helper: String,
    /// Name of the single-string-argument helper marking reference fields.
    pub reference_helper: String,
    pub description_source: DescriptionSource,
    /// `required` for fields synthesized from the declarative source alone.
    pub degraded_required: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_helper: "image".to_string(),
            reference_helper: "reference".to_string(),
            description_source: DescriptionSource::Description,
            degraded_required: true,
        }
    }
}
