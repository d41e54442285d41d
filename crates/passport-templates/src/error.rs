/// Template layer errors.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    #[error("duplicate template: {0}")]
    DuplicateTemplate(String),

    #[error("template {template} references result {result}, which has not been resolved")]
    MissingDependency { template: String, result: String },

    #[error("invalid template {name}: {reason}")]
    InvalidDefinition { name: String, reason: String },

    #[error("recipe output {0} was never produced")]
    MissingOutput(String),
}
