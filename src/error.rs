use thiserror::Error;

pub type EodResult<T> = Result<T, EodError>;

#[derive(Error, Debug)]
pub enum EodError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bad user input: no worksheets, unreadable template
    #[error("Invalid input: {0}")]
    InputShape(String),

    /// The template does not match the configured layout
    #[error("Template configuration error: {0}")]
    TemplateConfig(String),

    #[error("Invalid report layout: {0}")]
    Layout(String),

    #[error("Invalid cell reference: {0}")]
    Address(String),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl EodError {
    /// Input-shape and template errors mean "fix the files", not "fix the tool"
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            EodError::InputShape(_) | EodError::TemplateConfig(_) | EodError::Layout(_)
        )
    }
}
