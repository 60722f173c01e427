use thiserror::Error;

/// Type alias of the [`Result`] type specific to `sea-spool`.
pub type SpoolResult<T, E> = std::result::Result<T, SpoolErr<E>>;

#[derive(Error, Debug)]
/// Common errors that may occur.
pub enum SpoolErr<E: std::error::Error> {
    #[error("TemplateErr: {0}")]
    Template(#[from] TemplateErr),
    #[error("Config Error: {0}")]
    Config(String),
    #[error("Backend error: {0}")]
    Backend(E),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Errors that may happen when compiling a filename template
pub enum TemplateErr {
    #[error("Unknown template field: `{0}`")]
    UnknownField(String),
    #[error("Invalid placeholder at byte {0}")]
    InvalidPlaceholder(usize),
}
