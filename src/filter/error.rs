use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Invalid field name: {0}")]
    InvalidField(String),

    #[error("Invalid containment clause: {0}")]
    InvalidContainment(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}
