use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid descriptor `{descriptor}`: {reason}")]
    InvalidDescriptor {
        descriptor: String,
        reason: &'static str,
    },
    #[error("invalid generic signature `{signature}` at offset {offset}: {reason}")]
    InvalidSignature {
        signature: String,
        offset: usize,
        reason: &'static str,
    },
    #[error(
        "type variable `{variable}` declared by `{declared_by}` has non-interface bound `{bound}` at position {position}; only the first bound may be a class"
    )]
    InvalidTypeBound {
        variable: String,
        declared_by: String,
        bound: String,
        position: usize,
    },
    #[error("class `{0}` was supplied more than once in the same import batch")]
    DuplicateClass(String),
    #[error("import batch abandoned after intake failure: {0}")]
    Abandoned(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;
