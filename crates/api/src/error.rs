#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unknown {kind}: {value}")]
    UnknownKeyword { kind: &'static str, value: String },
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
