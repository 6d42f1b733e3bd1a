use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown {kind} code '{value}'")]
    UnknownCode { kind: &'static str, value: String },
    #[error("invalid {kind} value '{value}'")]
    InvalidValue { kind: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
