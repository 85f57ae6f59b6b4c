use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("query contains forbidden pattern '{0}'")]
    ForbiddenPattern(String),

    #[error("invalid format: {0}. Use: collection.operation(arguments)")]
    MalformedRequest(String),

    #[error("invalid collection name '{0}'. Use alphanumeric and underscore only")]
    InvalidIdentifier(String),

    #[error("invalid JSON in arguments. Use proper JSON format.\nReceived: {payload}")]
    InvalidArguments { payload: String },

    #[error("unsupported operation '{0}'")]
    UnsupportedOperation(String),

    #[error("{method}: {expected}")]
    ArityMismatch { method: String, expected: String },

    #[error("unsupported database engine '{0}'. Supported engines are: mysql, postgres, mongo")]
    UnknownEngine(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),
}
