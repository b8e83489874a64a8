use seriebind::BindError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("bind error: {0}")]
    Bind(#[from] BindError),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("record does not encode to a point")]
    NotAPoint,
}

impl ClientError {
    pub fn backend(msg: impl Into<String>) -> Self {
        ClientError::Backend(msg.into())
    }
}
