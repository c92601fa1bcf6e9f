//! Client error taxonomy
//!
//! Everything user-facing is turned into a display message and rendered on
//! the surface it came from. `UnknownPlaceholder` is an internal consistency
//! fault and only ever logged.

use crate::gateway::{TransportError, TransportErrorKind};
use crate::session::{LogError, MessageId, ValidationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    /// Shown when advice is requested without a matching prediction
    #[error("请先进行预测")]
    PredictionRequired,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("Network failure: {0}")]
    Network(TransportError),

    #[error("Server failure: {0}")]
    Server(TransportError),

    #[error("Unknown placeholder {0}")]
    UnknownPlaceholder(MessageId),
}

impl From<TransportError> for ClientError {
    fn from(err: TransportError) -> Self {
        match err.kind {
            TransportErrorKind::Network => ClientError::Network(err),
            TransportErrorKind::Server => ClientError::Server(err),
        }
    }
}

impl From<LogError> for ClientError {
    fn from(err: LogError) -> Self {
        match err {
            LogError::UnknownPlaceholder(id) => ClientError::UnknownPlaceholder(id),
        }
    }
}

impl ClientError {
    /// Whether the error should be rendered rather than only logged
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, ClientError::UnknownPlaceholder(_))
    }

    /// Message suitable for the surface the error belongs to
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(e) => format!("输入有误: {e}"),
            ClientError::Precondition(e) => e.to_string(),
            ClientError::Network(_) => "网络错误，请检查服务器连接".to_string(),
            ClientError::Server(e) => e.message.clone(),
            ClientError::UnknownPlaceholder(id) => format!("internal error: placeholder {id}"),
        }
    }
}
