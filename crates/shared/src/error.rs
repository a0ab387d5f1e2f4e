use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PostId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ServiceUnavailable,
    Validation,
    Service,
    NotFound,
}

/// Remote operation named in service errors and alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ListPosts,
    GetPost,
    InsertPost,
    UpdatePost,
    DeletePost,
    SubmitContact,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::ListPosts => "list posts",
            Operation::GetPost => "get post",
            Operation::InsertPost => "insert post",
            Operation::UpdatePost => "update post",
            Operation::DeletePost => "delete post",
            Operation::SubmitContact => "submit contact message",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("content service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("{field} must not be empty")]
    Validation { field: &'static str },
    #[error("{operation} failed: {message}")]
    Service { operation: Operation, message: String },
    #[error("post {0} not found")]
    NotFound(PostId),
}

impl GatewayError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    pub fn service(operation: Operation, message: impl Into<String>) -> Self {
        Self::Service {
            operation,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
            GatewayError::Validation { .. } => ErrorCode::Validation,
            GatewayError::Service { .. } => ErrorCode::Service,
            GatewayError::NotFound(_) => ErrorCode::NotFound,
        }
    }
}
