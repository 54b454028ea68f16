//! Error taxonomy for the IAM simulator
//!
//! [`IamError`] is the catalog of failure kinds an operation handler can
//! raise. Its `Display` is the service message text. [`ClientError`] is the
//! only error that crosses the dispatch boundary: it pairs an [`IamError`]
//! with the operation name the caller used and renders the exact sentence
//! the real SDK produces.

use std::fmt;
use thiserror::Error;

/// Wire-level error code reported alongside every failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoSuchMethod,
    NoSuchEntity,
    EntityAlreadyExists,
    ValidationError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoSuchMethod => "NoSuchMethod",
            Self::NoSuchEntity => "NoSuchEntity",
            Self::EntityAlreadyExists => "EntityAlreadyExists",
            Self::ValidationError => "ValidationError",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure kinds raised by operation handlers and the repository.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IamError {
    #[error("Operation not mocked.")]
    OperationNotMocked,
    #[error("The user with name {0} cannot be found.")]
    NoSuchUser(String),
    #[error("The group with name {0} cannot be found.")]
    NoSuchGroup(String),
    #[error("The Access Key with id {0} cannot be found.")]
    NoSuchAccessKey(String),
    #[error("LoginProfile for user with name {0} cannot be found.")]
    NoSuchLoginProfile(String),
    #[error("User {user} is not a member of group {group}.")]
    NotGroupMember { user: String, group: String },
    #[error("User with name {0} already exists.")]
    UserAlreadyExists(String),
    #[error("Group with name {0} already exists.")]
    GroupAlreadyExists(String),
    #[error("LoginProfile for user with name {0} already exists.")]
    LoginProfileAlreadyExists(String),
    #[error("1 validation error detected: {0}")]
    Validation(String),
}

impl IamError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::OperationNotMocked => ErrorCode::NoSuchMethod,
            Self::NoSuchUser(_)
            | Self::NoSuchGroup(_)
            | Self::NoSuchAccessKey(_)
            | Self::NoSuchLoginProfile(_)
            | Self::NotGroupMember { .. } => ErrorCode::NoSuchEntity,
            Self::UserAlreadyExists(_)
            | Self::GroupAlreadyExists(_)
            | Self::LoginProfileAlreadyExists(_) => ErrorCode::EntityAlreadyExists,
            Self::Validation(_) => ErrorCode::ValidationError,
        }
    }
}

pub type IamResult<T> = Result<T, IamError>;

/// Error returned to callers of the dispatch engine.
///
/// The string form is a hard contract: callers compare it verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "An error occurred ({}) when calling the {} operation: {}",
    .kind.code(),
    .operation_name,
    .kind
)]
pub struct ClientError {
    operation_name: String,
    kind: IamError,
}

impl ClientError {
    pub fn new(operation_name: impl Into<String>, kind: IamError) -> Self {
        Self {
            operation_name: operation_name.into(),
            kind,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    pub fn kind(&self) -> &IamError {
        &self.kind
    }
}
