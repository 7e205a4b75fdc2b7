//! Error taxonomy shared by every designer crate.
//!
//! Nothing in the designer performs I/O, so there is no transient failure
//! class: an operation either succeeds or fails immediately, and errors are
//! propagated to the host untouched.

use crate::id::ConnectionId;
use crate::model::Direction;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DesignerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DesignerError {
    #[error("cannot find {0} activity")]
    ActivityNotFound(String),

    #[error("cannot find {name} {direction} connector of {activity} activity")]
    ConnectorNotFound {
        activity: String,
        direction: Direction,
        name: String,
    },

    #[error("cannot find connection {0}")]
    ConnectionNotFound(ConnectionId),

    #[error("listener {0} is not registered")]
    ListenerNotFound(u64),

    #[error("activity {0} already exists")]
    DuplicateActivity(String),

    #[error("invariant violation: {0}")]
    InvariantViolation(Invariant),
}

/// Broad classification of a [`DesignerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvariantViolation,
    Conflict,
}

/// Graph invariants the model refuses to break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Invariant {
    #[error("the connection must have at least one connector")]
    EmptyConnection,
    #[error("this operation requires two connectors")]
    HalfOpenConnection,
    #[error("this operation requires a laid-out connector position")]
    UnplacedConnector,
}

impl DesignerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ActivityNotFound(_)
            | Self::ConnectorNotFound { .. }
            | Self::ConnectionNotFound(_)
            | Self::ListenerNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateActivity(_) => ErrorKind::Conflict,
            Self::InvariantViolation(_) => ErrorKind::InvariantViolation,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<Invariant> for DesignerError {
    fn from(invariant: Invariant) -> Self {
        DesignerError::InvariantViolation(invariant)
    }
}
