//! Errors raised while constructing fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("principal must not be empty")]
    EmptyPrincipal,

    #[error("principal is {len} bytes, maximum is {max}")]
    PrincipalTooLong { len: usize, max: usize },

    #[error("principal contains invalid character {0:?}")]
    InvalidPrincipalChar(char),

    #[error("invalid proposal id: {0}")]
    InvalidProposalId(String),
}
