//! Domain errors shared by the claim tracker and the drawing board.
//!
//! Every variant renders as a message suitable for replying to the user who triggered it.
//! Infrastructure failures (I/O, Discord HTTP) are not represented here; they travel as
//! `anyhow::Error` up to the plugin loop.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("`{0}` is not a valid Pokemon!")]
    InvalidItem(String),

    #[error("{0}")]
    PreconditionFailed(Precondition),

    #[error("{0}")]
    Unauthorized(Unauthorized),

    #[error(
        "Max characters reached ({len}/{max}). Please remove some custom emojis from the board. \
         Custom emojis take up more than 20 characters each, while most default ones take up 1!"
    )]
    SizeLimitExceeded { len: usize, max: usize },

    #[error("{0}")]
    InvalidArgument(String),
}

/// An operation was attempted in a state that does not allow it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    /// `owner` is the claimer's username
    #[error("already claimed by {owner}")]
    AlreadyClaimed { by_self: bool, owner: String },
    #[error("not claimed")]
    NotClaimed,
    #[error("not submitted")]
    NotSubmitted,
    #[error("already approved")]
    AlreadyApproved,
    #[error("not approved")]
    NotApproved,
    #[error("you already have the max number ({0}) of pokemon claimed")]
    ClaimLimitReached(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Unauthorized {
    #[error("claimed by {0}, not you")]
    NotOwner(String),
    #[error("this requires the AFD admin role")]
    NotAdmin,
    #[error("this requires the AFD participant role")]
    NotParticipant,
    #[error("This instance does not belong to you")]
    NotSessionOwner,
}

pub type Result<T> = std::result::Result<T, Error>;
