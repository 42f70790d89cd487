use std::error::Error;
use std::fmt;
use std::fmt::Display;

use crate::auth::Role;
use crate::LineupSlot;

/// This enum contains all error messages this library can return. Most API functions will generally return a [`ScorebookResult`].
#[derive(Debug, Clone, PartialEq, Hash)]
pub enum ScorebookError {
    /// You made an invalid request, usually by using wrong parameters for function calls.
    InvalidRequest {
        /// Further specifies why the request was invalid.
        info: String,
    },
    /// The game has been ended by the operator; no further plays may be committed.
    GameEnded,
    /// The current half-inning has three or more outs and is waiting for the
    /// operator to confirm the side-retired transition. No play may be
    /// committed until [`retire_side`] runs.
    ///
    /// [`retire_side`]: crate::sessions::tracker_session::TrackerSession::retire_side
    SideRetired {
        /// The out count that retired the side (3 or more).
        outs: u8,
    },
    /// The tracked team is not currently batting, so there is no at-bat to
    /// record. Plays for the opposing side live in their tracker's document.
    NotBatting,
    /// A play is already pending adjustment. Confirm or cancel it before
    /// selecting the next play.
    PlayPending,
    /// The side cannot be retired yet because the tracked half-inning has
    /// fewer than three outs.
    SideNotRetired {
        /// The current out count.
        outs: u8,
    },
    /// A batting order was empty or otherwise unusable.
    InvalidLineup {
        /// A description of why the lineup was rejected.
        reason: String,
    },
    /// An invalid lineup slot was provided. Slots must be less than the batting order length.
    InvalidSlot {
        /// The slot that was invalid.
        slot: LineupSlot,
        /// The number of players in the batting order.
        order_len: usize,
    },
    /// The acting user's role does not permit tracking this team.
    NotAuthorized {
        /// The role that was rejected.
        role: Role,
    },
    /// Serialization or deserialization of a stored document failed.
    SerializationError {
        /// A description of what failed to serialize/deserialize.
        context: String,
    },
    /// A document store operation failed. Store failures are surfaced to the
    /// caller unchanged; this layer never retries.
    StoreError {
        /// A description of the store error.
        context: String,
    },
    /// An internal error occurred that should not happen under normal operation.
    /// If you encounter this error, please report it as a bug.
    InternalError {
        /// A description of the internal error.
        context: String,
    },
}

impl Display for ScorebookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScorebookError::InvalidRequest { info } => {
                write!(f, "Invalid Request: {}", info)
            }
            ScorebookError::GameEnded => {
                write!(f, "The game has ended; no further plays may be committed.")
            }
            ScorebookError::SideRetired { outs } => {
                write!(
                    f,
                    "Side retired with {} outs; confirm the half-inning transition first.",
                    outs
                )
            }
            ScorebookError::NotBatting => {
                write!(
                    f,
                    "The tracked team is not batting; the opposing tracker owns this half-inning."
                )
            }
            ScorebookError::PlayPending => {
                write!(
                    f,
                    "A play is already pending adjustment; confirm or cancel it first."
                )
            }
            ScorebookError::SideNotRetired { outs } => {
                write!(
                    f,
                    "Cannot retire the side with only {} outs; three are required.",
                    outs
                )
            }
            ScorebookError::InvalidLineup { reason } => {
                write!(f, "Invalid batting order: {}", reason)
            }
            ScorebookError::InvalidSlot { slot, order_len } => {
                write!(
                    f,
                    "Invalid lineup slot {}: batting order has {} players",
                    slot, order_len
                )
            }
            ScorebookError::NotAuthorized { role } => {
                write!(f, "Role {:?} is not authorized to track this team", role)
            }
            ScorebookError::SerializationError { context } => {
                write!(f, "Serialization error: {}", context)
            }
            ScorebookError::StoreError { context } => {
                write!(f, "Store error: {}", context)
            }
            ScorebookError::InternalError { context } => {
                write!(f, "Internal error (please report as bug): {}", context)
            }
        }
    }
}

impl Error for ScorebookError {}

/// The equivalent of a classic `Result` type, but with [`ScorebookError`]
/// pre-filled as the error type.
pub type ScorebookResult<T> = Result<T, ScorebookError>;
