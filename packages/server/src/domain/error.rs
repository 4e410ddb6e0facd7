//! Domain error types.

use thiserror::Error;

/// Validation failures for value objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Room id must not be empty")]
    RoomIdEmpty,

    #[error("Room id must be at most {0} characters")]
    RoomIdTooLong(usize),

    #[error("Participant id must not be empty")]
    ParticipantIdEmpty,

    #[error("Access token must not be empty")]
    AccessTokenEmpty,
}

/// Rule violations raised by the `Room` state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    /// Both seats are taken, or the game has already started.
    #[error("This room is already full.")]
    RoomFull,

    #[error("Participant has already joined this room")]
    AlreadyJoined,

    #[error("Participant is not in this room")]
    NotInRoom,

    #[error("The quiz for this room is not ready yet")]
    QuizNotReady,

    /// A participant left after the quiz was generated.
    #[error("This room has been closed")]
    RoomClosed,

    #[error("Results for this room have already been computed")]
    AlreadyScored,
}

/// Errors from a `RoomRepository`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error(transparent)]
    Room(#[from] RoomError),
}

/// Errors from a `MessagePusher`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    #[error("Failed to push message: {0}")]
    PushFailed(String),
}

/// Errors from a `ProfileFetcher`.
///
/// Callers treat every variant the same way (the profile is unavailable);
/// the variants exist for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileFetchError {
    #[error("Profile request failed: {0}")]
    Request(String),

    #[error("Profile provider returned status {0}")]
    Status(u16),

    #[error("Profile request timed out")]
    Timeout,

    #[error("Could not decode profile response: {0}")]
    Decode(String),
}
