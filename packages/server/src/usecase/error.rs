//! UseCase layer errors.
//!
//! Every error that reaches a participant carries a stable wire `code`
//! alongside its human-readable message.

use thiserror::Error;

use crate::domain::{ProfileFetchError, RepositoryError, RoomError};

/// Stable machine-readable identifier sent in `error` frames.
pub trait ErrorCode {
    fn code(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("This room is already full.")]
    RoomFull,

    #[error("You have already joined this room")]
    AlreadyJoined,

    #[error("Could not load your Spotify profile")]
    ProfileUnavailable(#[source] ProfileFetchError),

    #[error("Room not found: {0}")]
    UnknownRoom(String),

    #[error("This room has been closed")]
    RoomClosed,
}

impl ErrorCode for JoinRoomError {
    fn code(&self) -> &'static str {
        match self {
            Self::RoomFull => "room_full",
            Self::AlreadyJoined => "already_joined",
            Self::ProfileUnavailable(_) => "profile_unavailable",
            Self::UnknownRoom(_) => "unknown_room",
            Self::RoomClosed => "room_closed",
        }
    }
}

impl JoinRoomError {
    /// Map a store failure seen while joining `room_id`.
    pub(crate) fn from_repository(room_id: &str, error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(id) => Self::UnknownRoom(id),
            RepositoryError::Room(RoomError::AlreadyJoined) => Self::AlreadyJoined,
            RepositoryError::Room(RoomError::RoomFull) => Self::RoomFull,
            RepositoryError::Room(RoomError::RoomClosed) => Self::RoomClosed,
            // seat lost while the profile was being fetched
            RepositoryError::Room(_) => Self::UnknownRoom(room_id.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitAnswersError {
    #[error("Room not found: {0}")]
    UnknownRoom(String),

    #[error("You are not in this room")]
    NotInRoom,

    #[error("The quiz for this room is not ready yet")]
    QuizNotReady,

    #[error("This room has been closed")]
    RoomClosed,

    #[error("Results for this room have already been computed")]
    AlreadyScored,

    #[error("userId does not match this connection")]
    ParticipantMismatch,
}

impl ErrorCode for SubmitAnswersError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownRoom(_) => "unknown_room",
            Self::NotInRoom => "not_in_room",
            Self::QuizNotReady => "quiz_not_ready",
            Self::RoomClosed => "room_closed",
            Self::AlreadyScored => "already_scored",
            Self::ParticipantMismatch => "invalid_message",
        }
    }
}

impl From<RepositoryError> for SubmitAnswersError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(id) => Self::UnknownRoom(id),
            RepositoryError::Room(RoomError::QuizNotReady) => Self::QuizNotReady,
            RepositoryError::Room(RoomError::RoomClosed) => Self::RoomClosed,
            RepositoryError::Room(RoomError::AlreadyScored) => Self::AlreadyScored,
            RepositoryError::Room(_) => Self::NotInRoom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("Invalid room id")]
    InvalidRoomId,

    #[error("Room not found")]
    RoomNotFound,
}
