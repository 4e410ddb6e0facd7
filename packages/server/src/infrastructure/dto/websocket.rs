//! WebSocket message DTOs.
//!
//! Frames are JSON objects tagged by `"type"` (snake_case) with camelCase
//! fields. Inbound payloads also accept the legacy `roomID` / `userID` keys
//! and the generic `credential` / `timeRangeSelector` / `participantId` names.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Messages sent by a participant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    JoinRoom(JoinRoomPayload),
    SubmitAnswers(SubmitAnswersPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    #[serde(alias = "roomID")]
    pub room_id: String,
    #[serde(alias = "credential")]
    pub access_token: String,
    /// `short`, `medium` or `long`. Only the first joiner's value counts.
    #[serde(default, alias = "timeRangeSelector")]
    pub term_length: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswersPayload {
    #[serde(alias = "roomID")]
    pub room_id: String,
    /// Optional; when present it must match the connection's participant id.
    #[serde(default, alias = "userID", alias = "participantId")]
    pub user_id: Option<String>,
    pub answers: AnswerSetDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnswerSetDto {
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub songs: Vec<String>,
}

/// Messages sent to a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    Connected {
        participant_id: String,
    },
    RoomFull {
        message: String,
    },
    QuizReady {
        room_id: String,
        questions: QuizHalfDto,
        users: Vec<UserDto>,
    },
    GameResults {
        scores: HashMap<String, u32>,
        winner: String,
    },
    Error {
        code: String,
        message: String,
    },
}

impl ServerMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizHalfDto {
    pub artists: QuestionDto,
    pub songs: QuestionDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub question: String,
    pub correct_answers: Vec<String>,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub name: String,
}
