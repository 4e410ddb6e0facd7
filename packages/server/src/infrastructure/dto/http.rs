//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::{RoomPhase, TimeRange};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    pub phase: RoomPhase,
    pub participants: Vec<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub phase: RoomPhase,
    pub time_range: Option<TimeRange>,
    pub participants: Vec<ParticipantDetailDto>,
    pub quiz_generated: bool,
    pub created_at: Option<String>,
}

/// Per-participant view. Profiles and answers are not exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDetailDto {
    pub id: String,
    pub display_name: Option<String>,
    pub has_submitted: bool,
}

/// Query string of the OAuth redirect back from the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}
