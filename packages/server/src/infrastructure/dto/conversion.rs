//! Conversions between DTOs and domain models.

use quizduel_shared::time::timestamp_to_rfc3339;

use crate::domain::{AnswerSet, GameResult, Question, QuizHalf, Room};
use crate::infrastructure::dto::{http, websocket as ws};

// ========================================
// DTO → Domain
// ========================================

impl From<ws::AnswerSetDto> for AnswerSet {
    fn from(dto: ws::AnswerSetDto) -> Self {
        AnswerSet::new(dto.artists, dto.songs)
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&Question> for ws::QuestionDto {
    fn from(model: &Question) -> Self {
        Self {
            question: model.prompt.clone(),
            correct_answers: model.correct_answers.clone(),
            options: model.options.clone(),
        }
    }
}

impl From<&QuizHalf> for ws::QuizHalfDto {
    fn from(model: &QuizHalf) -> Self {
        Self {
            artists: (&model.artists).into(),
            songs: (&model.songs).into(),
        }
    }
}

impl From<&GameResult> for ws::ServerMessage {
    fn from(model: &GameResult) -> Self {
        Self::GameResults {
            scores: model
                .scores
                .iter()
                .map(|s| (s.participant.as_str().to_string(), s.score))
                .collect(),
            winner: model.winner.label().to_string(),
        }
    }
}

/// `users` list of a `quiz_ready` message, in seat order.
pub fn users_of(room: &Room) -> Vec<ws::UserDto> {
    room.participant_names()
        .into_iter()
        .map(|(id, name)| ws::UserDto {
            id: id.into_string(),
            name,
        })
        .collect()
}

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            phase: room.phase,
            participants: room
                .participants
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

impl From<&Room> for http::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.as_str().to_string(),
            phase: room.phase,
            time_range: room.time_range,
            participants: room
                .participants
                .iter()
                .map(|p| http::ParticipantDetailDto {
                    id: p.as_str().to_string(),
                    display_name: room.profiles.get(p).map(|prof| prof.display_name.clone()),
                    has_submitted: room.submitted_answers.contains_key(p),
                })
                .collect(),
            quiz_generated: room.quiz.is_some(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ParticipantId, ParticipantScore, ProfileSummary, RoomId, RoomPhase, Timestamp, Winner,
    };

    fn pid(value: &str) -> ParticipantId {
        ParticipantId::new(value.to_string()).unwrap()
    }

    #[test]
    fn test_answer_set_dto_to_domain_truncates() {
        // テスト項目: DTO の回答がドメインモデルに変換され、5件に切り詰められる
        // given (前提条件):
        let dto = ws::AnswerSetDto {
            artists: (0..8).map(|i| i.to_string()).collect(),
            songs: vec!["s".to_string()],
        };

        // when (操作):
        let answers: AnswerSet = dto.into();

        // then (期待する結果):
        assert_eq!(answers.artists.len(), 5);
        assert_eq!(answers.songs, vec!["s".to_string()]);
    }

    #[test]
    fn test_game_result_to_message() {
        // テスト項目: GameResult が game_results メッセージに変換される
        // given (前提条件):
        let result = GameResult {
            scores: vec![
                ParticipantScore {
                    participant: pid("p1"),
                    score: 15,
                },
                ParticipantScore {
                    participant: pid("p2"),
                    score: 4,
                },
            ],
            winner: Winner::Participant {
                display_name: "Alice".to_string(),
            },
        };

        // when (操作):
        let message: ws::ServerMessage = (&result).into();

        // then (期待する結果):
        let ws::ServerMessage::GameResults { scores, winner } = message else {
            panic!("expected game_results");
        };
        assert_eq!(scores.get("p1"), Some(&15));
        assert_eq!(scores.get("p2"), Some(&4));
        assert_eq!(winner, "Alice");
    }

    #[test]
    fn test_room_to_detail_dto_hides_profiles() {
        // テスト項目: 部屋詳細 DTO には表示名と提出状況のみが含まれる
        // given (前提条件):
        let mut room = Room::new(RoomId::new("R1".to_string()).unwrap(), Timestamp::new(0));
        room.reserve_seat(pid("p1"), None).unwrap();
        room.attach_profile(
            &pid("p1"),
            ProfileSummary::new("Alice".to_string(), vec![], vec![]),
        )
        .unwrap();

        // when (操作):
        let detail: http::RoomDetailDto = (&room).into();

        // then (期待する結果):
        assert_eq!(detail.phase, RoomPhase::Forming);
        assert_eq!(detail.participants.len(), 1);
        assert_eq!(detail.participants[0].display_name.as_deref(), Some("Alice"));
        assert!(!detail.participants[0].has_submitted);
        assert!(!detail.quiz_generated);
        assert_eq!(
            detail.created_at.as_deref(),
            Some("1970-01-01T00:00:00+00:00")
        );
    }
}
