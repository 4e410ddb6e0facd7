//! Domain entities: profiles, quizzes, answers, results and the `Room`
//! state machine that ties them together.

use std::collections::HashMap;

use serde::Serialize;

use super::{
    error::RoomError,
    quiz::{TOP_N, generate_quiz},
    scoring::score,
    value_object::{ParticipantId, RoomId, TimeRange, Timestamp},
};

/// A participant leaving a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDeparture {
    pub room_id: RoomId,
    /// Participants still seated in a room that this departure closed
    /// mid-quiz. Empty when the room stays usable or was already scored.
    pub stranded: Vec<ParticipantId>,
}

/// Seats per room.
pub const ROOM_CAPACITY: usize = 2;

/// Literal announced as the winner when both scores are equal.
pub const TIE: &str = "tie";

/// A participant's listening profile as fetched from the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub display_name: String,
    /// Up to 10 artist names, rank order.
    pub top_artists: Vec<String>,
    /// Up to 15 `"track - artists"` labels, rank order.
    pub top_tracks: Vec<String>,
}

impl ProfileSummary {
    pub fn new(display_name: String, top_artists: Vec<String>, top_tracks: Vec<String>) -> Self {
        Self {
            display_name,
            top_artists,
            top_tracks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    pub correct_answers: Vec<String>,
    pub options: Vec<String>,
}

/// The questions directed at one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizHalf {
    pub artists: Question,
    pub songs: Question,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPair {
    pub for_participant1: QuizHalf,
    pub for_participant2: QuizHalf,
}

/// Ranked guesses submitted by one participant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnswerSet {
    pub artists: Vec<String>,
    pub songs: Vec<String>,
}

impl AnswerSet {
    /// Build an answer set, keeping at most five guesses per category.
    pub fn new(mut artists: Vec<String>, mut songs: Vec<String>) -> Self {
        artists.truncate(TOP_N);
        songs.truncate(TOP_N);
        Self { artists, songs }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantScore {
    pub participant: ParticipantId,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Winner {
    Participant { display_name: String },
    Tie,
}

impl Winner {
    /// Display name of the winner, or `"tie"`.
    pub fn label(&self) -> &str {
        match self {
            Self::Participant { display_name } => display_name,
            Self::Tie => TIE,
        }
    }
}

/// Final scores, in seat order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub scores: Vec<ParticipantScore>,
    pub winner: Winner,
}

impl GameResult {
    pub fn participants(&self) -> Vec<ParticipantId> {
        self.scores.iter().map(|s| s.participant.clone()).collect()
    }
}

/// Lifecycle of a room.
///
/// ```text
/// Forming --(second profile attached)--> Ready --(second submission)--> Scored
///                                          |                              |
///                                          +----(participant leaves)------+--> Closed
/// ```
///
/// A room whose last participant leaves is dropped from the store whatever
/// its phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomPhase {
    Forming,
    Ready,
    Scored,
    Closed,
}

#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub phase: RoomPhase,
    /// Seat order. The first seat is "participant 1".
    pub participants: Vec<ParticipantId>,
    pub profiles: HashMap<ParticipantId, ProfileSummary>,
    /// Fixed by the first joiner.
    pub time_range: Option<TimeRange>,
    pub quiz: Option<QuizPair>,
    pub submitted_answers: HashMap<ParticipantId, AnswerSet>,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            phase: RoomPhase::Forming,
            participants: Vec::with_capacity(ROOM_CAPACITY),
            profiles: HashMap::new(),
            time_range: None,
            quiz: None,
            submitted_answers: HashMap::new(),
            created_at,
        }
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.participants.contains(participant)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= ROOM_CAPACITY
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Take a seat. Returns the room's time range, which the first joiner fixes.
    pub fn reserve_seat(
        &mut self,
        participant: ParticipantId,
        requested: Option<TimeRange>,
    ) -> Result<TimeRange, RoomError> {
        if self.contains(&participant) {
            return Err(RoomError::AlreadyJoined);
        }
        if self.phase != RoomPhase::Forming || self.is_full() {
            return Err(RoomError::RoomFull);
        }

        self.participants.push(participant);
        Ok(*self.time_range.get_or_insert(requested.unwrap_or_default()))
    }

    /// Store a fetched profile.
    ///
    /// Returns `true` when this completed the pair, in which case the quiz
    /// has been generated and the room is `Ready`.
    pub fn attach_profile(
        &mut self,
        participant: &ParticipantId,
        profile: ProfileSummary,
    ) -> Result<bool, RoomError> {
        if !self.contains(participant) {
            return Err(RoomError::NotInRoom);
        }
        if self.phase != RoomPhase::Forming {
            return Err(RoomError::RoomClosed);
        }

        self.profiles.insert(participant.clone(), profile);

        let quiz = match self.seated_profiles() {
            Some((first, second)) => generate_quiz(first, second),
            None => return Ok(false),
        };
        self.quiz = Some(quiz);
        self.phase = RoomPhase::Ready;
        Ok(true)
    }

    /// Record a submission, overwriting any earlier one from the same participant.
    ///
    /// Returns the result once both participants have submitted.
    pub fn submit_answers(
        &mut self,
        participant: &ParticipantId,
        answers: AnswerSet,
    ) -> Result<Option<GameResult>, RoomError> {
        if !self.contains(participant) {
            return Err(RoomError::NotInRoom);
        }
        match self.phase {
            RoomPhase::Forming => return Err(RoomError::QuizNotReady),
            RoomPhase::Scored => return Err(RoomError::AlreadyScored),
            RoomPhase::Closed => return Err(RoomError::RoomClosed),
            RoomPhase::Ready => {}
        }

        self.submitted_answers.insert(participant.clone(), answers);
        if self.submitted_answers.len() < ROOM_CAPACITY {
            return Ok(None);
        }

        let result = self.compute_result().ok_or(RoomError::QuizNotReady)?;
        self.phase = RoomPhase::Scored;
        Ok(Some(result))
    }

    /// Remove a participant and their data. Returns `None` if they were not seated.
    pub fn remove_participant(&mut self, participant: &ParticipantId) -> Option<RoomDeparture> {
        let before = self.participants.len();
        self.participants.retain(|p| p != participant);
        if self.participants.len() == before {
            return None;
        }

        self.profiles.remove(participant);
        self.submitted_answers.remove(participant);

        let mut stranded = Vec::new();
        match self.phase {
            RoomPhase::Ready => {
                // the quiz can no longer be finished
                self.phase = RoomPhase::Closed;
                stranded = self.participants.clone();
            }
            RoomPhase::Scored => self.phase = RoomPhase::Closed,
            RoomPhase::Forming | RoomPhase::Closed => {}
        }
        Some(RoomDeparture {
            room_id: self.id.clone(),
            stranded,
        })
    }

    /// The questions for `participant`, once the quiz exists.
    pub fn quiz_half_for(&self, participant: &ParticipantId) -> Option<&QuizHalf> {
        let quiz = self.quiz.as_ref()?;
        match self.participants.iter().position(|p| p == participant)? {
            0 => Some(&quiz.for_participant1),
            _ => Some(&quiz.for_participant2),
        }
    }

    /// `(id, display name)` for every seated participant whose profile is known.
    pub fn participant_names(&self) -> Vec<(ParticipantId, String)> {
        self.participants
            .iter()
            .filter_map(|p| {
                self.profiles
                    .get(p)
                    .map(|profile| (p.clone(), profile.display_name.clone()))
            })
            .collect()
    }

    fn seated_profiles(&self) -> Option<(&ProfileSummary, &ProfileSummary)> {
        match self.participants.as_slice() {
            [first, second] => Some((self.profiles.get(first)?, self.profiles.get(second)?)),
            _ => None,
        }
    }

    fn compute_result(&self) -> Option<GameResult> {
        let [first, second] = self.participants.as_slice() else {
            return None;
        };
        let (first_profile, second_profile) = self.seated_profiles()?;

        // Each participant is scored against the other's profile.
        let first_score = score(self.submitted_answers.get(first)?, second_profile);
        let second_score = score(self.submitted_answers.get(second)?, first_profile);

        let winner = if first_score > second_score {
            Winner::Participant {
                display_name: first_profile.display_name.clone(),
            }
        } else if second_score > first_score {
            Winner::Participant {
                display_name: second_profile.display_name.clone(),
            }
        } else {
            Winner::Tie
        };

        Some(GameResult {
            scores: vec![
                ParticipantScore {
                    participant: first.clone(),
                    score: first_score,
                },
                ParticipantScore {
                    participant: second.clone(),
                    score: second_score,
                },
            ],
            winner,
        })
    }
}
