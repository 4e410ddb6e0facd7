//! Room store interface.
//!
//! Every method is one atomic transition on the store. Implementations must
//! not let two calls interleave on the same room; callers never hold a room
//! across an `.await` of their own.

use async_trait::async_trait;

use super::{
    AnswerSet, GameResult, ParticipantId, ProfileSummary, RepositoryError, Room, RoomDeparture,
    RoomId, TimeRange,
};

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Create the room if absent and seat the participant.
    ///
    /// Returns the room's (possibly just fixed) time range.
    async fn reserve_seat(
        &self,
        room_id: &RoomId,
        participant: &ParticipantId,
        requested: Option<TimeRange>,
    ) -> Result<TimeRange, RepositoryError>;

    /// Give a seat back (e.g. when the profile could not be fetched).
    /// The room is dropped if it becomes empty.
    async fn release_seat(
        &self,
        room_id: &RoomId,
        participant: &ParticipantId,
    ) -> Result<(), RepositoryError>;

    /// Store a fetched profile. Returns a snapshot of the room when this
    /// completed the pair and the quiz was generated.
    async fn attach_profile(
        &self,
        room_id: &RoomId,
        participant: &ParticipantId,
        profile: ProfileSummary,
    ) -> Result<Option<Room>, RepositoryError>;

    /// Record answers. Returns the result when this was the second submission.
    async fn submit_answers(
        &self,
        room_id: &RoomId,
        participant: &ParticipantId,
        answers: AnswerSet,
    ) -> Result<Option<GameResult>, RepositoryError>;

    /// Remove the participant from every room, dropping rooms that become
    /// empty. Returns one departure per room the participant was in.
    async fn remove_participant(&self, participant: &ParticipantId) -> Vec<RoomDeparture>;

    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError>;

    /// All rooms, oldest first.
    async fn get_rooms(&self) -> Vec<Room>;
}
