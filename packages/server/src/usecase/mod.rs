//! UseCase layer: the room coordinator's operations.

mod connect_participant;
mod disconnect_participant;
pub mod error;
mod get_rooms;
mod join_room;
mod submit_answers;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ErrorCode, GetRoomDetailError, JoinRoomError, SubmitAnswersError};
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use join_room::{JoinOutcome, JoinRoomUseCase};
pub use submit_answers::SubmitAnswersUseCase;
