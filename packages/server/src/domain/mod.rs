//! Domain layer: entities, value objects, pure game rules, and the traits
//! the outer layers implement.

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod profile_fetcher;
pub mod quiz;
pub mod repository;
pub mod scoring;
pub mod value_object;

pub use entity::{
    AnswerSet, GameResult, ParticipantScore, ProfileSummary, Question, QuizHalf, QuizPair,
    ROOM_CAPACITY, Room, RoomDeparture, RoomPhase, TIE, Winner,
};
pub use error::{
    MessagePushError, ProfileFetchError, RepositoryError, RoomError, ValueObjectError,
};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use profile_fetcher::ProfileFetcher;
pub use quiz::{generate_quiz, generate_quiz_with_rng};
pub use repository::RoomRepository;
pub use scoring::score;
pub use value_object::{
    AccessToken, ParticipantId, ParticipantIdFactory, RoomId, TimeRange, Timestamp,
};
