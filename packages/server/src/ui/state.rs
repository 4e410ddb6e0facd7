//! Shared application state.

use std::sync::Arc;

use crate::{
    infrastructure::spotify::SpotifyAuthClient,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetRoomDetailUseCase,
        GetRoomsUseCase, JoinRoomUseCase, SubmitAnswersUseCase,
    },
};

pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// JoinRoomUseCase（部屋への参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// SubmitAnswersUseCase（回答送信のユースケース）
    pub submit_answers_usecase: Arc<SubmitAnswersUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// GetRoomsUseCase（部屋一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（部屋詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// Spotify OAuth クライアント（/login, /callback）
    pub auth_client: Arc<SpotifyAuthClient>,
    /// ログイン完了後のリダイレクト先
    pub frontend_url: String,
}
