//! UseCase: 部屋への参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 座席の確保 → プロフィール取得 → プロフィール登録 → クイズ生成の流れ
//!
//! ### なぜこのテストが必要か
//! - 3人目の参加者が部屋の状態を変えないことを保証
//! - プロフィール取得に失敗した場合に座席が解放されることを保証
//! - 部屋の期間 (time range) が最初の参加者によって固定されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：1人目は待機、2人目でクイズ生成
//! - 異常系：満員、二重参加、プロフィール取得失敗
//! - エッジケース：プロフィール取得中に参加者が切断した場合

use std::sync::Arc;

use crate::domain::{
    AccessToken, MessagePushError, MessagePusher, ParticipantId, ProfileFetcher, Room, RoomId,
    RoomRepository, TimeRange,
};

use super::error::JoinRoomError;

/// 参加処理の結果
#[derive(Debug)]
pub enum JoinOutcome {
    /// 対戦相手のプロフィール待ち
    Waiting,
    /// この参加で2人揃い、クイズが生成された（その時点の部屋のスナップショット）
    Ready(Room),
}

/// 部屋への参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// ProfileFetcher（音楽プロフィール取得の抽象化）
    profile_fetcher: Arc<dyn ProfileFetcher>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        profile_fetcher: Arc<dyn ProfileFetcher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            profile_fetcher,
        }
    }

    /// 部屋への参加を実行
    ///
    /// プロフィール取得中は部屋のロックを保持しない。取得に失敗した場合は
    /// 確保した座席を解放する。
    ///
    /// # Arguments
    ///
    /// * `room_id` - 参加する部屋の ID（Domain Model）
    /// * `participant` - 参加者の ID（Domain Model）
    /// * `token` - プロフィール取得に使うアクセストークン
    /// * `requested` - 希望する期間（部屋を作成する最初の参加者のみ有効）
    pub async fn execute(
        &self,
        room_id: RoomId,
        participant: ParticipantId,
        token: AccessToken,
        requested: Option<TimeRange>,
    ) -> Result<JoinOutcome, JoinRoomError> {
        // 1. 座席の確保
        let time_range = self
            .repository
            .reserve_seat(&room_id, &participant, requested)
            .await
            .map_err(|e| JoinRoomError::from_repository(room_id.as_str(), e))?;

        // 2. プロフィール取得（ロックなし）
        let profile = match self.profile_fetcher.fetch(&token, time_range).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch profile for '{}' in room '{}': {}",
                    participant,
                    room_id,
                    e
                );
                if let Err(release_error) =
                    self.repository.release_seat(&room_id, &participant).await
                {
                    tracing::warn!(
                        "Failed to release seat of '{}' in room '{}': {}",
                        participant,
                        room_id,
                        release_error
                    );
                }
                return Err(JoinRoomError::ProfileUnavailable(e));
            }
        };

        // 3. プロフィール登録（2人揃えばクイズ生成）
        let completed = self
            .repository
            .attach_profile(&room_id, &participant, profile)
            .await
            .map_err(|e| JoinRoomError::from_repository(room_id.as_str(), e))?;

        match completed {
            Some(room) => {
                tracing::info!("Quiz generated for room '{}'", room_id);
                Ok(JoinOutcome::Ready(room))
            }
            None => {
                tracing::info!(
                    "Participant '{}' is waiting for an opponent in room '{}'",
                    participant,
                    room_id
                );
                Ok(JoinOutcome::Waiting)
            }
        }
    }

    /// 参加者ごとのクイズ (quiz_ready) を送信
    ///
    /// # Arguments
    ///
    /// * `participant` - 送信先の参加者 ID（Domain Model）
    /// * `message` - 送信する JSON メッセージ（DTO 層で生成されたもの）
    pub async fn deliver_quiz(
        &self,
        participant: &ParticipantId,
        message: &str,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(participant, message).await
    }
}
