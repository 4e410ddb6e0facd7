//! UseCase: 回答送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitAnswersUseCase::execute() と schedule_results()
//! - 回答の記録、2人分揃った時点での採点、結果の遅延配信
//!
//! ### なぜこのテストが必要か
//! - 再送信は上書きされ、採点には最新の回答が使われることを保証
//! - 採点は相手のプロフィールに対して行われることを確認
//! - 結果は設定した遅延の後に両者へ配信される
//!
//! ### どのような状況を想定しているか
//! - 正常系：1人目の送信は保留、2人目で採点
//! - 異常系：クイズ未生成、部屋が存在しない、参加していない、ID 不一致
//! - エッジケース：採点後の再送信

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;

use crate::domain::{
    AnswerSet, GameResult, MessagePusher, ParticipantId, RoomId, RoomRepository,
};

use super::error::SubmitAnswersError;

/// 回答送信のユースケース
pub struct SubmitAnswersUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 採点から結果配信までの演出用の待ち時間
    result_delay: Duration,
}

impl SubmitAnswersUseCase {
    /// 新しい SubmitAnswersUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        result_delay: Duration,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            result_delay,
        }
    }

    /// 回答送信を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 部屋の ID（Domain Model）
    /// * `participant` - 接続に紐づく参加者 ID（Domain Model）
    /// * `claimed` - メッセージに含まれていた参加者 ID（省略可）
    /// * `answers` - 回答
    ///
    /// # Returns
    ///
    /// * `Ok(Some(GameResult))` - 2人分の回答が揃い採点された
    /// * `Ok(None)` - 相手の回答待ち
    /// * `Err(SubmitAnswersError)` - 送信失敗
    pub async fn execute(
        &self,
        room_id: RoomId,
        participant: ParticipantId,
        claimed: Option<ParticipantId>,
        answers: AnswerSet,
    ) -> Result<Option<GameResult>, SubmitAnswersError> {
        if claimed.is_some_and(|claimed| claimed != participant) {
            return Err(SubmitAnswersError::ParticipantMismatch);
        }

        let result = self
            .repository
            .submit_answers(&room_id, &participant, answers)
            .await?;

        match &result {
            Some(result) => tracing::info!(
                "Room '{}' scored, winner: {}",
                room_id,
                result.winner.label()
            ),
            None => tracing::info!(
                "Participant '{}' submitted answers in room '{}'",
                participant,
                room_id
            ),
        }
        Ok(result)
    }

    /// 結果 (game_results) を遅延後に配信するタスクを起動
    ///
    /// # Arguments
    ///
    /// * `targets` - 配信先の参加者 ID リスト（Domain Model）
    /// * `message` - 配信する JSON メッセージ（DTO 層で生成されたもの）
    pub fn schedule_results(&self, targets: Vec<ParticipantId>, message: String) -> JoinHandle<()> {
        let message_pusher = self.message_pusher.clone();
        let delay = self.result_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = message_pusher.broadcast(targets, &message).await {
                tracing::warn!("Failed to deliver game results: {}", e);
            }
        })
    }
}
