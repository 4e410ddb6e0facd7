//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断した参加者の全部屋からの削除と MessagePusher からの登録解除
//!
//! ### なぜこのテストが必要か
//! - 残った参加者のデータが保持されることを保証
//! - 空になった部屋は削除され、同じ ID で新しく始められることを確認
//! - クイズ開始後の退出で部屋が Closed になり、残った参加者に通知が届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：待機中の部屋からの切断
//! - エッジケース：クイズ開始後の切断、どの部屋にもいない参加者の切断

use std::sync::Arc;

use crate::domain::{
    MessagePushError, MessagePusher, ParticipantId, RoomDeparture, RoomRepository,
};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Returns
    ///
    /// 参加者が所属していた部屋ごとの退出結果（Domain Model）。
    /// クイズ途中で閉じた部屋には、残された参加者が含まれる。
    pub async fn execute(&self, participant: &ParticipantId) -> Vec<RoomDeparture> {
        let departures = self.repository.remove_participant(participant).await;
        self.message_pusher.unregister_client(participant).await;

        if !departures.is_empty() {
            tracing::info!(
                "Participant '{}' left {} room(s)",
                participant,
                departures.len()
            );
        }
        departures
    }

    /// 相手の退出で閉じた部屋に残された参加者へ通知
    pub async fn notify_stranded(
        &self,
        stranded: Vec<ParticipantId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        tracing::info!("Notifying {} stranded participant(s)", stranded.len());
        self.message_pusher.broadcast(stranded, content).await
    }
}
