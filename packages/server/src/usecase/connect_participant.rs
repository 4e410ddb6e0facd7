//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 接続ごとの参加者 ID 採番と MessagePusher への登録
//!
//! ### なぜこのテストが必要か
//! - 参加者 ID はサーバーが採番し、接続ごとに一意でなければならない
//! - 登録された送信チャンネルにメッセージが届くことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続の登録
//! - エッジケース：複数接続で ID が重複しない

use std::sync::Arc;

use crate::domain::{MessagePusher, ParticipantId, ParticipantIdFactory, PusherChannel};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 参加者 ID を採番し、送信チャンネルを登録する
    ///
    /// # Arguments
    ///
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// 採番した参加者 ID（Domain Model）
    pub async fn execute(&self, sender: PusherChannel) -> ParticipantId {
        let participant = ParticipantIdFactory::generate();
        self.message_pusher
            .register_client(participant.clone(), sender)
            .await;
        participant
    }
}
