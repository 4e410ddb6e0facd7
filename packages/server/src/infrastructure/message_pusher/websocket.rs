//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を参加者 ID で管理
//! - 参加者へのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket とチャンネルの生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された送信側を受け取り、UseCase からの JSON フレームを流し込みます。
//! チャンネルから WebSocket への書き出しは接続ごとの送信タスクが担当します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessagePushError, MessagePusher, ParticipantId, PusherChannel};

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// 接続中の参加者と対応するチャンネル送信側のマップ
    clients: Mutex<HashMap<ParticipantId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count_clients(&self) -> usize {
        self.clients.lock().await.len()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, participant: ParticipantId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Participant '{}' registered to MessagePusher", participant);
        clients.insert(participant, sender);
    }

    async fn unregister_client(&self, participant: &ParticipantId) {
        let mut clients = self.clients.lock().await;
        clients.remove(participant);
        tracing::debug!("Participant '{}' unregistered from MessagePusher", participant);
    }

    async fn push_to(
        &self,
        participant: &ParticipantId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let sender = clients
            .get(participant)
            .ok_or_else(|| MessagePushError::ClientNotFound(participant.to_string()))?;
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to participant '{}'", participant);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ParticipantId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        let total = targets.len();
        let mut delivered = 0;
        for target in targets {
            match clients.get(&target) {
                Some(sender) => {
                    // 一部の送信失敗は許容
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!("Failed to push message to participant '{}': {}", target, e);
                    } else {
                        delivered += 1;
                    }
                }
                None => {
                    tracing::warn!("Participant '{}' not found during broadcast, skipping", target);
                }
            }
        }

        if total > 0 && delivered == 0 {
            return Err(MessagePushError::PushFailed(format!(
                "none of {} participant(s) reachable",
                total
            )));
        }
        Ok(())
    }
}
