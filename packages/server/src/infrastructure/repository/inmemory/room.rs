//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! room id をキーとする HashMap をインメモリ DB として使用します。
//!
//! ## 設計ノート
//!
//! HashMap 全体を 1 つの `Mutex` で保護します。各メソッドはロックを 1 回だけ取得し、
//! その中で `Room` の状態遷移を 1 回だけ行います。同じ部屋への参加・回答送信・切断が
//! 同時に届いても、いずれかの順序に直列化されます。
//!
//! ## 技術的負債
//!
//! 部屋の数に関わらずロックは 1 つなので、別々の部屋の操作も互いに待ち合わせます。
//! 部屋数が増えた場合は部屋ごとのロックへの分割が必要です。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use quizduel_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    AnswerSet, GameResult, ParticipantId, ProfileSummary, RepositoryError, Room, RoomDeparture,
    RoomId, RoomRepository, TimeRange, Timestamp,
};

/// インメモリ Room Repository 実装
///
/// Room ドメインモデルを保持し、ドメイン層の RoomRepository trait を実装します（依存性の逆転）。
pub struct InMemoryRoomRepository {
    /// room id → Room ドメインモデル
    rooms: Mutex<HashMap<RoomId, Room>>,
    /// 部屋の作成時刻に使う時計
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub async fn count_rooms(&self) -> usize {
        self.rooms.lock().await.len()
    }
}

fn room_not_found(room_id: &RoomId) -> RepositoryError {
    RepositoryError::RoomNotFound(room_id.as_str().to_string())
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn reserve_seat(
        &self,
        room_id: &RoomId,
        participant: &ParticipantId,
        requested: Option<TimeRange>,
    ) -> Result<TimeRange, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.entry(room_id.clone()).or_insert_with(|| {
            tracing::info!("Room '{}' created", room_id);
            Room::new(room_id.clone(), Timestamp::new(self.clock.now_millis()))
        });

        let time_range = room.reserve_seat(participant.clone(), requested)?;
        tracing::debug!(
            "Participant '{}' seated in room '{}' ({}/{})",
            participant,
            room_id,
            room.participants.len(),
            crate::domain::ROOM_CAPACITY
        );
        Ok(time_range)
    }

    async fn release_seat(
        &self,
        room_id: &RoomId,
        participant: &ParticipantId,
    ) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or_else(|| room_not_found(room_id))?;

        room.remove_participant(participant);
        if room.is_empty() {
            rooms.remove(room_id);
            tracing::info!("Room '{}' removed (no participants left)", room_id);
        }
        Ok(())
    }

    async fn attach_profile(
        &self,
        room_id: &RoomId,
        participant: &ParticipantId,
        profile: ProfileSummary,
    ) -> Result<Option<Room>, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or_else(|| room_not_found(room_id))?;

        let completed = room.attach_profile(participant, profile)?;
        Ok(completed.then(|| room.clone()))
    }

    async fn submit_answers(
        &self,
        room_id: &RoomId,
        participant: &ParticipantId,
        answers: AnswerSet,
    ) -> Result<Option<GameResult>, RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id).ok_or_else(|| room_not_found(room_id))?;

        Ok(room.submit_answers(participant, answers)?)
    }

    async fn remove_participant(&self, participant: &ParticipantId) -> Vec<RoomDeparture> {
        let mut rooms = self.rooms.lock().await;

        let departures: Vec<RoomDeparture> = rooms
            .values_mut()
            .filter_map(|room| room.remove_participant(participant))
            .collect();

        rooms.retain(|room_id, room| {
            let keep = !room.is_empty();
            if !keep {
                tracing::info!("Room '{}' removed (no participants left)", room_id);
            }
            keep
        });

        departures
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| room_not_found(room_id))
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut all: Vec<Room> = rooms.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        all
    }
}
