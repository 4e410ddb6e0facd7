//! UseCase: 部屋一覧・部屋詳細の取得

use std::sync::Arc;

use crate::domain::{RepositoryError, Room, RoomId, RoomRepository};

use super::error::GetRoomDetailError;

/// 部屋一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 作成順の部屋一覧
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.get_rooms().await
    }
}

/// 部屋詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::try_from(room_id).map_err(|_| GetRoomDetailError::InvalidRoomId)?;
        self.repository
            .get_room(&room_id)
            .await
            .map_err(|e| match e {
                RepositoryError::RoomNotFound(_) => GetRoomDetailError::RoomNotFound,
                RepositoryError::Room(_) => GetRoomDetailError::RoomNotFound,
            })
    }
}
