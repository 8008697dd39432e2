use crate::model::{id::RoomId, room::RoomOccupancy};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    // 部屋の定員と現在の予約一覧を取得する。部屋が存在しなければ None
    async fn find_with_bookings(&self, room_id: RoomId) -> AppResult<Option<RoomOccupancy>>;
}
