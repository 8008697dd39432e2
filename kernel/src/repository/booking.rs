use crate::model::{
    booking::{
        event::{CreateBooking, UpdateBooking},
        Booking, BookingWithRoom,
    },
    id::{BookingId, RoomId, UserId},
};
use async_trait::async_trait;
use shared::error::AppResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    // ユーザー ID に紐づく予約を部屋情報込みで取得する（複数ある場合は最も古いもの）
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Option<BookingWithRoom>>;
    // 部屋 ID に紐づく予約を1件取得する
    async fn find_by_room_id(&self, room_id: RoomId) -> AppResult<Option<Booking>>;
    // 予約 ID から予約を取得する
    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>>;
    // 予約を作成する。定員に達していれば AppError::RoomFull を返す
    async fn create(&self, event: CreateBooking) -> AppResult<Booking>;
    // 予約の部屋を付け替え、更新した行数を返す。定員に達していれば AppError::RoomFull を返す
    async fn update(&self, event: UpdateBooking) -> AppResult<u64>;
}
