use crate::model::{
    id::{BookingId, RoomId, UserId},
    room::Room,
};
use chrono::{DateTime, Utc};

pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub room_id: RoomId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ユーザーの予約を部屋情報込みで返すときの型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingWithRoom {
    pub booking_id: BookingId,
    pub room: Room,
}
