use kernel::model::{
    booking::{Booking, BookingWithRoom},
    id::{BookingId, HotelId, RoomId, UserId},
    room::Room,
};
use sqlx::types::chrono::{DateTime, Utc};

// bookings テーブルの1行
#[derive(sqlx::FromRow)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub room_id: RoomId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(value: BookingRow) -> Self {
        let BookingRow {
            booking_id,
            user_id,
            room_id,
            created_at,
            updated_at,
        } = value;
        Booking {
            booking_id,
            user_id,
            room_id,
            created_at,
            updated_at,
        }
    }
}

// ユーザーの予約を取得する際に rooms と JOIN した結果を受ける型
#[derive(sqlx::FromRow)]
pub struct BookingWithRoomRow {
    pub booking_id: BookingId,
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
    pub hotel_id: HotelId,
    pub room_created_at: DateTime<Utc>,
    pub room_updated_at: DateTime<Utc>,
}

impl From<BookingWithRoomRow> for BookingWithRoom {
    fn from(value: BookingWithRoomRow) -> Self {
        let BookingWithRoomRow {
            booking_id,
            room_id,
            name,
            capacity,
            hotel_id,
            room_created_at,
            room_updated_at,
        } = value;
        BookingWithRoom {
            booking_id,
            room: Room {
                room_id,
                name,
                capacity,
                hotel_id,
                created_at: room_created_at,
                updated_at: room_updated_at,
            },
        }
    }
}
