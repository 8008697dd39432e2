use chrono::{DateTime, Utc};
use garde::Validate;
use kernel::model::{
    booking::{Booking, BookingWithRoom},
    id::{BookingId, HotelId, RoomId, UserId},
    room::Room,
};
use serde::{Deserialize, Serialize};

// roomId が無い・null・0 以下の場合はいずれも検証エラーにする
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    #[garde(required, range(min = 1))]
    pub room_id: Option<i32>,
}

impl BookingRequest {
    /// 検証を通った roomId を取り出す。失敗はすべて検証エラーとして返す。
    pub fn into_room_id(self) -> Result<RoomId, garde::Report> {
        self.validate()?;
        match self.room_id {
            Some(room_id) => Ok(RoomId::new(room_id)),
            None => {
                let mut report = garde::Report::new();
                report.append(garde::Path::new("roomId"), garde::Error::new("not set"));
                Err(report)
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: BookingId,
    #[serde(rename = "Room")]
    pub room: RoomResponse,
}

impl From<BookingWithRoom> for BookingResponse {
    fn from(value: BookingWithRoom) -> Self {
        let BookingWithRoom { booking_id, room } = value;
        Self {
            id: booking_id,
            room: room.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub id: RoomId,
    pub name: String,
    pub capacity: i32,
    pub hotel_id: HotelId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Room> for RoomResponse {
    fn from(value: Room) -> Self {
        let Room {
            room_id,
            name,
            capacity,
            hotel_id,
            created_at,
            updated_at,
        } = value;
        Self {
            id: room_id,
            name,
            capacity,
            hotel_id,
            created_at,
            updated_at,
        }
    }
}

// 作成・更新の結果として返す予約レコード
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecordResponse {
    pub id: BookingId,
    pub user_id: UserId,
    pub room_id: RoomId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingRecordResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            booking_id,
            user_id,
            room_id,
            created_at,
            updated_at,
        } = value;
        Self {
            id: booking_id,
            user_id,
            room_id,
            created_at,
            updated_at,
        }
    }
}
