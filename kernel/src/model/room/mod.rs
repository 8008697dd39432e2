use crate::model::{
    booking::Booking,
    id::{HotelId, RoomId},
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub room_id: RoomId,
    pub name: String,
    pub capacity: i32,
    pub hotel_id: HotelId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 部屋の定員と、その部屋に紐づく予約の一覧
#[derive(Debug, Clone)]
pub struct RoomOccupancy {
    pub room_id: RoomId,
    pub capacity: i32,
    pub bookings: Vec<Booking>,
}

impl RoomOccupancy {
    pub fn occupied(&self) -> usize {
        self.bookings.len()
    }

    /// 予約数が定員に達していれば満室とみなす。
    pub fn is_full(&self) -> bool {
        has_no_vacancy(self.occupied(), self.capacity)
    }
}

/// 予約数 `occupied` が定員 `capacity` 未満でなければ空きはない。
/// 定員が 0 以下の部屋は常に満室として扱う。
pub fn has_no_vacancy(occupied: usize, capacity: i32) -> bool {
    match usize::try_from(capacity) {
        Ok(capacity) => occupied >= capacity,
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::id::{BookingId, UserId};

    fn occupancy(capacity: i32, count: i32) -> RoomOccupancy {
        let now = Utc::now();
        RoomOccupancy {
            room_id: RoomId::new(1),
            capacity,
            bookings: (1..=count)
                .map(|i| Booking {
                    booking_id: BookingId::new(i),
                    user_id: UserId::new(i),
                    room_id: RoomId::new(1),
                    created_at: now,
                    updated_at: now,
                })
                .collect(),
        }
    }

    #[test]
    fn room_is_full_when_count_reaches_capacity() {
        assert!(!occupancy(2, 0).is_full());
        assert!(!occupancy(2, 1).is_full());
        assert!(occupancy(2, 2).is_full());
        assert!(occupancy(2, 3).is_full());
    }

    #[test]
    fn non_positive_capacity_never_admits() {
        assert!(occupancy(0, 0).is_full());
        assert!(has_no_vacancy(0, -1));
    }
}
