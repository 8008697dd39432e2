use kernel::model::{booking::Booking, id::RoomId, room::RoomOccupancy};

#[derive(sqlx::FromRow)]
pub struct RoomCapacityRow {
    pub room_id: RoomId,
    pub capacity: i32,
}

impl RoomCapacityRow {
    pub fn into_occupancy(self, bookings: Vec<Booking>) -> RoomOccupancy {
        let RoomCapacityRow { room_id, capacity } = self;
        RoomOccupancy {
            room_id,
            capacity,
            bookings,
        }
    }
}
