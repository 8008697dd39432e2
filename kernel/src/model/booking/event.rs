use crate::model::id::{BookingId, RoomId, UserId};
use derive_new::new;

#[derive(new, Debug, Clone, Copy)]
pub struct CreateBooking {
    pub user_id: UserId,
    pub room_id: RoomId,
}

#[derive(new, Debug, Clone, Copy)]
pub struct UpdateBooking {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub room_id: RoomId,
}
