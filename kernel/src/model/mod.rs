pub mod booking;
pub mod id;
pub mod room;
pub mod ticket;
