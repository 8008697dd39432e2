use crate::database::{
    model::{booking::BookingRow, room::RoomCapacityRow},
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{booking::Booking, id::RoomId, room::RoomOccupancy};
use kernel::repository::room::RoomRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct RoomRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl RoomRepository for RoomRepositoryImpl {
    async fn find_with_bookings(&self, room_id: RoomId) -> AppResult<Option<RoomOccupancy>> {
        let Some(room) = sqlx::query_as::<_, RoomCapacityRow>(
            r#"
                SELECT room_id, capacity
                FROM rooms
                WHERE room_id = $1
            "#,
        )
        .bind(room_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        else {
            return Ok(None);
        };

        let bookings = sqlx::query_as::<_, BookingRow>(
            r#"
                SELECT booking_id, user_id, room_id, created_at, updated_at
                FROM bookings
                WHERE room_id = $1
                ORDER BY booking_id ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?
        .into_iter()
        .map(Booking::from)
        .collect();

        Ok(Some(room.into_occupancy(bookings)))
    }
}
