use crate::database::{
    model::booking::{BookingRow, BookingWithRoomRow},
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    booking::{
        event::{CreateBooking, UpdateBooking},
        Booking, BookingWithRoom,
    },
    id::{BookingId, RoomId, UserId},
    room::has_no_vacancy,
};
use kernel::repository::booking::BookingRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct BookingRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl BookingRepository for BookingRepositoryImpl {
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Option<BookingWithRoom>> {
        // 1ユーザー1予約を想定しているが一意制約はないため、最も古い予約を返す
        sqlx::query_as::<_, BookingWithRoomRow>(
            r#"
                SELECT
                b.booking_id,
                r.room_id,
                r.name,
                r.capacity,
                r.hotel_id,
                r.created_at AS room_created_at,
                r.updated_at AS room_updated_at
                FROM bookings AS b
                INNER JOIN rooms AS r ON b.room_id = r.room_id
                WHERE b.user_id = $1
                ORDER BY b.booking_id ASC
                LIMIT 1
                ;
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map(|row| row.map(BookingWithRoom::from))
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_room_id(&self, room_id: RoomId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, BookingRow>(
            r#"
                SELECT booking_id, user_id, room_id, created_at, updated_at
                FROM bookings
                WHERE room_id = $1
                ORDER BY booking_id ASC
                LIMIT 1
                ;
            "#,
        )
        .bind(room_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map(|row| row.map(Booking::from))
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, BookingRow>(
            r#"
                SELECT booking_id, user_id, room_id, created_at, updated_at
                FROM bookings
                WHERE booking_id = $1
                ;
            "#,
        )
        .bind(booking_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map(|row| row.map(Booking::from))
        .map_err(AppError::SpecificOperationError)
    }

    async fn create(&self, event: CreateBooking) -> AppResult<Booking> {
        let mut tx = self.db.begin().await?;

        // 部屋の行をロックしたうえで予約数を数え直す。
        // 同じ部屋への書き込みはここで直列化されるので、定員を超えることはない
        self.ensure_vacancy_locked(&mut tx, event.room_id).await?;

        let booking = sqlx::query_as::<_, BookingRow>(
            r#"
                INSERT INTO bookings (user_id, room_id)
                VALUES ($1, $2)
                RETURNING booking_id, user_id, room_id, created_at, updated_at
                ;
            "#,
        )
        .bind(event.user_id)
        .bind(event.room_id)
        .fetch_one(&mut *tx)
        .await
        .map(Booking::from)
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(booking)
    }

    async fn update(&self, event: UpdateBooking) -> AppResult<u64> {
        let mut tx = self.db.begin().await?;

        self.ensure_vacancy_locked(&mut tx, event.room_id).await?;

        // 他のユーザーの予約は書き換えない
        let res = sqlx::query(
            r#"
                UPDATE bookings
                SET room_id = $3
                WHERE booking_id = $1 AND user_id = $2
                ;
            "#,
        )
        .bind(event.booking_id)
        .bind(event.user_id)
        .bind(event.room_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(res.rows_affected())
    }
}

impl BookingRepositoryImpl {
    // create, update の中で使う。部屋を FOR UPDATE でロックし、
    // ロック取得後の予約数が定員未満であることを確認する
    async fn ensure_vacancy_locked(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        room_id: RoomId,
    ) -> AppResult<()> {
        let capacity = sqlx::query_scalar::<_, i32>(
            r#"
                SELECT capacity FROM rooms WHERE room_id = $1 FOR UPDATE
            "#,
        )
        .bind(room_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("部屋（{room_id}）が見つかりませんでした。"))
        })?;

        let occupied = sqlx::query_scalar::<_, i64>(
            r#"
                SELECT COUNT(*) FROM bookings WHERE room_id = $1
            "#,
        )
        .bind(room_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let occupied = usize::try_from(occupied)
            .map_err(|e| AppError::ConversionEntityError(e.to_string()))?;
        if has_no_vacancy(occupied, capacity) {
            return Err(AppError::RoomFull(room_id.raw()));
        }
        Ok(())
    }
}
