use std::sync::Arc;

use crate::{
    model::{
        booking::{
            event::{CreateBooking, UpdateBooking},
            Booking, BookingWithRoom,
        },
        id::{BookingId, RoomId, UserId},
        room::RoomOccupancy,
        ticket::TicketEligibility,
    },
    repository::{booking::BookingRepository, room::RoomRepository, ticket::TicketRepository},
};
use derive_new::new;
use shared::error::{AppError, AppResult};

/// 予約に関する業務ルール（チケットの有効性・部屋の定員）を確認したうえで
/// リポジトリへの読み書きを行う。
#[derive(new, Clone)]
pub struct BookingService {
    booking_repository: Arc<dyn BookingRepository>,
    room_repository: Arc<dyn RoomRepository>,
    ticket_repository: Arc<dyn TicketRepository>,
}

impl BookingService {
    pub async fn find_booking(&self, user_id: UserId) -> AppResult<BookingWithRoom> {
        self.booking_repository
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!(
                    "ユーザー（{user_id}）の予約が見つかりませんでした。"
                ))
            })
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_booking(&self, user_id: UserId, room_id: RoomId) -> AppResult<Booking> {
        // チェックの順序は 部屋の存在 → チケット → 定員
        let occupancy = self.find_room(room_id).await?;

        let eligibility = self.ticket_eligibility(user_id).await?;
        if !eligibility.is_eligible() {
            tracing::info!(reason = eligibility.reason(), "booking rejected");
            return Err(AppError::EntityNotFound(format!(
                "ユーザー（{user_id}）に予約可能なチケットが見つかりませんでした。"
            )));
        }

        ensure_vacancy(&occupancy)?;

        let booking = self
            .booking_repository
            .create(CreateBooking::new(user_id, room_id))
            .await?;
        tracing::info!(booking_id = %booking.booking_id, "booking created");
        Ok(booking)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_booking(
        &self,
        booking_id: BookingId,
        user_id: UserId,
        room_id: RoomId,
    ) -> AppResult<Booking> {
        let occupancy = self.find_room(room_id).await?;

        // 更新時はチケットの再確認は行わない
        if self
            .booking_repository
            .find_by_user_id(user_id)
            .await?
            .is_none()
        {
            return Err(AppError::EntityNotFound(format!(
                "ユーザー（{user_id}）の予約が見つかりませんでした。"
            )));
        }

        ensure_vacancy(&occupancy)?;

        let affected = self
            .booking_repository
            .update(UpdateBooking::new(booking_id, user_id, room_id))
            .await?;
        if affected < 1 {
            return Err(AppError::EntityNotFound(format!(
                "予約（{booking_id}）が見つかりませんでした。"
            )));
        }

        let booking = self
            .booking_repository
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| {
                AppError::EntityNotFound(format!("予約（{booking_id}）が見つかりませんでした。"))
            })?;
        tracing::info!("booking updated");
        Ok(booking)
    }

    async fn find_room(&self, room_id: RoomId) -> AppResult<RoomOccupancy> {
        self.room_repository
            .find_with_bookings(room_id)
            .await?
            .ok_or_else(|| AppError::EntityNotFound(format!("部屋（{room_id}）が見つかりませんでした。")))
    }

    async fn ticket_eligibility(&self, user_id: UserId) -> AppResult<TicketEligibility> {
        let enrollment = self
            .ticket_repository
            .find_enrollment_by_user_id(user_id)
            .await?;
        let ticket = match &enrollment {
            Some(e) => {
                self.ticket_repository
                    .find_ticket_by_enrollment_id(e.enrollment_id)
                    .await?
            }
            None => None,
        };
        if let Some(t) = &ticket {
            tracing::debug!(
                ticket_id = %t.ticket_id,
                ticket_type = %t.ticket_type.name,
                status = ?t.status,
                "ticket found"
            );
        }
        Ok(TicketEligibility::evaluate(
            enrollment.as_ref(),
            ticket.as_ref(),
        ))
    }
}

fn ensure_vacancy(occupancy: &RoomOccupancy) -> AppResult<()> {
    if occupancy.is_full() {
        tracing::info!(
            room_id = %occupancy.room_id,
            capacity = occupancy.capacity,
            occupied = occupancy.occupied(),
            "room is full"
        );
        return Err(AppError::RoomFull(occupancy.room_id.raw()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::ticket::TicketStatus, testing::InMemoryStore};

    fn service(store: &InMemoryStore) -> BookingService {
        let store = Arc::new(store.clone());
        BookingService::new(store.clone(), store.clone(), store)
    }

    fn user_with_ticket(store: &InMemoryStore, status: TicketStatus, is_remote: bool) -> UserId {
        let user_id = store.add_user();
        let enrollment_id = store.add_enrollment(user_id);
        store.add_ticket(enrollment_id, status, is_remote);
        user_id
    }

    #[tokio::test]
    async fn find_booking_returns_the_users_room() -> anyhow::Result<()> {
        let store = InMemoryStore::new();
        let room_id = store.add_room(2);
        let user_id = store.add_user();
        let booking_id = store.add_booking(user_id, room_id);

        let found = service(&store).find_booking(user_id).await?;
        assert_eq!(found.booking_id, booking_id);
        assert_eq!(found.room.room_id, room_id);
        Ok(())
    }

    #[tokio::test]
    async fn find_booking_without_reservation_is_not_found() {
        let store = InMemoryStore::new();
        let user_id = store.add_user();

        let res = service(&store).find_booking(user_id).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
    }

    #[tokio::test]
    async fn create_booking_persists_one_row() -> anyhow::Result<()> {
        let store = InMemoryStore::new();
        let room_id = store.add_room(2);
        let user_id = user_with_ticket(&store, TicketStatus::Paid, true);

        let booking = service(&store).create_booking(user_id, room_id).await?;
        assert_eq!(booking.user_id, user_id);
        assert_eq!(booking.room_id, room_id);

        let rows = store.bookings();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], booking);

        // 作成した予約はそのままユーザーの予約として引ける
        let found = service(&store).find_booking(user_id).await?;
        assert_eq!(found.room.room_id, room_id);
        Ok(())
    }

    #[tokio::test]
    async fn create_booking_on_missing_room_is_not_found() {
        let store = InMemoryStore::new();
        let user_id = user_with_ticket(&store, TicketStatus::Paid, true);

        let res = service(&store)
            .create_booking(user_id, RoomId::new(10_000_000))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        assert!(store.bookings().is_empty());
    }

    #[tokio::test]
    async fn create_booking_on_full_room_is_rejected() {
        let store = InMemoryStore::new();
        let room_id = store.add_room(2);
        let other = store.add_user();
        store.add_booking(other, room_id);
        store.add_booking(other, room_id);
        let user_id = user_with_ticket(&store, TicketStatus::Paid, true);

        let res = service(&store).create_booking(user_id, room_id).await;
        assert!(matches!(res, Err(AppError::RoomFull(_))));
        assert_eq!(store.bookings().len(), 2);
    }

    #[tokio::test]
    async fn create_booking_requires_paid_remote_ticket() {
        let store = InMemoryStore::new();
        let room_id = store.add_room(2);

        let no_enrollment = store.add_user();
        let no_ticket = store.add_user();
        store.add_enrollment(no_ticket);
        let unpaid = user_with_ticket(&store, TicketStatus::Reserved, true);
        let in_person = user_with_ticket(&store, TicketStatus::Paid, false);

        for user_id in [no_enrollment, no_ticket, unpaid, in_person] {
            let res = service(&store).create_booking(user_id, room_id).await;
            assert!(
                matches!(res, Err(AppError::EntityNotFound(_))),
                "user {user_id} should be rejected"
            );
        }
        assert!(store.bookings().is_empty());
    }

    #[tokio::test]
    async fn missing_room_wins_over_missing_ticket() {
        let store = InMemoryStore::new();
        let user_id = store.add_user();

        let res = service(&store)
            .create_booking(user_id, RoomId::new(42))
            .await;
        let Err(AppError::EntityNotFound(msg)) = res else {
            panic!("expected not found");
        };
        assert!(msg.contains("部屋"));
    }

    #[tokio::test]
    async fn ineligible_ticket_wins_over_full_room() {
        let store = InMemoryStore::new();
        let room_id = store.add_room(1);
        let other = store.add_user();
        store.add_booking(other, room_id);
        let user_id = user_with_ticket(&store, TicketStatus::Reserved, true);

        let res = service(&store).create_booking(user_id, room_id).await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
    }

    #[tokio::test]
    async fn update_booking_moves_to_new_room() -> anyhow::Result<()> {
        let store = InMemoryStore::new();
        let old_room = store.add_room(2);
        let new_room = store.add_room(2);
        let user_id = store.add_user();
        let booking_id = store.add_booking(user_id, old_room);

        let updated = service(&store)
            .update_booking(booking_id, user_id, new_room)
            .await?;
        assert_eq!(updated.booking_id, booking_id);
        assert_eq!(updated.user_id, user_id);
        assert_eq!(updated.room_id, new_room);
        Ok(())
    }

    #[tokio::test]
    async fn update_booking_returns_the_mutated_booking_not_a_roommate() -> anyhow::Result<()> {
        let store = InMemoryStore::new();
        let old_room = store.add_room(2);
        let shared_room = store.add_room(3);
        let roommate = store.add_user();
        store.add_booking(roommate, shared_room);
        let user_id = store.add_user();
        let booking_id = store.add_booking(user_id, old_room);

        let updated = service(&store)
            .update_booking(booking_id, user_id, shared_room)
            .await?;
        assert_eq!(updated.booking_id, booking_id);
        assert_eq!(updated.user_id, user_id);
        Ok(())
    }

    #[tokio::test]
    async fn update_booking_to_full_room_keeps_original_assignment() {
        let store = InMemoryStore::new();
        let old_room = store.add_room(2);
        let full_room = store.add_room(1);
        let other = store.add_user();
        store.add_booking(other, full_room);
        let user_id = store.add_user();
        let booking_id = store.add_booking(user_id, old_room);

        let res = service(&store)
            .update_booking(booking_id, user_id, full_room)
            .await;
        assert!(matches!(res, Err(AppError::RoomFull(_))));

        let original = store
            .bookings()
            .into_iter()
            .find(|b| b.booking_id == booking_id);
        assert_eq!(original.map(|b| b.room_id), Some(old_room));
    }

    #[tokio::test]
    async fn update_booking_without_existing_reservation_is_not_found() {
        let store = InMemoryStore::new();
        let room_id = store.add_room(2);
        let user_id = store.add_user();

        let res = service(&store)
            .update_booking(BookingId::new(1), user_id, room_id)
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
    }

    #[tokio::test]
    async fn update_unknown_booking_id_is_not_found_and_mutates_nothing() {
        let store = InMemoryStore::new();
        let old_room = store.add_room(2);
        let new_room = store.add_room(2);
        let user_id = store.add_user();
        store.add_booking(user_id, old_room);
        let before = store.bookings();

        let res = service(&store)
            .update_booking(BookingId::new(999), user_id, new_room)
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
        assert_eq!(store.bookings(), before);
    }

    #[tokio::test]
    async fn update_booking_on_missing_room_is_not_found() {
        let store = InMemoryStore::new();
        let old_room = store.add_room(2);
        let user_id = store.add_user();
        let booking_id = store.add_booking(user_id, old_room);

        let res = service(&store)
            .update_booking(booking_id, user_id, RoomId::new(10_000_000))
            .await;
        assert!(matches!(res, Err(AppError::EntityNotFound(_))));
    }

    #[tokio::test]
    async fn concurrent_creates_never_overbook() {
        let store = InMemoryStore::new();
        let room_id = store.add_room(2);
        let users: Vec<UserId> = (0..8)
            .map(|_| user_with_ticket(&store, TicketStatus::Paid, true))
            .collect();

        let svc = service(&store);
        let handles: Vec<_> = users
            .into_iter()
            .map(|user_id| {
                let svc = svc.clone();
                tokio::spawn(async move { svc.create_booking(user_id, room_id).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.expect("task panicked") {
                Ok(_) => created += 1,
                Err(AppError::RoomFull(_)) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(created, 2);
        assert_eq!(store.bookings().len(), 2);
    }
}
