//! ストレージを使わずにサービス層・ハンドラを検証するためのインメモリ実装。

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    model::{
        booking::{
            event::{CreateBooking, UpdateBooking},
            Booking, BookingWithRoom,
        },
        id::{BookingId, EnrollmentId, HotelId, RoomId, TicketId, UserId},
        room::{has_no_vacancy, Room, RoomOccupancy},
        ticket::{Enrollment, Ticket, TicketStatus, TicketType},
    },
    repository::{
        auth::AuthRepository, booking::BookingRepository, health::HealthCheckRepository,
        room::RoomRepository, ticket::TicketRepository,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use shared::error::{AppError, AppResult};

#[derive(Default)]
struct Tables {
    next_id: i32,
    rooms: Vec<Room>,
    bookings: Vec<Booking>,
    enrollments: Vec<Enrollment>,
    tickets: Vec<Ticket>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn occupied(&self, room_id: RoomId) -> usize {
        self.bookings.iter().filter(|b| b.room_id == room_id).count()
    }
}

/// すべての行を1つの Mutex で守るため、定員チェックと書き込みは常に不可分になる。
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_user(&self) -> UserId {
        UserId::new(self.lock().next_id())
    }

    pub fn add_room(&self, capacity: i32) -> RoomId {
        let mut t = self.lock();
        let room_id = RoomId::new(t.next_id());
        let now = Utc::now();
        t.rooms.push(Room {
            room_id,
            name: format!("Room {room_id}"),
            capacity,
            hotel_id: HotelId::new(1),
            created_at: now,
            updated_at: now,
        });
        room_id
    }

    /// 定員を確認せずに予約を追加する。
    pub fn add_booking(&self, user_id: UserId, room_id: RoomId) -> BookingId {
        let mut t = self.lock();
        let booking_id = BookingId::new(t.next_id());
        let now = Utc::now();
        t.bookings.push(Booking {
            booking_id,
            user_id,
            room_id,
            created_at: now,
            updated_at: now,
        });
        booking_id
    }

    pub fn add_enrollment(&self, user_id: UserId) -> EnrollmentId {
        let mut t = self.lock();
        let enrollment_id = EnrollmentId::new(t.next_id());
        t.enrollments.push(Enrollment {
            enrollment_id,
            user_id,
        });
        enrollment_id
    }

    pub fn add_ticket(
        &self,
        enrollment_id: EnrollmentId,
        status: TicketStatus,
        is_remote: bool,
    ) -> TicketId {
        let mut t = self.lock();
        let ticket_id = TicketId::new(t.next_id());
        t.tickets.push(Ticket {
            ticket_id,
            enrollment_id,
            status,
            ticket_type: TicketType {
                name: if is_remote { "Remote" } else { "InPerson" }.into(),
                is_remote,
                includes_hotel: !is_remote,
            },
        });
        ticket_id
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.lock().bookings.clone()
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Option<BookingWithRoom>> {
        let t = self.lock();
        let found = t
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .min_by_key(|b| b.booking_id)
            .and_then(|b| {
                t.rooms
                    .iter()
                    .find(|r| r.room_id == b.room_id)
                    .map(|room| BookingWithRoom {
                        booking_id: b.booking_id,
                        room: room.clone(),
                    })
            });
        Ok(found)
    }

    async fn find_by_room_id(&self, room_id: RoomId) -> AppResult<Option<Booking>> {
        Ok(self
            .lock()
            .bookings
            .iter()
            .filter(|b| b.room_id == room_id)
            .min_by_key(|b| b.booking_id)
            .cloned())
    }

    async fn find_by_id(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        Ok(self
            .lock()
            .bookings
            .iter()
            .find(|b| b.booking_id == booking_id)
            .cloned())
    }

    async fn create(&self, event: CreateBooking) -> AppResult<Booking> {
        let mut t = self.lock();
        let Some(capacity) = t
            .rooms
            .iter()
            .find(|r| r.room_id == event.room_id)
            .map(|r| r.capacity)
        else {
            return Err(AppError::EntityNotFound(format!(
                "部屋（{}）が見つかりませんでした。",
                event.room_id
            )));
        };
        if has_no_vacancy(t.occupied(event.room_id), capacity) {
            return Err(AppError::RoomFull(event.room_id.raw()));
        }
        let now = Utc::now();
        let booking = Booking {
            booking_id: BookingId::new(t.next_id()),
            user_id: event.user_id,
            room_id: event.room_id,
            created_at: now,
            updated_at: now,
        };
        t.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn update(&self, event: UpdateBooking) -> AppResult<u64> {
        let mut t = self.lock();
        let Some(capacity) = t
            .rooms
            .iter()
            .find(|r| r.room_id == event.room_id)
            .map(|r| r.capacity)
        else {
            return Err(AppError::EntityNotFound(format!(
                "部屋（{}）が見つかりませんでした。",
                event.room_id
            )));
        };
        if has_no_vacancy(t.occupied(event.room_id), capacity) {
            return Err(AppError::RoomFull(event.room_id.raw()));
        }
        let Some(booking) = t
            .bookings
            .iter_mut()
            .find(|b| b.booking_id == event.booking_id && b.user_id == event.user_id)
        else {
            return Ok(0);
        };
        booking.room_id = event.room_id;
        booking.updated_at = Utc::now();
        Ok(1)
    }
}

#[async_trait]
impl RoomRepository for InMemoryStore {
    async fn find_with_bookings(&self, room_id: RoomId) -> AppResult<Option<RoomOccupancy>> {
        let t = self.lock();
        Ok(t.rooms
            .iter()
            .find(|r| r.room_id == room_id)
            .map(|room| RoomOccupancy {
                room_id,
                capacity: room.capacity,
                bookings: t
                    .bookings
                    .iter()
                    .filter(|b| b.room_id == room_id)
                    .cloned()
                    .collect(),
            }))
    }
}

#[async_trait]
impl TicketRepository for InMemoryStore {
    async fn find_enrollment_by_user_id(&self, user_id: UserId) -> AppResult<Option<Enrollment>> {
        Ok(self
            .lock()
            .enrollments
            .iter()
            .find(|e| e.user_id == user_id)
            .cloned())
    }

    async fn find_ticket_by_enrollment_id(
        &self,
        enrollment_id: EnrollmentId,
    ) -> AppResult<Option<Ticket>> {
        Ok(self
            .lock()
            .tickets
            .iter()
            .find(|t| t.enrollment_id == enrollment_id)
            .cloned())
    }
}

/// 固定のトークンとユーザーの対応だけを持つ認証リポジトリ。
#[derive(Clone, Default)]
pub struct StaticTokens {
    tokens: Arc<Mutex<HashMap<String, UserId>>>,
}

impl StaticTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, token: &str, user_id: UserId) {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.to_string(), user_id);
    }
}

#[async_trait]
impl AuthRepository for StaticTokens {
    async fn fetch_user_id_from_token(&self, access_token: &str) -> AppResult<Option<UserId>> {
        Ok(self
            .tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(access_token)
            .copied())
    }
}

#[async_trait]
impl HealthCheckRepository for InMemoryStore {
    async fn check_db(&self) -> bool {
        true
    }
}
