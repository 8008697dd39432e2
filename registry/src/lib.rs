use std::sync::Arc;

use adapter::database::ConnectionPool;
use adapter::repository::{
    auth::AuthRepositoryImpl, booking::BookingRepositoryImpl, health::HealthCheckRepositoryImpl,
    room::RoomRepositoryImpl, ticket::TicketRepositoryImpl,
};
use kernel::repository::{auth::AuthRepository, health::HealthCheckRepository};
use kernel::service::booking::BookingService;
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    booking_service: Arc<BookingService>,
}

impl AppRegistry {
    pub fn new(pool: ConnectionPool, app_config: &AppConfig) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            pool.clone(),
            app_config.auth.jwt_secret.clone(),
        ));
        let booking_service = BookingService::new(
            Arc::new(BookingRepositoryImpl::new(pool.clone())),
            Arc::new(RoomRepositoryImpl::new(pool.clone())),
            Arc::new(TicketRepositoryImpl::new(pool.clone())),
        );
        Self::from_parts(health_check_repository, auth_repository, booking_service)
    }

    // PostgreSQL 以外の実装（テスト用のインメモリ実装など）を差し込むときに使う
    pub fn from_parts(
        health_check_repository: Arc<dyn HealthCheckRepository>,
        auth_repository: Arc<dyn AuthRepository>,
        booking_service: BookingService,
    ) -> Self {
        Self {
            health_check_repository,
            auth_repository,
            booking_service: Arc::new(booking_service),
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn booking_service(&self) -> Arc<BookingService> {
        self.booking_service.clone()
    }
}
