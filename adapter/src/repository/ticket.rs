use crate::database::{
    model::ticket::{EnrollmentRow, TicketRow},
    ConnectionPool,
};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::{
    id::{EnrollmentId, UserId},
    ticket::{Enrollment, Ticket},
};
use kernel::repository::ticket::TicketRepository;
use shared::error::{AppError, AppResult};

#[derive(new)]
pub struct TicketRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl TicketRepository for TicketRepositoryImpl {
    async fn find_enrollment_by_user_id(&self, user_id: UserId) -> AppResult<Option<Enrollment>> {
        sqlx::query_as::<_, EnrollmentRow>(
            r#"
                SELECT enrollment_id, user_id
                FROM enrollments
                WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map(|row| row.map(Enrollment::from))
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_ticket_by_enrollment_id(
        &self,
        enrollment_id: EnrollmentId,
    ) -> AppResult<Option<Ticket>> {
        sqlx::query_as::<_, TicketRow>(
            r#"
                SELECT
                t.ticket_id,
                t.enrollment_id,
                t.status,
                tt.name AS ticket_type_name,
                tt.is_remote,
                tt.includes_hotel
                FROM tickets AS t
                INNER JOIN ticket_types AS tt ON t.ticket_type_id = tt.ticket_type_id
                WHERE t.enrollment_id = $1
                ORDER BY t.ticket_id ASC
                LIMIT 1
            "#,
        )
        .bind(enrollment_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map(|row| row.map(Ticket::from))
        .map_err(AppError::SpecificOperationError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::model::ticket::TicketStatus;

    #[sqlx::test(migrations = "../migrations", fixtures("common"))]
    #[ignore = "requires DATABASE_URL"]
    async fn find_ticket_through_enrollment(pool: sqlx::PgPool) -> anyhow::Result<()> {
        let repo = TicketRepositoryImpl::new(ConnectionPool::new(pool));

        let enrollment = repo.find_enrollment_by_user_id(UserId::new(1)).await?;
        let enrollment = enrollment.expect("user 1 is enrolled");
        let ticket = repo
            .find_ticket_by_enrollment_id(enrollment.enrollment_id)
            .await?
            .expect("enrollment 1 has a ticket");
        assert_eq!(ticket.status, TicketStatus::Paid);
        assert!(ticket.ticket_type.is_remote);
        assert_eq!(ticket.ticket_type.name, "Remote");

        let unpaid = repo
            .find_ticket_by_enrollment_id(EnrollmentId::new(2))
            .await?
            .expect("enrollment 2 has a ticket");
        assert_eq!(unpaid.status, TicketStatus::Reserved);
        assert_eq!(unpaid.ticket_type.name, "InPerson");
        assert!(!unpaid.ticket_type.is_remote);

        assert!(repo.find_enrollment_by_user_id(UserId::new(3)).await?.is_none());
        Ok(())
    }
}
