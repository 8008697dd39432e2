use kernel::model::{
    id::{EnrollmentId, TicketId, UserId},
    ticket::{Enrollment, Ticket, TicketStatus, TicketType},
};

#[derive(sqlx::FromRow)]
pub struct EnrollmentRow {
    pub enrollment_id: EnrollmentId,
    pub user_id: UserId,
}

impl From<EnrollmentRow> for Enrollment {
    fn from(value: EnrollmentRow) -> Self {
        let EnrollmentRow {
            enrollment_id,
            user_id,
        } = value;
        Enrollment {
            enrollment_id,
            user_id,
        }
    }
}

// tickets と ticket_types を JOIN した結果を受ける型
#[derive(sqlx::FromRow)]
pub struct TicketRow {
    pub ticket_id: TicketId,
    pub enrollment_id: EnrollmentId,
    pub status: TicketStatus,
    pub ticket_type_name: String,
    pub is_remote: bool,
    pub includes_hotel: bool,
}

impl From<TicketRow> for Ticket {
    fn from(value: TicketRow) -> Self {
        let TicketRow {
            ticket_id,
            enrollment_id,
            status,
            ticket_type_name,
            is_remote,
            includes_hotel,
        } = value;
        Ticket {
            ticket_id,
            enrollment_id,
            status,
            ticket_type: TicketType {
                name: ticket_type_name,
                is_remote,
                includes_hotel,
            },
        }
    }
}
