use crate::model::id::{EnrollmentId, TicketId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub enrollment_id: EnrollmentId,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "ticket_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Reserved,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketType {
    pub name: String,
    pub is_remote: bool,
    pub includes_hotel: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub ticket_id: TicketId,
    pub enrollment_id: EnrollmentId,
    pub status: TicketStatus,
    pub ticket_type: TicketType,
}

/// 予約を作成してよいかの判定結果。
///
/// 外部には `Eligible` 以外はすべて「見つからない」として返すが、
/// 理由はログに残せるように区別しておく。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketEligibility {
    Eligible,
    NoEnrollment,
    NoTicket,
    NotRemote,
    Unpaid,
}

impl TicketEligibility {
    pub fn evaluate(enrollment: Option<&Enrollment>, ticket: Option<&Ticket>) -> Self {
        let Some(_) = enrollment else {
            return Self::NoEnrollment;
        };
        let Some(ticket) = ticket else {
            return Self::NoTicket;
        };
        if !ticket.ticket_type.is_remote {
            return Self::NotRemote;
        }
        if ticket.status != TicketStatus::Paid {
            return Self::Unpaid;
        }
        Self::Eligible
    }

    pub fn is_eligible(self) -> bool {
        matches!(self, Self::Eligible)
    }

    pub fn reason(self) -> &'static str {
        match self {
            Self::Eligible => "eligible",
            Self::NoEnrollment => "user has no enrollment",
            Self::NoTicket => "enrollment has no ticket",
            Self::NotRemote => "ticket type is not remote",
            Self::Unpaid => "ticket is not paid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment() -> Enrollment {
        Enrollment {
            enrollment_id: EnrollmentId::new(1),
            user_id: UserId::new(1),
        }
    }

    fn ticket(status: TicketStatus, is_remote: bool) -> Ticket {
        Ticket {
            ticket_id: TicketId::new(1),
            enrollment_id: EnrollmentId::new(1),
            status,
            ticket_type: TicketType {
                name: "Remote".into(),
                is_remote,
                includes_hotel: false,
            },
        }
    }

    #[test]
    fn paid_remote_ticket_is_eligible() {
        let t = ticket(TicketStatus::Paid, true);
        let res = TicketEligibility::evaluate(Some(&enrollment()), Some(&t));
        assert!(res.is_eligible());
    }

    #[test]
    fn each_failure_has_its_own_reason() {
        let e = enrollment();
        assert_eq!(
            TicketEligibility::evaluate(None, None),
            TicketEligibility::NoEnrollment
        );
        assert_eq!(
            TicketEligibility::evaluate(Some(&e), None),
            TicketEligibility::NoTicket
        );
        let in_person = ticket(TicketStatus::Paid, false);
        assert_eq!(
            TicketEligibility::evaluate(Some(&e), Some(&in_person)),
            TicketEligibility::NotRemote
        );
        let unpaid = ticket(TicketStatus::Reserved, true);
        assert_eq!(
            TicketEligibility::evaluate(Some(&e), Some(&unpaid)),
            TicketEligibility::Unpaid
        );
    }
}
