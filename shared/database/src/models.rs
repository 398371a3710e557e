use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use leadbridge_common::{
    AppError, Event, Invitation, Lead, LeadVerificationLog, MentorProfile, Payment, Ticket, User,
};

// Enum columns are stored as TEXT and parsed on the way out.

#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = AppError;

    fn try_from(row: UserRecord) -> Result<Self, Self::Error> {
        Ok(User {
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            role: row.role.parse()?,
            email_verified: row.email_verified,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct MentorProfileRecord {
    pub mentor_id: Uuid,
    pub bio: Option<String>,
    pub expertise: Vec<String>, // PostgreSQL text array
    pub experience: Option<String>,
    pub verification_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<MentorProfileRecord> for MentorProfile {
    type Error = AppError;

    fn try_from(row: MentorProfileRecord) -> Result<Self, Self::Error> {
        Ok(MentorProfile {
            mentor_id: row.mentor_id,
            bio: row.bio,
            expertise: row.expertise,
            experience: row.experience,
            verification_status: row.verification_status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct EventRecord {
    pub event_id: Uuid,
    pub mentor_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub event_datetime: DateTime<Utc>,
    pub duration_minutes: i32,
    pub available_slots: i32,
    pub price_per_lead: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<EventRecord> for Event {
    fn from(row: EventRecord) -> Self {
        Event {
            event_id: row.event_id,
            mentor_id: row.mentor_id,
            title: row.title,
            description: row.description,
            category: row.category,
            event_datetime: row.event_datetime,
            duration_minutes: row.duration_minutes,
            available_slots: row.available_slots,
            price_per_lead: row.price_per_lead,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct LeadRecord {
    pub lead_id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
    pub status: String,
    pub price_per_lead: Decimal,
    pub purchased_by: Option<Uuid>,
    pub payment_id: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<LeadRecord> for Lead {
    type Error = AppError;

    fn try_from(row: LeadRecord) -> Result<Self, Self::Error> {
        Ok(Lead {
            lead_id: row.lead_id,
            event_id: row.event_id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            message: row.message,
            status: row.status.parse()?,
            price_per_lead: row.price_per_lead,
            purchased_by: row.purchased_by,
            payment_id: row.payment_id,
            verified_at: row.verified_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct PaymentRecord {
    pub payment_id: Uuid,
    pub kind: String,
    pub payer_id: Uuid,
    pub lead_id: Uuid,
    pub invitation_id: Option<Uuid>,
    pub amount: Decimal,
    pub demo_payment_code: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl TryFrom<PaymentRecord> for Payment {
    type Error = AppError;

    fn try_from(row: PaymentRecord) -> Result<Self, Self::Error> {
        Ok(Payment {
            payment_id: row.payment_id,
            kind: row.kind.parse()?,
            payer_id: row.payer_id,
            lead_id: row.lead_id,
            invitation_id: row.invitation_id,
            amount: row.amount,
            demo_payment_code: row.demo_payment_code,
            verified: row.verified,
            created_at: row.created_at,
            verified_at: row.verified_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct InvitationRecord {
    pub invitation_id: Uuid,
    pub lead_id: Uuid,
    pub event_id: Uuid,
    pub mentor_id: Uuid,
    pub guest_user_id: Uuid,
    pub ticket_price: Decimal,
    pub status: String,
    pub invited_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl TryFrom<InvitationRecord> for Invitation {
    type Error = AppError;

    fn try_from(row: InvitationRecord) -> Result<Self, Self::Error> {
        Ok(Invitation {
            invitation_id: row.invitation_id,
            lead_id: row.lead_id,
            event_id: row.event_id,
            mentor_id: row.mentor_id,
            guest_user_id: row.guest_user_id,
            ticket_price: row.ticket_price,
            status: row.status.parse()?,
            invited_at: row.invited_at,
            paid_at: row.paid_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TicketRecord {
    pub ticket_id: Uuid,
    pub invitation_id: Uuid,
    pub lead_id: Uuid,
    pub event_id: Uuid,
    pub guest_user_id: Uuid,
    pub ticket_price: Decimal,
    pub issued_at: DateTime<Utc>,
}

impl From<TicketRecord> for Ticket {
    fn from(row: TicketRecord) -> Self {
        Ticket {
            ticket_id: row.ticket_id,
            invitation_id: row.invitation_id,
            lead_id: row.lead_id,
            event_id: row.event_id,
            guest_user_id: row.guest_user_id,
            ticket_price: row.ticket_price,
            issued_at: row.issued_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct VerificationLogRecord {
    pub log_id: Uuid,
    pub lead_id: Uuid,
    pub verified_by: Uuid,
    pub status: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<VerificationLogRecord> for LeadVerificationLog {
    type Error = AppError;

    fn try_from(row: VerificationLogRecord) -> Result<Self, Self::Error> {
        Ok(LeadVerificationLog {
            log_id: row.log_id,
            lead_id: row.lead_id,
            verified_by: row.verified_by,
            status: row.status.parse()?,
            reason: row.reason,
            created_at: row.created_at,
        })
    }
}

/// Convert a batch of rows, failing on the first malformed one.
pub fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, AppError>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter().map(T::try_from).collect()
}
