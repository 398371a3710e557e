use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{
    InvitationStatus, LeadStatus, MentorVerificationStatus, PaymentKind, Role,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Profile of a MENTOR user. `mentor_id` is the owning user's id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MentorProfile {
    pub mentor_id: Uuid,
    pub bio: Option<String>,
    pub expertise: Vec<String>,
    pub experience: Option<String>,
    pub verification_status: MentorVerificationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MentorProfile {
    pub fn new(mentor_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            mentor_id,
            bio: None,
            expertise: Vec::new(),
            experience: None,
            verification_status: MentorVerificationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
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

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    pub lead_id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
    pub status: LeadStatus,
    pub price_per_lead: Decimal,
    pub purchased_by: Option<Uuid>,
    pub payment_id: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A demo-code payment intent. `verified` flips once and never back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub payment_id: Uuid,
    pub kind: PaymentKind,
    pub payer_id: Uuid,
    pub lead_id: Uuid,
    pub invitation_id: Option<Uuid>,
    pub amount: Decimal,
    pub demo_payment_code: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invitation {
    pub invitation_id: Uuid,
    pub lead_id: Uuid,
    pub event_id: Uuid,
    pub mentor_id: Uuid,
    pub guest_user_id: Uuid,
    pub ticket_price: Decimal,
    pub status: InvitationStatus,
    pub invited_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    pub ticket_id: Uuid,
    pub invitation_id: Uuid,
    pub lead_id: Uuid,
    pub event_id: Uuid,
    pub guest_user_id: Uuid,
    pub ticket_price: Decimal,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadVerificationLog {
    pub log_id: Uuid,
    pub lead_id: Uuid,
    pub verified_by: Uuid,
    pub status: LeadStatus,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
