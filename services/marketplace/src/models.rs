use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use leadbridge_common::{
    Event, Invitation, Lead, LeadStatus, MentorProfile, MentorVerificationStatus, Ticket,
};

use crate::store::{EventPatch, MentorProfilePatch};

// Request DTOs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    pub description: String,

    #[validate(length(min = 1, max = 100))]
    pub category: String,

    pub event_datetime: DateTime<Utc>,

    #[validate(range(min = 1))]
    pub duration_minutes: i32,

    #[validate(range(min = 0))]
    pub available_slots: i32,

    pub price_per_lead: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    pub event_datetime: Option<DateTime<Utc>>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
    #[validate(range(min = 0))]
    pub available_slots: Option<i32>,
    pub price_per_lead: Option<Decimal>,
}

impl From<UpdateEventRequest> for EventPatch {
    fn from(request: UpdateEventRequest) -> Self {
        EventPatch {
            title: request.title,
            description: request.description,
            category: request.category,
            event_datetime: request.event_datetime,
            duration_minutes: request.duration_minutes,
            available_slots: request.available_slots,
            price_per_lead: request.price_per_lead,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
}

/// Body of `POST /api/bookings`, which names the event in the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub event_id: Uuid,
    #[serde(flatten)]
    pub booking: BookingRequest,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMentorProfileRequest {
    pub bio: Option<String>,
    pub expertise: Option<Vec<String>>,
    pub experience: Option<String>,
}

impl From<UpdateMentorProfileRequest> for MentorProfilePatch {
    fn from(request: UpdateMentorProfileRequest) -> Self {
        MentorProfilePatch {
            bio: request.bio,
            expertise: request.expertise,
            experience: request.experience,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub payment_id: Uuid,
    pub demo_payment_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteGuestRequest {
    pub ticket_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadVerificationRequest {
    pub status: LeadStatus,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorVerificationRequest {
    pub status: MentorVerificationStatus,
}

// Response DTOs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub lead_id: Uuid,
    pub status: LeadStatus,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCreatedResponse {
    pub event_id: Uuid,
    pub message: String,
}

/// A payment intent awaiting its demo code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentIntent {
    pub payment_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub demo_payment_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseVerifiedResponse {
    pub message: String,
    pub lead: Lead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationCreatedResponse {
    pub invitation_id: Uuid,
    pub message: String,
    pub invitation: Invitation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketIssuedResponse {
    pub ticket_id: Uuid,
    pub message: String,
    pub ticket: Ticket,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventListing {
    #[serde(flatten)]
    pub event: Event,
    pub mentor_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub mentor_name: Option<String>,
    pub mentor_bio: Option<String>,
    pub mentor_expertise: Vec<String>,
}

/// A lead as its event's mentor sees it. Contact fields are only filled
/// in once the mentor has bought the lead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MentorLeadView {
    pub lead_id: Uuid,
    pub event_id: Uuid,
    pub event_title: String,
    pub user_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: LeadStatus,
    pub price_per_lead: Decimal,
    pub created_at: DateTime<Utc>,
}

impl MentorLeadView {
    pub fn new(lead: Lead, event_title: String) -> Self {
        let reveal = lead.status.reveals_contact();
        Self {
            lead_id: lead.lead_id,
            event_id: lead.event_id,
            event_title,
            user_id: lead.user_id,
            name: lead.name,
            email: reveal.then_some(lead.email),
            phone: reveal.then_some(lead.phone),
            message: if reveal { lead.message } else { None },
            status: lead.status,
            price_per_lead: lead.price_per_lead,
            created_at: lead.created_at,
        }
    }
}

/// A lead with its event title, used for the owner's and the admin's views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadWithEvent {
    #[serde(flatten)]
    pub lead: Lead,
    pub event_title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvitationView {
    #[serde(flatten)]
    pub invitation: Invitation,
    pub event_title: String,
    pub event_datetime: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketView {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub event_title: String,
    pub event_datetime: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventRevenue {
    pub event_id: Uuid,
    pub event_title: String,
    pub lead_count: i64,
    pub price_per_lead: Decimal,
    pub potential_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectedRevenue {
    pub per_event: Vec<EventRevenue>,
    pub total_leads: i64,
    pub total_potential_revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MentorSummary {
    #[serde(flatten)]
    pub profile: MentorProfile,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminAnalytics {
    pub total_users: i64,
    pub total_mentors: i64,
    pub total_events: i64,
    pub total_leads: i64,
    pub verified_leads: i64,
    pub purchased_leads: i64,
    pub total_revenue: Decimal,
    pub total_ticket_sales: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
