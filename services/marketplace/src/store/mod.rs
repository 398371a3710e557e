//! Persistence port for the lead lifecycle.
//!
//! Simple reads and inserts map one-to-one onto tables. Every operation that
//! moves a lead through its lifecycle is a single atomic compare-and-set in
//! the adapter, reported back as an outcome enum so the domain layer can turn
//! a lost race into a typed error without any partial write.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use leadbridge_common::{
    AppError, Event, Invitation, InvitationStatus, Lead, LeadStatus, LeadVerificationLog,
    MentorProfile, MentorVerificationStatus, Payment, Role, Ticket, User,
};

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    Booked(Lead),
    EventNotFound,
    NoSlotsAvailable,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    Applied(Lead),
    LeadNotFound,
    /// The lead was not in the expected state; carries the state it was in.
    StatusMismatch(LeadStatus),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Completed(Lead),
    PaymentAlreadyVerified,
    LeadUnavailable(LeadStatus),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvitationOutcome {
    Created(Invitation),
    ActiveInvitationExists,
    LeadUnavailable(LeadStatus),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TicketOutcome {
    Issued(Ticket),
    PaymentAlreadyVerified,
    InvitationUnavailable(InvitationStatus),
    LeadUnavailable(LeadStatus),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub event_datetime: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub available_slots: Option<i32>,
    pub price_per_lead: Option<rust_decimal::Decimal>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        *self == EventPatch::default()
    }

    pub fn apply(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(event_datetime) = self.event_datetime {
            event.event_datetime = event_datetime;
        }
        if let Some(duration_minutes) = self.duration_minutes {
            event.duration_minutes = duration_minutes;
        }
        if let Some(available_slots) = self.available_slots {
            event.available_slots = available_slots;
        }
        if let Some(price_per_lead) = self.price_per_lead {
            event.price_per_lead = price_per_lead;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MentorProfilePatch {
    pub bio: Option<String>,
    pub expertise: Option<Vec<String>>,
    pub experience: Option<String>,
}

impl MentorProfilePatch {
    pub fn is_empty(&self) -> bool {
        *self == MentorProfilePatch::default()
    }

    pub fn apply(self, profile: &mut MentorProfile, now: DateTime<Utc>) {
        if let Some(bio) = self.bio {
            profile.bio = Some(bio);
        }
        if let Some(expertise) = self.expertise {
            profile.expertise = expertise;
        }
        if let Some(experience) = self.experience {
            profile.experience = Some(experience);
        }
        profile.updated_at = now;
    }
}

#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    // Users and mentor profiles
    async fn insert_user(&self, user: User) -> Result<(), AppError>;
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, AppError>;
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn count_users_with_role(&self, role: Role) -> Result<i64, AppError>;

    async fn insert_mentor_profile(&self, profile: MentorProfile) -> Result<(), AppError>;
    async fn get_mentor_profile(&self, mentor_id: Uuid) -> Result<Option<MentorProfile>, AppError>;
    async fn list_mentor_profiles(
        &self,
        status: Option<MentorVerificationStatus>,
    ) -> Result<Vec<MentorProfile>, AppError>;
    async fn update_mentor_profile(
        &self,
        mentor_id: Uuid,
        patch: MentorProfilePatch,
        now: DateTime<Utc>,
    ) -> Result<Option<MentorProfile>, AppError>;
    async fn set_mentor_verification(
        &self,
        mentor_id: Uuid,
        status: MentorVerificationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<MentorProfile>, AppError>;

    // Events
    async fn insert_event(&self, event: Event) -> Result<(), AppError>;
    async fn get_event(&self, event_id: Uuid) -> Result<Option<Event>, AppError>;
    async fn list_events(&self) -> Result<Vec<Event>, AppError>;
    async fn list_events_by_mentor(&self, mentor_id: Uuid) -> Result<Vec<Event>, AppError>;
    async fn update_event(&self, event_id: Uuid, patch: EventPatch) -> Result<Option<Event>, AppError>;
    /// Deletes an event that has no leads. Returns false if it had any.
    async fn delete_event_without_leads(&self, event_id: Uuid) -> Result<bool, AppError>;

    // Leads
    /// Takes one slot from the event and inserts the lead, atomically.
    async fn book_event(&self, lead: Lead) -> Result<BookingOutcome, AppError>;
    async fn get_lead(&self, lead_id: Uuid) -> Result<Option<Lead>, AppError>;
    async fn list_leads(&self) -> Result<Vec<Lead>, AppError>;
    async fn list_leads_by_user(&self, user_id: Uuid) -> Result<Vec<Lead>, AppError>;
    async fn list_leads_by_events(&self, event_ids: &[Uuid]) -> Result<Vec<Lead>, AppError>;
    async fn count_leads_with_status(&self, status: Option<LeadStatus>) -> Result<i64, AppError>;
    async fn transition_lead(
        &self,
        lead_id: Uuid,
        from: LeadStatus,
        to: LeadStatus,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, AppError>;

    /// Moves a PENDING lead to `log.status` and appends `log`, atomically.
    /// The admin named in `verified_by` must exist.
    async fn verify_lead(
        &self,
        log: LeadVerificationLog,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, AppError>;
    async fn list_verification_logs(&self, lead_id: Uuid) -> Result<Vec<LeadVerificationLog>, AppError>;

    // Payments
    async fn insert_payment(&self, payment: Payment) -> Result<(), AppError>;
    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<Payment>, AppError>;
    async fn list_verified_payments(&self) -> Result<Vec<Payment>, AppError>;
    /// Marks the payment verified and moves its lead VERIFIED -> PURCHASED.
    async fn complete_lead_purchase(
        &self,
        payment_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<PurchaseOutcome, AppError>;

    // Invitations and tickets
    /// Inserts the invitation and moves its lead PURCHASED -> INVITED.
    async fn create_invitation(&self, invitation: Invitation) -> Result<InvitationOutcome, AppError>;
    async fn get_invitation(&self, invitation_id: Uuid) -> Result<Option<Invitation>, AppError>;
    async fn active_invitation_for_lead(&self, lead_id: Uuid) -> Result<Option<Invitation>, AppError>;
    async fn list_invitations_by_guest(&self, guest_user_id: Uuid) -> Result<Vec<Invitation>, AppError>;
    async fn list_invitations_by_mentor(&self, mentor_id: Uuid) -> Result<Vec<Invitation>, AppError>;
    /// Verifies the ticket payment, marks the invitation PAID, moves the lead
    /// INVITED -> CONFIRMED and inserts the ticket.
    async fn issue_ticket(
        &self,
        payment_id: Uuid,
        ticket: Ticket,
    ) -> Result<TicketOutcome, AppError>;
    async fn list_tickets_by_guest(&self, guest_user_id: Uuid) -> Result<Vec<Ticket>, AppError>;
    async fn list_tickets_by_invitation(&self, invitation_id: Uuid) -> Result<Vec<Ticket>, AppError>;
}
