use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use leadbridge_common::{
    AppError, Event, Invitation, InvitationStatus, Lead, LeadStatus, LeadVerificationLog,
    MentorProfile, MentorVerificationStatus, Payment, PaymentKind, Role, Ticket, User,
};

use super::{
    BookingOutcome, EventPatch, InvitationOutcome, MarketplaceStore, MentorProfilePatch,
    PurchaseOutcome, TicketOutcome, TransitionOutcome,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    mentor_profiles: HashMap<Uuid, MentorProfile>,
    events: HashMap<Uuid, Event>,
    leads: HashMap<Uuid, Lead>,
    verification_logs: Vec<LeadVerificationLog>,
    payments: HashMap<Uuid, Payment>,
    invitations: HashMap<Uuid, Invitation>,
    tickets: HashMap<Uuid, Ticket>,
}

/// In-process store. Each compound operation holds the write lock for its
/// whole duration, which gives it the same all-or-nothing behaviour as a
/// database transaction.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(|item| key(item));
    items
}

#[async_trait]
impl MarketplaceStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(format!("Email {} already registered", user.email)));
        }
        tables.users.insert(user.user_id, user);
        Ok(())
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = self.tables.read().await.users.values().cloned().collect();
        Ok(sorted_by(users, |u: &User| (u.created_at, u.user_id)))
    }

    async fn count_users_with_role(&self, role: Role) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().filter(|u| u.role == role).count() as i64)
    }

    async fn insert_mentor_profile(&self, profile: MentorProfile) -> Result<(), AppError> {
        self.tables
            .write()
            .await
            .mentor_profiles
            .insert(profile.mentor_id, profile);
        Ok(())
    }

    async fn get_mentor_profile(&self, mentor_id: Uuid) -> Result<Option<MentorProfile>, AppError> {
        Ok(self.tables.read().await.mentor_profiles.get(&mentor_id).cloned())
    }

    async fn list_mentor_profiles(
        &self,
        status: Option<MentorVerificationStatus>,
    ) -> Result<Vec<MentorProfile>, AppError> {
        let tables = self.tables.read().await;
        let profiles = tables
            .mentor_profiles
            .values()
            .filter(|p| status.map_or(true, |s| p.verification_status == s))
            .cloned()
            .collect();
        Ok(sorted_by(profiles, |p: &MentorProfile| (p.created_at, p.mentor_id)))
    }

    async fn update_mentor_profile(
        &self,
        mentor_id: Uuid,
        patch: MentorProfilePatch,
        now: DateTime<Utc>,
    ) -> Result<Option<MentorProfile>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.mentor_profiles.get_mut(&mentor_id).map(|profile| {
            patch.apply(profile, now);
            profile.clone()
        }))
    }

    async fn set_mentor_verification(
        &self,
        mentor_id: Uuid,
        status: MentorVerificationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<MentorProfile>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.mentor_profiles.get_mut(&mentor_id).map(|profile| {
            profile.verification_status = status;
            profile.updated_at = now;
            profile.clone()
        }))
    }

    async fn insert_event(&self, event: Event) -> Result<(), AppError> {
        self.tables.write().await.events.insert(event.event_id, event);
        Ok(())
    }

    async fn get_event(&self, event_id: Uuid) -> Result<Option<Event>, AppError> {
        Ok(self.tables.read().await.events.get(&event_id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let events = self.tables.read().await.events.values().cloned().collect();
        Ok(sorted_by(events, |e: &Event| (e.event_datetime, e.event_id)))
    }

    async fn list_events_by_mentor(&self, mentor_id: Uuid) -> Result<Vec<Event>, AppError> {
        let tables = self.tables.read().await;
        let events = tables
            .events
            .values()
            .filter(|e| e.mentor_id == mentor_id)
            .cloned()
            .collect();
        Ok(sorted_by(events, |e: &Event| (e.event_datetime, e.event_id)))
    }

    async fn update_event(&self, event_id: Uuid, patch: EventPatch) -> Result<Option<Event>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.events.get_mut(&event_id).map(|event| {
            patch.apply(event);
            event.clone()
        }))
    }

    async fn delete_event_without_leads(&self, event_id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if tables.leads.values().any(|l| l.event_id == event_id) {
            return Ok(false);
        }
        Ok(tables.events.remove(&event_id).is_some())
    }

    async fn book_event(&self, lead: Lead) -> Result<BookingOutcome, AppError> {
        let mut tables = self.tables.write().await;
        let Some(event) = tables.events.get_mut(&lead.event_id) else {
            return Ok(BookingOutcome::EventNotFound);
        };
        if event.available_slots <= 0 {
            return Ok(BookingOutcome::NoSlotsAvailable);
        }
        event.available_slots -= 1;
        tables.leads.insert(lead.lead_id, lead.clone());
        Ok(BookingOutcome::Booked(lead))
    }

    async fn get_lead(&self, lead_id: Uuid) -> Result<Option<Lead>, AppError> {
        Ok(self.tables.read().await.leads.get(&lead_id).cloned())
    }

    async fn list_leads(&self) -> Result<Vec<Lead>, AppError> {
        let leads = self.tables.read().await.leads.values().cloned().collect();
        Ok(sorted_by(leads, |l: &Lead| (l.created_at, l.lead_id)))
    }

    async fn list_leads_by_user(&self, user_id: Uuid) -> Result<Vec<Lead>, AppError> {
        let tables = self.tables.read().await;
        let leads = tables
            .leads
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        Ok(sorted_by(leads, |l: &Lead| (l.created_at, l.lead_id)))
    }

    async fn list_leads_by_events(&self, event_ids: &[Uuid]) -> Result<Vec<Lead>, AppError> {
        let tables = self.tables.read().await;
        let leads = tables
            .leads
            .values()
            .filter(|l| event_ids.contains(&l.event_id))
            .cloned()
            .collect();
        Ok(sorted_by(leads, |l: &Lead| (l.created_at, l.lead_id)))
    }

    async fn count_leads_with_status(&self, status: Option<LeadStatus>) -> Result<i64, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .leads
            .values()
            .filter(|l| status.map_or(true, |s| l.status == s))
            .count() as i64)
    }

    async fn transition_lead(
        &self,
        lead_id: Uuid,
        from: LeadStatus,
        to: LeadStatus,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, AppError> {
        let mut tables = self.tables.write().await;
        let Some(lead) = tables.leads.get_mut(&lead_id) else {
            return Ok(TransitionOutcome::LeadNotFound);
        };
        if lead.status != from {
            return Ok(TransitionOutcome::StatusMismatch(lead.status));
        }
        lead.status = to;
        lead.updated_at = now;
        if to == LeadStatus::Verified {
            lead.verified_at = Some(now);
        }
        Ok(TransitionOutcome::Applied(lead.clone()))
    }

    async fn verify_lead(
        &self,
        log: LeadVerificationLog,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, AppError> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;

        // Same contract as the foreign key on lead_verification_logs.
        if !tables.users.contains_key(&log.verified_by) {
            return Err(AppError::not_found("User", log.verified_by));
        }
        let Some(lead) = tables.leads.get_mut(&log.lead_id) else {
            return Ok(TransitionOutcome::LeadNotFound);
        };
        if lead.status != LeadStatus::Pending {
            return Ok(TransitionOutcome::StatusMismatch(lead.status));
        }

        lead.status = log.status;
        lead.updated_at = now;
        if log.status == LeadStatus::Verified {
            lead.verified_at = Some(now);
        }
        let lead = lead.clone();
        tables.verification_logs.push(log);
        Ok(TransitionOutcome::Applied(lead))
    }

    async fn list_verification_logs(&self, lead_id: Uuid) -> Result<Vec<LeadVerificationLog>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .verification_logs
            .iter()
            .filter(|log| log.lead_id == lead_id)
            .cloned()
            .collect())
    }

    async fn insert_payment(&self, payment: Payment) -> Result<(), AppError> {
        self.tables.write().await.payments.insert(payment.payment_id, payment);
        Ok(())
    }

    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<Payment>, AppError> {
        Ok(self.tables.read().await.payments.get(&payment_id).cloned())
    }

    async fn list_verified_payments(&self) -> Result<Vec<Payment>, AppError> {
        let tables = self.tables.read().await;
        let payments = tables.payments.values().filter(|p| p.verified).cloned().collect();
        Ok(sorted_by(payments, |p: &Payment| (p.created_at, p.payment_id)))
    }

    async fn complete_lead_purchase(
        &self,
        payment_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<PurchaseOutcome, AppError> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;

        let payment = tables
            .payments
            .get_mut(&payment_id)
            .filter(|p| p.kind == PaymentKind::LeadPurchase)
            .ok_or_else(|| AppError::not_found("Payment", payment_id))?;
        if payment.verified {
            return Ok(PurchaseOutcome::PaymentAlreadyVerified);
        }

        let lead = tables
            .leads
            .get_mut(&payment.lead_id)
            .ok_or_else(|| AppError::not_found("Lead", payment.lead_id))?;
        if lead.status != LeadStatus::Verified {
            return Ok(PurchaseOutcome::LeadUnavailable(lead.status));
        }

        payment.verified = true;
        payment.verified_at = Some(now);
        lead.status = LeadStatus::Purchased;
        lead.purchased_by = Some(payment.payer_id);
        lead.payment_id = Some(payment.payment_id);
        lead.updated_at = now;

        Ok(PurchaseOutcome::Completed(lead.clone()))
    }

    async fn create_invitation(&self, invitation: Invitation) -> Result<InvitationOutcome, AppError> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;

        if tables
            .invitations
            .values()
            .any(|i| i.lead_id == invitation.lead_id && i.status.is_active())
        {
            return Ok(InvitationOutcome::ActiveInvitationExists);
        }

        let lead = tables
            .leads
            .get_mut(&invitation.lead_id)
            .ok_or_else(|| AppError::not_found("Lead", invitation.lead_id))?;
        if lead.status != LeadStatus::Purchased {
            return Ok(InvitationOutcome::LeadUnavailable(lead.status));
        }

        lead.status = LeadStatus::Invited;
        lead.updated_at = invitation.invited_at;
        tables
            .invitations
            .insert(invitation.invitation_id, invitation.clone());

        Ok(InvitationOutcome::Created(invitation))
    }

    async fn get_invitation(&self, invitation_id: Uuid) -> Result<Option<Invitation>, AppError> {
        Ok(self.tables.read().await.invitations.get(&invitation_id).cloned())
    }

    async fn active_invitation_for_lead(&self, lead_id: Uuid) -> Result<Option<Invitation>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .invitations
            .values()
            .find(|i| i.lead_id == lead_id && i.status.is_active())
            .cloned())
    }

    async fn list_invitations_by_guest(&self, guest_user_id: Uuid) -> Result<Vec<Invitation>, AppError> {
        let tables = self.tables.read().await;
        let invitations = tables
            .invitations
            .values()
            .filter(|i| i.guest_user_id == guest_user_id)
            .cloned()
            .collect();
        Ok(sorted_by(invitations, |i: &Invitation| (i.invited_at, i.invitation_id)))
    }

    async fn list_invitations_by_mentor(&self, mentor_id: Uuid) -> Result<Vec<Invitation>, AppError> {
        let tables = self.tables.read().await;
        let invitations = tables
            .invitations
            .values()
            .filter(|i| i.mentor_id == mentor_id)
            .cloned()
            .collect();
        Ok(sorted_by(invitations, |i: &Invitation| (i.invited_at, i.invitation_id)))
    }

    async fn issue_ticket(&self, payment_id: Uuid, ticket: Ticket) -> Result<TicketOutcome, AppError> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;

        let payment = tables
            .payments
            .get_mut(&payment_id)
            .filter(|p| p.kind == PaymentKind::Ticket)
            .ok_or_else(|| AppError::not_found("Payment", payment_id))?;
        if payment.verified {
            return Ok(TicketOutcome::PaymentAlreadyVerified);
        }

        let invitation = tables
            .invitations
            .get_mut(&ticket.invitation_id)
            .ok_or_else(|| AppError::not_found("Invitation", ticket.invitation_id))?;
        if invitation.status != InvitationStatus::Pending {
            return Ok(TicketOutcome::InvitationUnavailable(invitation.status));
        }

        let lead = tables
            .leads
            .get_mut(&ticket.lead_id)
            .ok_or_else(|| AppError::not_found("Lead", ticket.lead_id))?;
        if lead.status != LeadStatus::Invited {
            return Ok(TicketOutcome::LeadUnavailable(lead.status));
        }

        let now = ticket.issued_at;
        payment.verified = true;
        payment.verified_at = Some(now);
        invitation.status = InvitationStatus::Paid;
        invitation.paid_at = Some(now);
        lead.status = LeadStatus::Confirmed;
        lead.updated_at = now;
        tables.tickets.insert(ticket.ticket_id, ticket.clone());

        Ok(TicketOutcome::Issued(ticket))
    }

    async fn list_tickets_by_guest(&self, guest_user_id: Uuid) -> Result<Vec<Ticket>, AppError> {
        let tables = self.tables.read().await;
        let tickets = tables
            .tickets
            .values()
            .filter(|t| t.guest_user_id == guest_user_id)
            .cloned()
            .collect();
        Ok(sorted_by(tickets, |t: &Ticket| (t.issued_at, t.ticket_id)))
    }

    async fn list_tickets_by_invitation(&self, invitation_id: Uuid) -> Result<Vec<Ticket>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tickets
            .values()
            .filter(|t| t.invitation_id == invitation_id)
            .cloned()
            .collect())
    }
}
