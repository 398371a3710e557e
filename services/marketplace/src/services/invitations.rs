use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::instrument;
use uuid::Uuid;

use leadbridge_common::{
    Actor, AppError, Event, Invitation, InvitationStatus, LeadStatus, Payment, PaymentKind, Role,
    Ticket,
};

use crate::config::LifecycleConfig;
use crate::models::{InvitationView, PaymentIntent, TicketView};
use crate::notifications::{dispatch, Notification, NotificationKind, Notifier};
use crate::payment_codes::{codes_match, PaymentCodeGenerator};
use crate::store::{InvitationOutcome, MarketplaceStore, TicketOutcome};

use super::{events_by_id, load_lead, log_transition, owned_event, AppState};

/// Invitations from mentors to purchased leads and the tickets they turn into.
pub struct InvitationService {
    store: Arc<dyn MarketplaceStore>,
    notifier: Arc<dyn Notifier>,
    payment_codes: Arc<dyn PaymentCodeGenerator>,
    lifecycle: LifecycleConfig,
}

impl InvitationService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            notifier: state.notifier.clone(),
            payment_codes: state.payment_codes.clone(),
            lifecycle: state.lifecycle.clone(),
        }
    }

    /// PURCHASED -> INVITED, creating a pending invitation for the lead's owner.
    #[instrument(skip(self), fields(mentor_id = %actor.user_id))]
    pub async fn invite_guest(
        &self,
        actor: &Actor,
        lead_id: Uuid,
        ticket_price: Decimal,
    ) -> Result<Invitation, AppError> {
        if ticket_price <= Decimal::ZERO {
            return Err(AppError::Validation(
                "ticket_price must be greater than zero".to_string(),
            ));
        }
        let lead = load_lead(self.store.as_ref(), lead_id).await?;
        actor.require_role(Role::Mentor)?;
        owned_event(self.store.as_ref(), actor, lead.event_id).await?;

        if self.store.active_invitation_for_lead(lead_id).await?.is_some() {
            return Err(AppError::DuplicateInvitation);
        }
        if lead.status != LeadStatus::Purchased {
            return Err(AppError::invalid_transition(lead.status, LeadStatus::Invited));
        }

        let invitation = Invitation {
            invitation_id: Uuid::new_v4(),
            lead_id,
            event_id: lead.event_id,
            mentor_id: actor.user_id,
            guest_user_id: lead.user_id,
            ticket_price,
            status: InvitationStatus::Pending,
            invited_at: Utc::now(),
            paid_at: None,
        };

        let invitation = match self.store.create_invitation(invitation).await? {
            InvitationOutcome::Created(invitation) => invitation,
            InvitationOutcome::ActiveInvitationExists => return Err(AppError::DuplicateInvitation),
            InvitationOutcome::LeadUnavailable(current) => {
                return Err(AppError::invalid_transition(current, LeadStatus::Invited))
            }
        };
        log_transition(lead_id, LeadStatus::Purchased, LeadStatus::Invited);

        dispatch(
            self.notifier.as_ref(),
            Notification::new(
                invitation.guest_user_id,
                NotificationKind::GuestInvited {
                    invitation_id: invitation.invitation_id,
                    ticket_price,
                },
            ),
        )
        .await;

        Ok(invitation)
    }

    /// Opens a ticket payment for the invited guest.
    #[instrument(skip(self), fields(user_id = %actor.user_id))]
    pub async fn pay_for_ticket(
        &self,
        actor: &Actor,
        invitation_id: Uuid,
    ) -> Result<PaymentIntent, AppError> {
        let invitation = self.load_invitation(invitation_id).await?;
        if invitation.guest_user_id != actor.user_id {
            return Err(AppError::NotAuthorized(
                "Invitation was sent to another user".to_string(),
            ));
        }
        if invitation.status != InvitationStatus::Pending {
            let lead = load_lead(self.store.as_ref(), invitation.lead_id).await?;
            return Err(AppError::invalid_transition(lead.status, LeadStatus::Confirmed));
        }

        let payment = Payment {
            payment_id: Uuid::new_v4(),
            kind: PaymentKind::Ticket,
            payer_id: actor.user_id,
            lead_id: invitation.lead_id,
            invitation_id: Some(invitation_id),
            amount: invitation.ticket_price,
            demo_payment_code: self.payment_codes.generate(),
            verified: false,
            created_at: Utc::now(),
            verified_at: None,
        };
        self.store.insert_payment(payment.clone()).await?;

        tracing::info!(payment_id = %payment.payment_id, %invitation_id, "Ticket payment initiated");
        Ok(PaymentIntent {
            payment_id: payment.payment_id,
            amount: payment.amount,
            currency: self.lifecycle.currency.clone(),
            demo_payment_code: payment.demo_payment_code,
        })
    }

    /// Confirms a ticket payment: invitation PAID, lead CONFIRMED, ticket issued.
    #[instrument(skip(self, submitted_code), fields(user_id = %actor.user_id))]
    pub async fn verify_ticket_payment(
        &self,
        actor: &Actor,
        payment_id: Uuid,
        submitted_code: &str,
    ) -> Result<Ticket, AppError> {
        let payment = self
            .store
            .get_payment(payment_id)
            .await?
            .filter(|p| p.kind == PaymentKind::Ticket)
            .ok_or_else(|| AppError::not_found("Payment", payment_id))?;
        if payment.payer_id != actor.user_id {
            return Err(AppError::NotAuthorized(
                "Payment was opened by another user".to_string(),
            ));
        }
        if payment.verified || !codes_match(&payment.demo_payment_code, submitted_code) {
            tracing::warn!(%payment_id, "Ticket payment rejected: invalid payment code");
            return Err(AppError::InvalidPaymentCode);
        }

        let invitation_id = payment.invitation_id.ok_or_else(|| {
            AppError::Internal(format!("Ticket payment {} has no invitation", payment_id))
        })?;
        let invitation = self.load_invitation(invitation_id).await?;

        let ticket = Ticket {
            ticket_id: Uuid::new_v4(),
            invitation_id,
            lead_id: invitation.lead_id,
            event_id: invitation.event_id,
            guest_user_id: invitation.guest_user_id,
            ticket_price: invitation.ticket_price,
            issued_at: Utc::now(),
        };

        let ticket = match self.store.issue_ticket(payment_id, ticket).await? {
            TicketOutcome::Issued(ticket) => ticket,
            TicketOutcome::PaymentAlreadyVerified => return Err(AppError::InvalidPaymentCode),
            TicketOutcome::InvitationUnavailable(_) => {
                let lead = load_lead(self.store.as_ref(), invitation.lead_id).await?;
                return Err(AppError::invalid_transition(lead.status, LeadStatus::Confirmed));
            }
            TicketOutcome::LeadUnavailable(current) => {
                return Err(AppError::invalid_transition(current, LeadStatus::Confirmed))
            }
        };
        log_transition(ticket.lead_id, LeadStatus::Invited, LeadStatus::Confirmed);

        dispatch(
            self.notifier.as_ref(),
            Notification::new(
                invitation.mentor_id,
                NotificationKind::TicketIssued {
                    ticket_id: ticket.ticket_id,
                    invitation_id,
                },
            ),
        )
        .await;

        Ok(ticket)
    }

    pub async fn list_guest_invitations(&self, actor: &Actor) -> Result<Vec<InvitationView>, AppError> {
        actor.require_role(Role::User)?;
        let invitations = self.store.list_invitations_by_guest(actor.user_id).await?;
        self.with_events(invitations).await
    }

    pub async fn list_mentor_invitations(&self, actor: &Actor) -> Result<Vec<InvitationView>, AppError> {
        actor.require_role(Role::Mentor)?;
        let invitations = self.store.list_invitations_by_mentor(actor.user_id).await?;
        self.with_events(invitations).await
    }

    pub async fn list_guest_tickets(&self, actor: &Actor) -> Result<Vec<TicketView>, AppError> {
        actor.require_role(Role::User)?;
        let events = events_by_id(self.store.as_ref()).await?;

        Ok(self
            .store
            .list_tickets_by_guest(actor.user_id)
            .await?
            .into_iter()
            .map(|ticket| {
                let event = events.get(&ticket.event_id);
                TicketView {
                    event_title: title_of(event),
                    event_datetime: event.map(|e| e.event_datetime),
                    ticket,
                }
            })
            .collect())
    }

    async fn load_invitation(&self, invitation_id: Uuid) -> Result<Invitation, AppError> {
        self.store
            .get_invitation(invitation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Invitation", invitation_id))
    }

    async fn with_events(&self, invitations: Vec<Invitation>) -> Result<Vec<InvitationView>, AppError> {
        let events: HashMap<Uuid, Event> = events_by_id(self.store.as_ref()).await?;
        Ok(invitations
            .into_iter()
            .map(|invitation| {
                let event = events.get(&invitation.event_id);
                InvitationView {
                    event_title: title_of(event),
                    event_datetime: event.map(|e| e.event_datetime),
                    invitation,
                }
            })
            .collect())
    }
}

fn title_of(event: Option<&Event>) -> String {
    event
        .map(|e| e.title.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}
