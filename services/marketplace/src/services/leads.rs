use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use leadbridge_common::{Actor, AppError, Lead, LeadStatus, Role};

use crate::models::{LeadWithEvent, MentorLeadView};
use crate::notifications::{dispatch, Notification, NotificationKind, Notifier};
use crate::store::{MarketplaceStore, TransitionOutcome};

use super::{events_by_id, load_lead, log_transition, owned_event, AppState};

pub struct LeadService {
    store: Arc<dyn MarketplaceStore>,
    notifier: Arc<dyn Notifier>,
}

impl LeadService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            notifier: state.notifier.clone(),
        }
    }

    /// PURCHASED -> PASSED. The mentor declines to invite the lead.
    #[instrument(skip(self), fields(mentor_id = %actor.user_id))]
    pub async fn pass_guest(&self, actor: &Actor, lead_id: Uuid) -> Result<Lead, AppError> {
        let lead = load_lead(self.store.as_ref(), lead_id).await?;
        actor.require_role(Role::Mentor)?;
        owned_event(self.store.as_ref(), actor, lead.event_id).await?;

        if !lead.status.can_transition_to(LeadStatus::Passed) {
            return Err(AppError::invalid_transition(lead.status, LeadStatus::Passed));
        }

        let lead = match self
            .store
            .transition_lead(lead_id, LeadStatus::Purchased, LeadStatus::Passed, Utc::now())
            .await?
        {
            TransitionOutcome::Applied(lead) => lead,
            TransitionOutcome::LeadNotFound => return Err(AppError::not_found("Lead", lead_id)),
            TransitionOutcome::StatusMismatch(current) => {
                return Err(AppError::invalid_transition(current, LeadStatus::Passed))
            }
        };
        log_transition(lead_id, LeadStatus::Purchased, LeadStatus::Passed);

        dispatch(
            self.notifier.as_ref(),
            Notification::new(
                lead.user_id,
                NotificationKind::LeadPassed {
                    lead_id,
                    event_id: lead.event_id,
                },
            ),
        )
        .await;

        Ok(lead)
    }

    /// Leads on the mentor's events that made it past verification.
    pub async fn list_mentor_leads(&self, actor: &Actor) -> Result<Vec<MentorLeadView>, AppError> {
        actor.require_role(Role::Mentor)?;

        let events = self.store.list_events_by_mentor(actor.user_id).await?;
        let event_ids: Vec<Uuid> = events.iter().map(|e| e.event_id).collect();
        let leads = self.store.list_leads_by_events(&event_ids).await?;

        Ok(leads
            .into_iter()
            .filter(|lead| !matches!(lead.status, LeadStatus::Pending | LeadStatus::Rejected))
            .map(|lead| {
                let title = events
                    .iter()
                    .find(|e| e.event_id == lead.event_id)
                    .map(|e| e.title.clone())
                    .unwrap_or_default();
                MentorLeadView::new(lead, title)
            })
            .collect())
    }

    /// The caller's own bookings, contact details included.
    pub async fn list_user_bookings(&self, actor: &Actor) -> Result<Vec<LeadWithEvent>, AppError> {
        actor.require_role(Role::User)?;

        let events = events_by_id(self.store.as_ref()).await?;
        Ok(self
            .store
            .list_leads_by_user(actor.user_id)
            .await?
            .into_iter()
            .map(|lead| LeadWithEvent {
                event_title: events
                    .get(&lead.event_id)
                    .map(|e| e.title.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                lead,
            })
            .collect())
    }
}
