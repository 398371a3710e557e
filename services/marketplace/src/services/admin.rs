use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::instrument;
use uuid::Uuid;

use leadbridge_common::{
    Actor, AppError, Lead, LeadStatus, LeadVerificationLog, MentorProfile,
    MentorVerificationStatus, PaymentKind, Role, User,
};

use crate::models::{AdminAnalytics, LeadWithEvent, MentorSummary};
use crate::notifications::{dispatch, Notification, NotificationKind, Notifier};
use crate::store::{MarketplaceStore, TransitionOutcome};

use super::{events_by_id, load_lead, log_transition, AppState};

/// Admin-only reads and the verification gate for mentors and leads.
pub struct AdminService {
    store: Arc<dyn MarketplaceStore>,
    notifier: Arc<dyn Notifier>,
}

impl AdminService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            notifier: state.notifier.clone(),
        }
    }

    pub async fn list_users(&self, actor: &Actor) -> Result<Vec<User>, AppError> {
        actor.require_role(Role::Admin)?;
        self.store.list_users().await
    }

    pub async fn list_mentors(&self, actor: &Actor) -> Result<Vec<MentorSummary>, AppError> {
        actor.require_role(Role::Admin)?;
        let profiles = self.store.list_mentor_profiles(None).await?;
        self.summarize(profiles).await
    }

    pub async fn list_pending_mentors(&self, actor: &Actor) -> Result<Vec<MentorSummary>, AppError> {
        actor.require_role(Role::Admin)?;
        let profiles = self
            .store
            .list_mentor_profiles(Some(MentorVerificationStatus::Pending))
            .await?;
        self.summarize(profiles).await
    }

    #[instrument(skip(self), fields(admin_id = %actor.user_id))]
    pub async fn set_mentor_verification(
        &self,
        actor: &Actor,
        mentor_id: Uuid,
        status: MentorVerificationStatus,
    ) -> Result<MentorProfile, AppError> {
        actor.require_role(Role::Admin)?;
        if status == MentorVerificationStatus::Pending {
            return Err(AppError::Validation(
                "Mentor status must be APPROVED or REJECTED".to_string(),
            ));
        }

        let profile = self
            .store
            .set_mentor_verification(mentor_id, status, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found("Mentor", mentor_id))?;

        tracing::info!(%mentor_id, status = %status, "Mentor verification updated");
        dispatch(
            self.notifier.as_ref(),
            Notification::new(mentor_id, NotificationKind::MentorVerificationChanged { status }),
        )
        .await;

        Ok(profile)
    }

    pub async fn list_leads(&self, actor: &Actor) -> Result<Vec<LeadWithEvent>, AppError> {
        actor.require_role(Role::Admin)?;
        let events = events_by_id(self.store.as_ref()).await?;

        Ok(self
            .store
            .list_leads()
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

    /// PENDING -> VERIFIED | REJECTED, with an audit log entry.
    #[instrument(skip(self, reason), fields(admin_id = %actor.user_id))]
    pub async fn set_lead_verification(
        &self,
        actor: &Actor,
        lead_id: Uuid,
        status: LeadStatus,
        reason: Option<String>,
    ) -> Result<Lead, AppError> {
        actor.require_role(Role::Admin)?;
        if !matches!(status, LeadStatus::Verified | LeadStatus::Rejected) {
            return Err(AppError::Validation(
                "Lead status must be VERIFIED or REJECTED".to_string(),
            ));
        }

        let lead = load_lead(self.store.as_ref(), lead_id).await?;
        if !lead.status.can_transition_to(status) {
            return Err(AppError::invalid_transition(lead.status, status));
        }

        let now = Utc::now();
        let log = LeadVerificationLog {
            log_id: Uuid::new_v4(),
            lead_id,
            verified_by: actor.user_id,
            status,
            reason: reason.filter(|r| !r.trim().is_empty()),
            created_at: now,
        };

        let lead = match self.store.verify_lead(log, now).await? {
            TransitionOutcome::Applied(lead) => lead,
            TransitionOutcome::LeadNotFound => return Err(AppError::not_found("Lead", lead_id)),
            TransitionOutcome::StatusMismatch(current) => {
                return Err(AppError::invalid_transition(current, status))
            }
        };
        log_transition(lead_id, LeadStatus::Pending, status);

        Ok(lead)
    }

    pub async fn lead_verification_logs(
        &self,
        actor: &Actor,
        lead_id: Uuid,
    ) -> Result<Vec<LeadVerificationLog>, AppError> {
        actor.require_role(Role::Admin)?;
        load_lead(self.store.as_ref(), lead_id).await?;
        self.store.list_verification_logs(lead_id).await
    }

    pub async fn analytics(&self, actor: &Actor) -> Result<AdminAnalytics, AppError> {
        actor.require_role(Role::Admin)?;

        let mut purchased_leads = 0;
        for status in LeadStatus::ALL.into_iter().filter(|s| s.is_purchased()) {
            purchased_leads += self.store.count_leads_with_status(Some(status)).await?;
        }

        let payments = self.store.list_verified_payments().await?;
        let revenue_of = |kind: PaymentKind| -> Decimal {
            payments
                .iter()
                .filter(|p| p.kind == kind)
                .map(|p| p.amount)
                .sum()
        };

        Ok(AdminAnalytics {
            total_users: self.store.count_users_with_role(Role::User).await?,
            total_mentors: self.store.list_mentor_profiles(None).await?.len() as i64,
            total_events: self.store.list_events().await?.len() as i64,
            total_leads: self.store.count_leads_with_status(None).await?,
            verified_leads: self
                .store
                .count_leads_with_status(Some(LeadStatus::Verified))
                .await?,
            purchased_leads,
            total_revenue: revenue_of(PaymentKind::LeadPurchase),
            total_ticket_sales: revenue_of(PaymentKind::Ticket),
        })
    }

    async fn summarize(&self, profiles: Vec<MentorProfile>) -> Result<Vec<MentorSummary>, AppError> {
        let mut summaries = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let user = self.store.get_user(profile.mentor_id).await?;
            let (name, email) = user
                .map(|u| (u.name, u.email))
                .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string()));
            summaries.push(MentorSummary { profile, name, email });
        }
        Ok(summaries)
    }
}
