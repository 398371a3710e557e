use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use leadbridge_common::{
    Actor, AppError, Event, Lead, LeadStatus, MentorVerificationStatus, Role,
};

use crate::config::LifecycleConfig;
use crate::models::{BookingRequest, CreateEventRequest, EventDetail, EventListing, UpdateEventRequest};
use crate::notifications::{dispatch, Notification, NotificationKind, Notifier};
use crate::store::{BookingOutcome, EventPatch, MarketplaceStore};

use super::{load_event, owned_event, AppState};

pub struct EventService {
    store: Arc<dyn MarketplaceStore>,
    notifier: Arc<dyn Notifier>,
    lifecycle: LifecycleConfig,
}

impl EventService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            notifier: state.notifier.clone(),
            lifecycle: state.lifecycle.clone(),
        }
    }

    /// Public catalogue: only events hosted by approved mentors.
    pub async fn list_events(&self) -> Result<Vec<EventListing>, AppError> {
        let approved = self
            .store
            .list_mentor_profiles(Some(MentorVerificationStatus::Approved))
            .await?;

        let mut listings = Vec::new();
        for event in self.store.list_events().await? {
            if !approved.iter().any(|p| p.mentor_id == event.mentor_id) {
                continue;
            }
            let mentor_name = self
                .store
                .get_user(event.mentor_id)
                .await?
                .map(|u| u.name)
                .unwrap_or_else(|| "Unknown".to_string());
            listings.push(EventListing { event, mentor_name });
        }
        Ok(listings)
    }

    pub async fn get_event(&self, event_id: Uuid) -> Result<EventDetail, AppError> {
        let event = load_event(self.store.as_ref(), event_id).await?;
        let mentor = self.store.get_user(event.mentor_id).await?;
        let profile = self.store.get_mentor_profile(event.mentor_id).await?;

        Ok(EventDetail {
            mentor_name: mentor.map(|u| u.name),
            mentor_bio: profile.as_ref().and_then(|p| p.bio.clone()),
            mentor_expertise: profile.map(|p| p.expertise).unwrap_or_default(),
            event,
        })
    }

    pub async fn list_mentor_events(&self, actor: &Actor) -> Result<Vec<Event>, AppError> {
        actor.require_role(Role::Mentor)?;
        self.store.list_events_by_mentor(actor.user_id).await
    }

    #[instrument(skip(self, request), fields(mentor_id = %actor.user_id))]
    pub async fn create_event(
        &self,
        actor: &Actor,
        request: CreateEventRequest,
    ) -> Result<Event, AppError> {
        actor.require_role(Role::Mentor)?;
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        ensure_price(request.price_per_lead)?;

        let profile = self
            .store
            .get_mentor_profile(actor.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Mentor profile", actor.user_id))?;
        if profile.verification_status != MentorVerificationStatus::Approved {
            return Err(AppError::NotAuthorized("Mentor not verified".to_string()));
        }

        let event = Event {
            event_id: Uuid::new_v4(),
            mentor_id: actor.user_id,
            title: request.title.trim().to_string(),
            description: request.description,
            category: request.category,
            event_datetime: request.event_datetime,
            duration_minutes: request.duration_minutes,
            available_slots: request.available_slots,
            price_per_lead: request.price_per_lead,
            created_at: Utc::now(),
        };
        self.store.insert_event(event.clone()).await?;

        tracing::info!(event_id = %event.event_id, "Event created");
        Ok(event)
    }

    #[instrument(skip(self, request), fields(mentor_id = %actor.user_id))]
    pub async fn update_event(
        &self,
        actor: &Actor,
        event_id: Uuid,
        request: UpdateEventRequest,
    ) -> Result<Event, AppError> {
        actor.require_role(Role::Mentor)?;
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if let Some(price) = request.price_per_lead {
            ensure_price(price)?;
        }

        let patch = EventPatch::from(request);
        if patch.is_empty() {
            return Err(AppError::Validation("No data to update".to_string()));
        }

        owned_event(self.store.as_ref(), actor, event_id).await?;
        self.store
            .update_event(event_id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("Event", event_id))
    }

    #[instrument(skip(self), fields(mentor_id = %actor.user_id))]
    pub async fn delete_event(&self, actor: &Actor, event_id: Uuid) -> Result<(), AppError> {
        actor.require_role(Role::Mentor)?;
        owned_event(self.store.as_ref(), actor, event_id).await?;

        if !self.store.delete_event_without_leads(event_id).await? {
            return Err(AppError::Conflict(
                "Event has bookings and cannot be deleted".to_string(),
            ));
        }
        tracing::info!(%event_id, "Event deleted");
        Ok(())
    }

    /// Creates a lead for the calling user and takes one slot from the event.
    #[instrument(skip(self, request), fields(user_id = %actor.user_id))]
    pub async fn book_event(
        &self,
        actor: &Actor,
        event_id: Uuid,
        request: BookingRequest,
    ) -> Result<Lead, AppError> {
        actor.require_role(Role::User)?;
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let event = load_event(self.store.as_ref(), event_id).await?;
        let now = Utc::now();
        let status = initial_lead_status(&self.lifecycle, &request.email, &request.phone);

        let lead = Lead {
            lead_id: Uuid::new_v4(),
            event_id,
            user_id: actor.user_id,
            name: request.name,
            email: request.email,
            phone: request.phone,
            message: request.message.filter(|m| !m.trim().is_empty()),
            status,
            price_per_lead: event.price_per_lead,
            purchased_by: None,
            payment_id: None,
            verified_at: (status == LeadStatus::Verified).then_some(now),
            created_at: now,
            updated_at: now,
        };

        let lead = match self.store.book_event(lead).await? {
            BookingOutcome::Booked(lead) => lead,
            BookingOutcome::EventNotFound => return Err(AppError::not_found("Event", event_id)),
            BookingOutcome::NoSlotsAvailable => {
                return Err(AppError::Validation("No slots available".to_string()))
            }
        };

        tracing::info!(lead_id = %lead.lead_id, status = %lead.status, "Lead created");
        dispatch(
            self.notifier.as_ref(),
            Notification::new(
                actor.user_id,
                NotificationKind::BookingReceived {
                    lead_id: lead.lead_id,
                    event_id,
                },
            ),
        )
        .await;

        Ok(lead)
    }
}

fn ensure_price(price: Decimal) -> Result<(), AppError> {
    if price.is_sign_negative() {
        return Err(AppError::Validation(
            "price_per_lead must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// VERIFIED when auto-verification is on and both contact fields look real,
/// otherwise PENDING for an admin to review.
pub fn initial_lead_status(config: &LifecycleConfig, email: &str, phone: &str) -> LeadStatus {
    if config.lead_auto_verify && is_plausible_email(email) && is_plausible_phone(phone) {
        LeadStatus::Verified
    } else {
        LeadStatus::Pending
    }
}

pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    if !validator::validate_email(email) {
        return false;
    }
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
        }
        None => false,
    }
}

pub fn is_plausible_phone(phone: &str) -> bool {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, '+' | '-' | ' '))
        .collect();
    (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}
