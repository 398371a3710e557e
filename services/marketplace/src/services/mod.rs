//! Domain services for the lead lifecycle.
//!
//! Each service borrows what it needs from [`AppState`] and checks roles,
//! ownership and lifecycle guards before touching the store. Guard failures
//! never leave a partial write behind.

pub mod admin;
pub mod events;
pub mod invitations;
pub mod leads;
pub mod profiles;
pub mod purchases;
pub mod revenue;

pub use admin::AdminService;
pub use events::EventService;
pub use invitations::InvitationService;
pub use leads::LeadService;
pub use profiles::ProfileService;
pub use purchases::PurchaseService;
pub use revenue::RevenueService;

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::FromRef;
use uuid::Uuid;

use leadbridge_auth::JwtService;
use leadbridge_common::{Actor, AppError, Event, Lead, LeadStatus};

use crate::config::LifecycleConfig;
use crate::notifications::Notifier;
use crate::payment_codes::PaymentCodeGenerator;
use crate::store::MarketplaceStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MarketplaceStore>,
    pub jwt_service: JwtService,
    pub notifier: Arc<dyn Notifier>,
    pub payment_codes: Arc<dyn PaymentCodeGenerator>,
    pub lifecycle: LifecycleConfig,
}

impl FromRef<AppState> for JwtService {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_service.clone()
    }
}

pub(crate) async fn load_lead(store: &dyn MarketplaceStore, lead_id: Uuid) -> Result<Lead, AppError> {
    store
        .get_lead(lead_id)
        .await?
        .ok_or_else(|| AppError::not_found("Lead", lead_id))
}

pub(crate) async fn load_event(store: &dyn MarketplaceStore, event_id: Uuid) -> Result<Event, AppError> {
    store
        .get_event(event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event", event_id))
}

/// Loads the event and checks that `actor` is the mentor who owns it.
pub(crate) async fn owned_event(
    store: &dyn MarketplaceStore,
    actor: &Actor,
    event_id: Uuid,
) -> Result<Event, AppError> {
    let event = load_event(store, event_id).await?;
    if event.mentor_id != actor.user_id {
        return Err(AppError::NotAuthorized(
            "Event belongs to another mentor".to_string(),
        ));
    }
    Ok(event)
}

/// All events keyed by id, for the read projections.
pub(crate) async fn events_by_id(
    store: &dyn MarketplaceStore,
) -> Result<HashMap<Uuid, Event>, AppError> {
    Ok(store
        .list_events()
        .await?
        .into_iter()
        .map(|event| (event.event_id, event))
        .collect())
}

pub(crate) fn log_transition(lead_id: Uuid, from: LeadStatus, to: LeadStatus) {
    tracing::info!(%lead_id, from = %from, to = %to, "Lead status changed");
}
