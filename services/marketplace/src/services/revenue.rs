use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use leadbridge_common::{Actor, AppError, Event, Lead, LeadStatus, Role};

use crate::models::{EventRevenue, ProjectedRevenue};
use crate::store::MarketplaceStore;

use super::AppState;

pub struct RevenueService {
    store: Arc<dyn MarketplaceStore>,
}

impl RevenueService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    /// What the mentor would earn by buying every VERIFIED lead right now.
    pub async fn projected_revenue(&self, actor: &Actor) -> Result<ProjectedRevenue, AppError> {
        actor.require_role(Role::Mentor)?;

        let events = self.store.list_events_by_mentor(actor.user_id).await?;
        let event_ids: Vec<Uuid> = events.iter().map(|e| e.event_id).collect();
        let leads = self.store.list_leads_by_events(&event_ids).await?;

        Ok(project_revenue(&events, &leads))
    }
}

/// Groups VERIFIED leads by event, priced at the event's current
/// `price_per_lead`. Events without verified leads are left out.
pub fn project_revenue(events: &[Event], leads: &[Lead]) -> ProjectedRevenue {
    let per_event: Vec<EventRevenue> = events
        .iter()
        .filter_map(|event| {
            let lead_count = leads
                .iter()
                .filter(|l| l.event_id == event.event_id && l.status == LeadStatus::Verified)
                .count() as i64;
            (lead_count > 0).then(|| EventRevenue {
                event_id: event.event_id,
                event_title: event.title.clone(),
                lead_count,
                price_per_lead: event.price_per_lead,
                potential_revenue: event.price_per_lead * Decimal::from(lead_count),
            })
        })
        .collect();

    ProjectedRevenue {
        total_leads: per_event.iter().map(|e| e.lead_count).sum(),
        total_potential_revenue: per_event.iter().map(|e| e.potential_revenue).sum(),
        per_event,
    }
}
