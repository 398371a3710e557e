use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use leadbridge_common::{Actor, AppError, Lead, LeadStatus, Payment, PaymentKind, Role};

use crate::config::LifecycleConfig;
use crate::models::PaymentIntent;
use crate::payment_codes::{codes_match, PaymentCodeGenerator};
use crate::store::{MarketplaceStore, PurchaseOutcome};

use super::{load_lead, log_transition, owned_event, AppState};

/// Gates VERIFIED -> PURCHASED behind a demo payment confirmation.
pub struct PurchaseService {
    store: Arc<dyn MarketplaceStore>,
    payment_codes: Arc<dyn PaymentCodeGenerator>,
    lifecycle: LifecycleConfig,
}

impl PurchaseService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            payment_codes: state.payment_codes.clone(),
            lifecycle: state.lifecycle.clone(),
        }
    }

    /// Opens an unverified payment for the lead. Several may be open at
    /// once; only the first to be verified completes the purchase.
    #[instrument(skip(self), fields(mentor_id = %actor.user_id))]
    pub async fn initiate_purchase(
        &self,
        actor: &Actor,
        lead_id: Uuid,
    ) -> Result<PaymentIntent, AppError> {
        let lead = load_lead(self.store.as_ref(), lead_id).await?;
        actor.require_role(Role::Mentor)?;
        owned_event(self.store.as_ref(), actor, lead.event_id).await?;

        if lead.status.is_purchased() {
            return Err(AppError::LeadAlreadyPurchased);
        }
        if lead.status != LeadStatus::Verified {
            return Err(AppError::LeadNotVerified);
        }

        let payment = Payment {
            payment_id: Uuid::new_v4(),
            kind: PaymentKind::LeadPurchase,
            payer_id: actor.user_id,
            lead_id,
            invitation_id: None,
            amount: lead.price_per_lead,
            demo_payment_code: self.payment_codes.generate(),
            verified: false,
            created_at: Utc::now(),
            verified_at: None,
        };
        self.store.insert_payment(payment.clone()).await?;

        tracing::info!(payment_id = %payment.payment_id, %lead_id, amount = %payment.amount, "Lead purchase initiated");
        Ok(PaymentIntent {
            payment_id: payment.payment_id,
            amount: payment.amount,
            currency: self.lifecycle.currency.clone(),
            demo_payment_code: payment.demo_payment_code,
        })
    }

    #[instrument(skip(self, submitted_code), fields(mentor_id = %actor.user_id))]
    pub async fn verify_purchase(
        &self,
        actor: &Actor,
        payment_id: Uuid,
        submitted_code: &str,
    ) -> Result<Lead, AppError> {
        let payment = self
            .store
            .get_payment(payment_id)
            .await?
            .filter(|p| p.kind == PaymentKind::LeadPurchase)
            .ok_or_else(|| AppError::not_found("Payment", payment_id))?;
        actor.require_role(Role::Mentor)?;
        if payment.payer_id != actor.user_id {
            return Err(AppError::NotAuthorized(
                "Payment was opened by another mentor".to_string(),
            ));
        }

        if payment.verified || !codes_match(&payment.demo_payment_code, submitted_code) {
            tracing::warn!(%payment_id, "Lead purchase rejected: invalid payment code");
            return Err(AppError::InvalidPaymentCode);
        }

        match self
            .store
            .complete_lead_purchase(payment_id, Utc::now())
            .await?
        {
            PurchaseOutcome::Completed(lead) => {
                log_transition(lead.lead_id, LeadStatus::Verified, LeadStatus::Purchased);
                Ok(lead)
            }
            PurchaseOutcome::PaymentAlreadyVerified => Err(AppError::InvalidPaymentCode),
            PurchaseOutcome::LeadUnavailable(current) if current.is_purchased() => {
                Err(AppError::LeadAlreadyPurchased)
            }
            PurchaseOutcome::LeadUnavailable(_) => Err(AppError::LeadNotVerified),
        }
    }
}
