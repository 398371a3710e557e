use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use leadbridge_common::{Actor, AppError, MentorProfile, Role};

use crate::models::UpdateMentorProfileRequest;
use crate::store::{MarketplaceStore, MentorProfilePatch};

use super::AppState;

pub struct ProfileService {
    store: Arc<dyn MarketplaceStore>,
}

impl ProfileService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }

    pub async fn get_mentor_profile(&self, actor: &Actor) -> Result<MentorProfile, AppError> {
        actor.require_role(Role::Mentor)?;
        self.load(actor.user_id).await
    }

    pub async fn update_mentor_profile(
        &self,
        actor: &Actor,
        request: UpdateMentorProfileRequest,
    ) -> Result<MentorProfile, AppError> {
        actor.require_role(Role::Mentor)?;

        let mut patch = MentorProfilePatch::from(request);
        if let Some(expertise) = patch.expertise.take() {
            patch.expertise = Some(
                expertise
                    .into_iter()
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty())
                    .collect(),
            );
        }
        if patch.is_empty() {
            return Err(AppError::Validation("No data to update".to_string()));
        }

        let profile = self
            .store
            .update_mentor_profile(actor.user_id, patch, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found("Mentor profile", actor.user_id))?;

        tracing::info!(mentor_id = %actor.user_id, "Mentor profile updated");
        Ok(profile)
    }

    async fn load(&self, mentor_id: Uuid) -> Result<MentorProfile, AppError> {
        self.store
            .get_mentor_profile(mentor_id)
            .await?
            .ok_or_else(|| AppError::not_found("Mentor profile", mentor_id))
    }
}
