use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use leadbridge_auth::CurrentUser;
use leadbridge_common::{AppError, Lead, LeadVerificationLog, MentorProfile, User};

use crate::models::{
    AdminAnalytics, LeadVerificationRequest, LeadWithEvent, MentorSummary,
    MentorVerificationRequest,
};
use crate::services::{AdminService, AppState};

pub async fn list_users(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<User>>, AppError> {
    let users = AdminService::new(&state).list_users(&user.actor()).await?;
    Ok(Json(users))
}

pub async fn list_mentors(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<MentorSummary>>, AppError> {
    let mentors = AdminService::new(&state).list_mentors(&user.actor()).await?;
    Ok(Json(mentors))
}

pub async fn list_pending_mentors(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<MentorSummary>>, AppError> {
    let mentors = AdminService::new(&state)
        .list_pending_mentors(&user.actor())
        .await?;
    Ok(Json(mentors))
}

pub async fn verify_mentor(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(mentor_id): Path<Uuid>,
    Json(request): Json<MentorVerificationRequest>,
) -> Result<Json<MentorProfile>, AppError> {
    let profile = AdminService::new(&state)
        .set_mentor_verification(&user.actor(), mentor_id, request.status)
        .await?;
    Ok(Json(profile))
}

pub async fn list_leads(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<LeadWithEvent>>, AppError> {
    let leads = AdminService::new(&state).list_leads(&user.actor()).await?;
    Ok(Json(leads))
}

pub async fn verify_lead(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(lead_id): Path<Uuid>,
    Json(request): Json<LeadVerificationRequest>,
) -> Result<Json<Lead>, AppError> {
    let lead = AdminService::new(&state)
        .set_lead_verification(&user.actor(), lead_id, request.status, request.reason)
        .await?;
    Ok(Json(lead))
}

pub async fn lead_logs(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(lead_id): Path<Uuid>,
) -> Result<Json<Vec<LeadVerificationLog>>, AppError> {
    let logs = AdminService::new(&state)
        .lead_verification_logs(&user.actor(), lead_id)
        .await?;
    Ok(Json(logs))
}

pub async fn analytics(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<AdminAnalytics>, AppError> {
    let analytics = AdminService::new(&state).analytics(&user.actor()).await?;
    Ok(Json(analytics))
}
