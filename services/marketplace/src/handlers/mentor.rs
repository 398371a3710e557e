use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use leadbridge_auth::CurrentUser;
use leadbridge_common::{AppError, Event, Lead, MentorProfile};

use crate::models::{
    CreateEventRequest, EventCreatedResponse, InvitationCreatedResponse, InvitationView,
    InviteGuestRequest, MentorLeadView, MessageResponse, PaymentIntent, ProjectedRevenue,
    PurchaseVerifiedResponse, UpdateEventRequest, UpdateMentorProfileRequest,
    VerifyPaymentRequest,
};
use crate::services::{
    AppState, EventService, InvitationService, LeadService, ProfileService, PurchaseService,
    RevenueService,
};

// Profile
pub async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<MentorProfile>, AppError> {
    let profile = ProfileService::new(&state)
        .get_mentor_profile(&user.actor())
        .await?;
    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<UpdateMentorProfileRequest>,
) -> Result<Json<MentorProfile>, AppError> {
    let profile = ProfileService::new(&state)
        .update_mentor_profile(&user.actor(), request)
        .await?;
    Ok(Json(profile))
}

// Events
pub async fn list_events(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = EventService::new(&state)
        .list_mentor_events(&user.actor())
        .await?;
    Ok(Json(events))
}

pub async fn create_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventCreatedResponse>), AppError> {
    let event = EventService::new(&state)
        .create_event(&user.actor(), request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EventCreatedResponse {
            event_id: event.event_id,
            message: "Event created".to_string(),
        }),
    ))
}

pub async fn update_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Event>, AppError> {
    let event = EventService::new(&state)
        .update_event(&user.actor(), event_id, request)
        .await?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    EventService::new(&state)
        .delete_event(&user.actor(), event_id)
        .await?;
    Ok(Json(MessageResponse::new("Event deleted")))
}

// Leads
pub async fn list_leads(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<MentorLeadView>>, AppError> {
    let leads = LeadService::new(&state)
        .list_mentor_leads(&user.actor())
        .await?;
    Ok(Json(leads))
}

pub async fn projected_revenue(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ProjectedRevenue>, AppError> {
    let projection = RevenueService::new(&state)
        .projected_revenue(&user.actor())
        .await?;
    Ok(Json(projection))
}

pub async fn purchase_lead(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(lead_id): Path<Uuid>,
) -> Result<Json<PaymentIntent>, AppError> {
    let intent = PurchaseService::new(&state)
        .initiate_purchase(&user.actor(), lead_id)
        .await?;
    Ok(Json(intent))
}

pub async fn verify_payment(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<PurchaseVerifiedResponse>, AppError> {
    let lead = PurchaseService::new(&state)
        .verify_purchase(&user.actor(), request.payment_id, &request.demo_payment_code)
        .await?;

    Ok(Json(PurchaseVerifiedResponse {
        message: "Payment verified".to_string(),
        lead,
    }))
}

pub async fn invite_guest(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(lead_id): Path<Uuid>,
    Json(request): Json<InviteGuestRequest>,
) -> Result<(StatusCode, Json<InvitationCreatedResponse>), AppError> {
    let invitation = InvitationService::new(&state)
        .invite_guest(&user.actor(), lead_id, request.ticket_price)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(InvitationCreatedResponse {
            invitation_id: invitation.invitation_id,
            message: "Guest invited".to_string(),
            invitation,
        }),
    ))
}

pub async fn pass_guest(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(lead_id): Path<Uuid>,
) -> Result<Json<Lead>, AppError> {
    let lead = LeadService::new(&state)
        .pass_guest(&user.actor(), lead_id)
        .await?;
    Ok(Json(lead))
}

pub async fn list_invitations(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<InvitationView>>, AppError> {
    let invitations = InvitationService::new(&state)
        .list_mentor_invitations(&user.actor())
        .await?;
    Ok(Json(invitations))
}
