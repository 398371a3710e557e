use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use leadbridge_auth::CurrentUser;
use leadbridge_common::AppError;

use crate::models::{
    InvitationView, LeadWithEvent, PaymentIntent, TicketIssuedResponse, TicketView,
    VerifyPaymentRequest,
};
use crate::services::{AppState, InvitationService, LeadService};

pub async fn list_bookings(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<LeadWithEvent>>, AppError> {
    let bookings = LeadService::new(&state)
        .list_user_bookings(&user.actor())
        .await?;
    Ok(Json(bookings))
}

pub async fn list_invitations(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<InvitationView>>, AppError> {
    let invitations = InvitationService::new(&state)
        .list_guest_invitations(&user.actor())
        .await?;
    Ok(Json(invitations))
}

pub async fn list_tickets(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<TicketView>>, AppError> {
    let tickets = InvitationService::new(&state)
        .list_guest_tickets(&user.actor())
        .await?;
    Ok(Json(tickets))
}

pub async fn pay_for_ticket(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(invitation_id): Path<Uuid>,
) -> Result<Json<PaymentIntent>, AppError> {
    let intent = InvitationService::new(&state)
        .pay_for_ticket(&user.actor(), invitation_id)
        .await?;
    Ok(Json(intent))
}

pub async fn verify_ticket_payment(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<TicketIssuedResponse>, AppError> {
    let ticket = InvitationService::new(&state)
        .verify_ticket_payment(&user.actor(), request.payment_id, &request.demo_payment_code)
        .await?;

    Ok(Json(TicketIssuedResponse {
        ticket_id: ticket.ticket_id,
        message: "Ticket issued".to_string(),
        ticket,
    }))
}
