use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;

use leadbridge_auth::CurrentUser;
use leadbridge_common::AppError;

use crate::models::{
    BookingRequest, BookingResponse, CreateBookingRequest, EventDetail, EventListing,
};
use crate::services::{AppState, EventService};

// Public catalogue
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventListing>>, AppError> {
    let events = EventService::new(&state).list_events().await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<EventDetail>, AppError> {
    let event = EventService::new(&state).get_event(event_id).await?;
    Ok(Json(event))
}

// Booking
pub async fn book_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    book(&state, &user, event_id, request).await
}

pub async fn create_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    book(&state, &user, request.event_id, request.booking).await
}

async fn book(
    state: &AppState,
    user: &CurrentUser,
    event_id: Uuid,
    request: BookingRequest,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let lead = EventService::new(state)
        .book_event(&user.actor(), event_id, request)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            lead_id: lead.lead_id,
            status: lead.status,
            message: "Booking successful".to_string(),
        }),
    ))
}
