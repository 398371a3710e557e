use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{self, admin, events, mentor, user};
use crate::services::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Public catalogue and booking
        .route("/api/events", get(events::list_events))
        .route("/api/events/:event_id", get(events::get_event))
        .route("/api/events/:event_id/book", post(events::book_event))
        .route("/api/bookings", post(events::create_booking))

        // Mentor profile and events
        .route("/api/mentor/profile", get(mentor::get_profile).put(mentor::update_profile))
        .route("/api/mentor/events", get(mentor::list_events).post(mentor::create_event))
        .route(
            "/api/mentor/events/:event_id",
            put(mentor::update_event).delete(mentor::delete_event),
        )

        // Mentor lead lifecycle
        .route("/api/mentor/leads", get(mentor::list_leads))
        .route("/api/mentor/leads/projected-revenue", get(mentor::projected_revenue))
        .route("/api/mentor/leads/:lead_id/purchase", post(mentor::purchase_lead))
        .route("/api/mentor/payment-verify", post(mentor::verify_payment))
        .route("/api/mentor/leads/:lead_id/invite", post(mentor::invite_guest))
        .route("/api/mentor/leads/:lead_id/pass", post(mentor::pass_guest))
        .route("/api/mentor/invitations", get(mentor::list_invitations))

        // User projections and ticket payment
        .route("/api/user/bookings", get(user::list_bookings))
        .route("/api/user/invitations", get(user::list_invitations))
        .route("/api/user/invitations/:invitation_id/pay", post(user::pay_for_ticket))
        .route("/api/user/ticket-payment-verify", post(user::verify_ticket_payment))
        .route("/api/user/tickets", get(user::list_tickets))

        // Admin verification gate
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/mentors", get(admin::list_mentors))
        .route("/api/admin/mentors/pending", get(admin::list_pending_mentors))
        .route("/api/admin/mentors/:mentor_id/verify", put(admin::verify_mentor))
        .route("/api/admin/leads", get(admin::list_leads))
        .route("/api/admin/leads/:lead_id/verify", put(admin::verify_lead))
        .route("/api/admin/leads/:lead_id/logs", get(admin::lead_logs))
        .route("/api/admin/analytics", get(admin::analytics))
}
