use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use leadbridge_common::{AppError, MentorVerificationStatus};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationKind {
    BookingReceived { lead_id: Uuid, event_id: Uuid },
    LeadPassed { lead_id: Uuid, event_id: Uuid },
    GuestInvited { invitation_id: Uuid, ticket_price: Decimal },
    TicketIssued { ticket_id: Uuid, invitation_id: Uuid },
    MentorVerificationChanged { status: MentorVerificationStatus },
}

impl NotificationKind {
    pub fn name(&self) -> &'static str {
        match self {
            NotificationKind::BookingReceived { .. } => "booking_received",
            NotificationKind::LeadPassed { .. } => "lead_passed",
            NotificationKind::GuestInvited { .. } => "guest_invited",
            NotificationKind::TicketIssued { .. } => "ticket_issued",
            NotificationKind::MentorVerificationChanged { .. } => "mentor_verification_changed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub recipient_id: Uuid,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(recipient_id: Uuid, kind: NotificationKind) -> Self {
        Self { recipient_id, kind }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<(), AppError>;
}

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), AppError> {
        tracing::info!(
            recipient_id = %notification.recipient_id,
            notification = notification.kind.name(),
            details = ?notification.kind,
            "Notification dispatched"
        );
        Ok(())
    }
}

/// Delivery failures never fail the operation that triggered them.
pub async fn dispatch(notifier: &dyn Notifier, notification: Notification) {
    let name = notification.kind.name();
    let recipient_id = notification.recipient_id;
    if let Err(err) = notifier.notify(notification).await {
        tracing::warn!(%recipient_id, notification = name, error = %err, "Notification delivery failed");
    }
}
