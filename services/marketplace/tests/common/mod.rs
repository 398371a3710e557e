#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use leadbridge_auth::JwtService;
use leadbridge_common::{
    Actor, AppError, Event, JwtConfig, Lead, MentorProfile, MentorVerificationStatus, Role, User,
};
use leadbridge_marketplace::{
    config::LifecycleConfig,
    models::{BookingRequest, CreateEventRequest},
    notifications::{Notification, Notifier},
    payment_codes::FixedCodeGenerator,
    services::{EventService, PurchaseService},
    store::{MarketplaceStore, MemoryStore},
    AppState,
};

pub const DEMO_CODE: &str = "1234";

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn names(&self) -> Vec<&'static str> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.kind.name())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(notification);
        Ok(())
    }
}

pub struct Fixture {
    pub state: AppState,
    pub store: Arc<dyn MarketplaceStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub jwt: JwtService,
    pub admin: Actor,
    pub mentor: Actor,
    pub guest: Actor,
    pub event: Event,
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret".to_string(),
        expiration_hours: 1,
        issuer: "leadbridge".to_string(),
    }
}

/// Emails carry the id so fixtures can share a persistent database.
pub async fn add_user(store: &dyn MarketplaceStore, name: &str, role: Role) -> Actor {
    let user_id = Uuid::new_v4();
    store
        .insert_user(User {
            user_id,
            name: name.to_string(),
            email: format!("{}-{}@example.com", name.to_lowercase(), user_id.simple()),
            role,
            email_verified: true,
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    Actor::new(user_id, role)
}

pub async fn add_mentor(
    store: &dyn MarketplaceStore,
    name: &str,
    status: MentorVerificationStatus,
) -> Actor {
    let mentor = add_user(store, name, Role::Mentor).await;
    let mut profile = MentorProfile::new(mentor.user_id, Utc::now());
    profile.bio = Some(format!("{} hosts career workshops", name));
    profile.expertise = vec!["Careers".to_string(), "Interviews".to_string()];
    profile.verification_status = status;
    store.insert_mentor_profile(profile).await.unwrap();
    mentor
}

pub fn event_request(price: i64, slots: i32) -> CreateEventRequest {
    CreateEventRequest {
        title: "Resume Clinic".to_string(),
        description: "One hour of resume reviews".to_string(),
        category: "Career".to_string(),
        event_datetime: Utc::now() + Duration::days(7),
        duration_minutes: 60,
        available_slots: slots,
        price_per_lead: Decimal::from(price),
    }
}

pub fn booking(name: &str, phone: &str) -> BookingRequest {
    BookingRequest {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: phone.to_string(),
        message: Some("Happy to attend".to_string()),
    }
}

pub async fn fixture_with(lifecycle: LifecycleConfig) -> Fixture {
    fixture_on(Arc::new(MemoryStore::new()), lifecycle).await
}

pub async fn fixture_on(store: Arc<dyn MarketplaceStore>, lifecycle: LifecycleConfig) -> Fixture {
    let notifier = Arc::new(RecordingNotifier::default());
    let jwt = JwtService::new(&jwt_config());

    let state = AppState::new(
        store.clone(),
        jwt.clone(),
        notifier.clone(),
        Arc::new(FixedCodeGenerator::new(DEMO_CODE)),
        lifecycle,
    );

    let admin = add_user(store.as_ref(), "Admin", Role::Admin).await;
    let mentor = add_mentor(store.as_ref(), "Meera", MentorVerificationStatus::Approved).await;
    let guest = add_user(store.as_ref(), "Ravi", Role::User).await;

    let event = EventService::new(&state)
        .create_event(&mentor, event_request(2500, 10))
        .await
        .unwrap();

    Fixture {
        state,
        store,
        notifier,
        jwt,
        admin,
        mentor,
        guest,
        event,
    }
}

pub async fn fixture() -> Fixture {
    fixture_with(LifecycleConfig::default()).await
}

impl Fixture {
    /// Books the fixture event as `guest` with contact details that auto-verify.
    pub async fn verified_lead(&self) -> Lead {
        self.book_as(&self.guest, "9876543210").await
    }

    pub async fn book_as(&self, user: &Actor, phone: &str) -> Lead {
        EventService::new(&self.state)
            .book_event(user, self.event.event_id, booking("Ravi", phone))
            .await
            .unwrap()
    }

    pub async fn purchased_lead(&self) -> Lead {
        let lead = self.verified_lead().await;
        let purchases = PurchaseService::new(&self.state);
        let intent = purchases
            .initiate_purchase(&self.mentor, lead.lead_id)
            .await
            .unwrap();
        purchases
            .verify_purchase(&self.mentor, intent.payment_id, DEMO_CODE)
            .await
            .unwrap()
    }

    pub async fn lead(&self, lead_id: Uuid) -> Lead {
        self.store.get_lead(lead_id).await.unwrap().unwrap()
    }
}
