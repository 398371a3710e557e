mod common;

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use leadbridge_common::{
    Actor, AppError, DatabaseConfig, InvitationStatus, LeadStatus, Role,
};
use leadbridge_database::{create_pool, MigrationRunner};
use leadbridge_marketplace::{
    config::LifecycleConfig,
    services::{AdminService, InvitationService, LeadService, PurchaseService},
    store::{MarketplaceStore, PgStore},
};

use common::{fixture_on, Fixture, DEMO_CODE};

/// Connects to the test database, or returns None when no database is configured.
async fn pg_store() -> Option<Arc<dyn MarketplaceStore>> {
    // Skip test if no database is available
    if std::env::var("DATABASE_URL").is_err() {
        println!("Skipping database test - DATABASE_URL not set");
        return None;
    }

    let config = DatabaseConfig {
        database: "leadbridge_test".to_string(),
        ..DatabaseConfig::from_env()
    };
    let pool = create_pool(&config).await.expect("Failed to connect to test database");
    MigrationRunner::new(pool.clone())
        .run_all_migrations()
        .await
        .expect("Failed to run migrations");

    Some(Arc::new(PgStore::new(pool)))
}

async fn pg_fixture_with(lifecycle: LifecycleConfig) -> Option<Fixture> {
    let store = pg_store().await?;
    Some(fixture_on(store, lifecycle).await)
}

async fn pg_fixture() -> Option<Fixture> {
    pg_fixture_with(LifecycleConfig::default()).await
}

#[tokio::test]
async fn pg_wrong_code_then_right_code_purchases_the_lead() {
    let Some(fx) = pg_fixture().await else {
        return;
    };
    let lead = fx.verified_lead().await;
    assert_eq!(lead.status, LeadStatus::Verified);

    let purchases = PurchaseService::new(&fx.state);
    let intent = purchases
        .initiate_purchase(&fx.mentor, lead.lead_id)
        .await
        .unwrap();

    let err = purchases
        .verify_purchase(&fx.mentor, intent.payment_id, "9999")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidPaymentCode));
    assert_eq!(fx.lead(lead.lead_id).await.status, LeadStatus::Verified);

    let purchased = purchases
        .verify_purchase(&fx.mentor, intent.payment_id, DEMO_CODE)
        .await
        .unwrap();
    assert_eq!(purchased.status, LeadStatus::Purchased);
    assert_eq!(purchased.purchased_by, Some(fx.mentor.user_id));
    assert_eq!(purchased.payment_id, Some(intent.payment_id));

    let payment = fx.store.get_payment(intent.payment_id).await.unwrap().unwrap();
    assert!(payment.verified);
    assert_eq!(payment.amount, Decimal::from(2500));
}

#[tokio::test]
async fn pg_second_invitation_for_the_same_lead_is_rejected() {
    let Some(fx) = pg_fixture().await else {
        return;
    };
    let lead = fx.purchased_lead().await;
    let invitations = InvitationService::new(&fx.state);

    let invitation = invitations
        .invite_guest(&fx.mentor, lead.lead_id, Decimal::from(3000))
        .await
        .unwrap();
    assert_eq!(invitation.status, InvitationStatus::Pending);
    assert_eq!(fx.lead(lead.lead_id).await.status, LeadStatus::Invited);

    let err = invitations
        .invite_guest(&fx.mentor, lead.lead_id, Decimal::from(3500))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateInvitation));
}

#[tokio::test]
async fn pg_paying_the_invitation_confirms_the_lead() {
    let Some(fx) = pg_fixture().await else {
        return;
    };
    let lead = fx.purchased_lead().await;
    let invitations = InvitationService::new(&fx.state);
    let invitation = invitations
        .invite_guest(&fx.mentor, lead.lead_id, Decimal::from(3000))
        .await
        .unwrap();
    let intent = invitations
        .pay_for_ticket(&fx.guest, invitation.invitation_id)
        .await
        .unwrap();

    let ticket = invitations
        .verify_ticket_payment(&fx.guest, intent.payment_id, DEMO_CODE)
        .await
        .unwrap();
    assert_eq!(ticket.ticket_price, Decimal::from(3000));

    let stored = fx
        .store
        .get_invitation(invitation.invitation_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, InvitationStatus::Paid);
    assert!(stored.paid_at.is_some());
    assert_eq!(fx.lead(lead.lead_id).await.status, LeadStatus::Confirmed);
    assert_eq!(
        fx.store
            .list_tickets_by_invitation(invitation.invitation_id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn pg_passed_lead_cannot_be_invited() {
    let Some(fx) = pg_fixture().await else {
        return;
    };
    let lead = fx.purchased_lead().await;

    let passed = LeadService::new(&fx.state)
        .pass_guest(&fx.mentor, lead.lead_id)
        .await
        .unwrap();
    assert_eq!(passed.status, LeadStatus::Passed);

    let err = InvitationService::new(&fx.state)
        .invite_guest(&fx.mentor, lead.lead_id, Decimal::from(3000))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidLeadTransition {
            from: LeadStatus::Passed,
            to: LeadStatus::Invited
        }
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pg_concurrent_purchase_verifications_have_one_winner() {
    let Some(fx) = pg_fixture().await else {
        return;
    };
    let lead = fx.verified_lead().await;
    let purchases = Arc::new(PurchaseService::new(&fx.state));

    let mut payment_ids = Vec::new();
    for _ in 0..8 {
        let intent = purchases
            .initiate_purchase(&fx.mentor, lead.lead_id)
            .await
            .unwrap();
        payment_ids.push(intent.payment_id);
    }

    let attempts = payment_ids.iter().copied().map(|payment_id| {
        let purchases = purchases.clone();
        let mentor = fx.mentor;
        tokio::spawn(async move {
            purchases
                .verify_purchase(&mentor, payment_id, DEMO_CODE)
                .await
        })
    });
    let results: Vec<_> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            result,
            Err(AppError::LeadAlreadyPurchased) | Err(AppError::InvalidPaymentCode)
        ));
    }

    // The database is shared between runs, so count only this lead's payments.
    let mut verified = 0;
    for payment_id in payment_ids {
        if fx.store.get_payment(payment_id).await.unwrap().unwrap().verified {
            verified += 1;
        }
    }
    assert_eq!(verified, 1);
    assert_eq!(fx.lead(lead.lead_id).await.status, LeadStatus::Purchased);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pg_concurrent_invitations_create_one() {
    let Some(fx) = pg_fixture().await else {
        return;
    };
    let lead = fx.purchased_lead().await;
    let invitations = Arc::new(InvitationService::new(&fx.state));

    let attempts = (0..6).map(|i| {
        let invitations = invitations.clone();
        let mentor = fx.mentor;
        let lead_id = lead.lead_id;
        tokio::spawn(async move {
            invitations
                .invite_guest(&mentor, lead_id, Decimal::from(3000 + i))
                .await
        })
    });
    let results: Vec<_> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            result,
            Err(AppError::DuplicateInvitation) | Err(AppError::InvalidLeadTransition { .. })
        ));
    }
    let stored = fx
        .store
        .list_invitations_by_mentor(fx.mentor.user_id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(fx.lead(lead.lead_id).await.status, LeadStatus::Invited);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn pg_concurrent_ticket_verifications_issue_one_ticket() {
    let Some(fx) = pg_fixture().await else {
        return;
    };
    let lead = fx.purchased_lead().await;
    let invitations = Arc::new(InvitationService::new(&fx.state));
    let invitation = invitations
        .invite_guest(&fx.mentor, lead.lead_id, Decimal::from(3000))
        .await
        .unwrap();

    let mut payment_ids = Vec::new();
    for _ in 0..6 {
        let intent = invitations
            .pay_for_ticket(&fx.guest, invitation.invitation_id)
            .await
            .unwrap();
        payment_ids.push(intent.payment_id);
    }

    let attempts = payment_ids.into_iter().map(|payment_id| {
        let invitations = invitations.clone();
        let guest = fx.guest;
        tokio::spawn(async move {
            invitations
                .verify_ticket_payment(&guest, payment_id, DEMO_CODE)
                .await
        })
    });
    let results: Vec<_> = futures::future::join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            result,
            Err(AppError::InvalidPaymentCode) | Err(AppError::InvalidLeadTransition { .. })
        ));
    }
    assert_eq!(
        fx.store
            .list_tickets_by_invitation(invitation.invitation_id)
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(fx.lead(lead.lead_id).await.status, LeadStatus::Confirmed);
}

#[tokio::test]
async fn pg_lead_verification_by_unknown_admin_rolls_back() {
    let Some(fx) = pg_fixture_with(LifecycleConfig {
        lead_auto_verify: false,
        ..LifecycleConfig::default()
    })
    .await
    else {
        return;
    };
    let lead = fx.verified_lead().await;
    assert_eq!(lead.status, LeadStatus::Pending);

    // The log insert fails on the users foreign key after the status update.
    let ghost = Actor::new(Uuid::new_v4(), Role::Admin);
    let err = AdminService::new(&fx.state)
        .set_lead_verification(&ghost, lead.lead_id, LeadStatus::Rejected, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let stored = fx.lead(lead.lead_id).await;
    assert_eq!(stored.status, LeadStatus::Pending);
    assert!(fx
        .store
        .list_verification_logs(lead.lead_id)
        .await
        .unwrap()
        .is_empty());

    let verified = AdminService::new(&fx.state)
        .set_lead_verification(
            &fx.admin,
            lead.lead_id,
            LeadStatus::Verified,
            Some("Called and confirmed".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(verified.status, LeadStatus::Verified);
    assert!(verified.verified_at.is_some());

    let logs = fx.store.list_verification_logs(lead.lead_id).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].verified_by, fx.admin.user_id);
    assert_eq!(logs[0].reason.as_deref(), Some("Called and confirmed"));
}
