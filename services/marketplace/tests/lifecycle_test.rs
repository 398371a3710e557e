mod common;

use std::sync::Arc;

use rust_decimal::Decimal;

use uuid::Uuid;

use leadbridge_common::{
    Actor, AppError, InvitationStatus, LeadStatus, MentorVerificationStatus, Role,
};
use leadbridge_marketplace::{
    config::LifecycleConfig,
    models::UpdateMentorProfileRequest,
    services::{
        AdminService, EventService, InvitationService, LeadService, ProfileService,
        PurchaseService, RevenueService,
    },
    store::MarketplaceStore,
};

use common::{add_mentor, add_user, booking, event_request, fixture, fixture_with, DEMO_CODE};

#[tokio::test]
async fn wrong_code_leaves_lead_verified_and_right_code_purchases_it() {
    let fx = fixture().await;
    let lead = fx.verified_lead().await;
    assert_eq!(lead.status, LeadStatus::Verified);
    assert_eq!(lead.price_per_lead, Decimal::from(2500));

    let purchases = PurchaseService::new(&fx.state);
    let intent = purchases
        .initiate_purchase(&fx.mentor, lead.lead_id)
        .await
        .unwrap();
    assert_eq!(intent.demo_payment_code, DEMO_CODE);
    assert_eq!(intent.amount, Decimal::from(2500));
    assert_eq!(intent.currency, "INR");

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

    // A verified payment cannot be replayed.
    let err = purchases
        .verify_purchase(&fx.mentor, intent.payment_id, DEMO_CODE)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidPaymentCode));
}

#[tokio::test]
async fn second_invitation_for_the_same_lead_is_rejected() {
    let fx = fixture().await;
    let lead = fx.purchased_lead().await;
    let invitations = InvitationService::new(&fx.state);

    let invitation = invitations
        .invite_guest(&fx.mentor, lead.lead_id, Decimal::from(3000))
        .await
        .unwrap();
    assert_eq!(invitation.status, InvitationStatus::Pending);
    assert_eq!(invitation.guest_user_id, fx.guest.user_id);
    assert_eq!(fx.lead(lead.lead_id).await.status, LeadStatus::Invited);

    let err = invitations
        .invite_guest(&fx.mentor, lead.lead_id, Decimal::from(3500))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DuplicateInvitation));
}

#[tokio::test]
async fn paying_the_invitation_confirms_the_lead_and_issues_one_ticket() {
    let fx = fixture().await;
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
    assert_eq!(intent.amount, Decimal::from(3000));

    let err = invitations
        .verify_ticket_payment(&fx.guest, intent.payment_id, "0000")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidPaymentCode));
    assert!(fx
        .store
        .list_tickets_by_invitation(invitation.invitation_id)
        .await
        .unwrap()
        .is_empty());

    let ticket = invitations
        .verify_ticket_payment(&fx.guest, intent.payment_id, DEMO_CODE)
        .await
        .unwrap();
    assert_eq!(ticket.invitation_id, invitation.invitation_id);
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

    let tickets = fx
        .store
        .list_tickets_by_invitation(invitation.invitation_id)
        .await
        .unwrap();
    assert_eq!(tickets.len(), 1);

    // A paid invitation cannot be paid again.
    let err = invitations
        .pay_for_ticket(&fx.guest, invitation.invitation_id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidLeadTransition {
            from: LeadStatus::Confirmed,
            to: LeadStatus::Confirmed
        }
    ));
}

#[tokio::test]
async fn passed_lead_cannot_be_invited() {
    let fx = fixture().await;
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
    assert!(fx.notifier.names().contains(&"lead_passed"));
}

#[tokio::test]
async fn invited_lead_cannot_be_passed() {
    let fx = fixture().await;
    let lead = fx.purchased_lead().await;
    InvitationService::new(&fx.state)
        .invite_guest(&fx.mentor, lead.lead_id, Decimal::from(3000))
        .await
        .unwrap();

    let err = LeadService::new(&fx.state)
        .pass_guest(&fx.mentor, lead.lead_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidLeadTransition { .. }));
    assert_eq!(fx.lead(lead.lead_id).await.status, LeadStatus::Invited);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_purchase_verifications_have_one_winner() {
    let fx = fixture().await;
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

    let attempts = payment_ids.into_iter().map(|payment_id| {
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

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            result,
            Err(AppError::LeadAlreadyPurchased) | Err(AppError::InvalidPaymentCode)
        ));
    }

    let verified = fx.store.list_verified_payments().await.unwrap();
    assert_eq!(verified.len(), 1);
    assert_eq!(fx.lead(lead.lead_id).await.status, LeadStatus::Purchased);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_invitations_create_one() {
    let fx = fixture().await;
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
    let stored = fx
        .store
        .list_invitations_by_mentor(fx.mentor.user_id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn purchase_guards() {
    let fx = fixture().await;
    let purchases = PurchaseService::new(&fx.state);
    let other_mentor = add_mentor(&*fx.store, "Kabir", MentorVerificationStatus::Approved).await;

    let lead = fx.verified_lead().await;
    let err = purchases
        .initiate_purchase(&other_mentor, lead.lead_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized(_)));

    let err = purchases
        .initiate_purchase(&fx.guest, lead.lead_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized(_)));

    let pending = fx.book_as(&fx.guest, "12").await;
    assert_eq!(pending.status, LeadStatus::Pending);
    let err = purchases
        .initiate_purchase(&fx.mentor, pending.lead_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::LeadNotVerified));

    let purchased = fx.purchased_lead().await;
    let err = purchases
        .initiate_purchase(&fx.mentor, purchased.lead_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::LeadAlreadyPurchased));

    let err = purchases
        .initiate_purchase(&fx.mentor, uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn payment_can_only_be_verified_by_its_payer() {
    let fx = fixture().await;
    let purchases = PurchaseService::new(&fx.state);
    let lead = fx.verified_lead().await;
    let intent = purchases
        .initiate_purchase(&fx.mentor, lead.lead_id)
        .await
        .unwrap();

    let other_mentor = add_mentor(&*fx.store, "Kabir", MentorVerificationStatus::Approved).await;
    let err = purchases
        .verify_purchase(&other_mentor, intent.payment_id, DEMO_CODE)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized(_)));
    assert_eq!(fx.lead(lead.lead_id).await.status, LeadStatus::Verified);
}

#[tokio::test]
async fn invitation_guards() {
    let fx = fixture().await;
    let invitations = InvitationService::new(&fx.state);
    let lead = fx.verified_lead().await;

    let err = invitations
        .invite_guest(&fx.mentor, lead.lead_id, Decimal::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = invitations
        .invite_guest(&fx.mentor, lead.lead_id, Decimal::from(3000))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidLeadTransition {
            from: LeadStatus::Verified,
            to: LeadStatus::Invited
        }
    ));

    let purchased = fx.purchased_lead().await;
    let invitation = invitations
        .invite_guest(&fx.mentor, purchased.lead_id, Decimal::from(3000))
        .await
        .unwrap();

    let stranger = add_user(&*fx.store, "Stranger", Role::User).await;
    let err = invitations
        .pay_for_ticket(&stranger, invitation.invitation_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized(_)));
}

#[tokio::test]
async fn admin_verifies_pending_leads_once_and_logs_it() {
    let fx = fixture_with(LifecycleConfig {
        lead_auto_verify: false,
        ..LifecycleConfig::default()
    })
    .await;
    let admin = AdminService::new(&fx.state);

    let lead = fx.verified_lead().await;
    assert_eq!(lead.status, LeadStatus::Pending);
    assert!(LeadService::new(&fx.state)
        .list_mentor_leads(&fx.mentor)
        .await
        .unwrap()
        .is_empty());

    let err = admin
        .set_lead_verification(&fx.admin, lead.lead_id, LeadStatus::Purchased, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = admin
        .set_lead_verification(&fx.mentor, lead.lead_id, LeadStatus::Verified, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized(_)));

    let verified = admin
        .set_lead_verification(
            &fx.admin,
            lead.lead_id,
            LeadStatus::Verified,
            Some("Called the guest".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(verified.status, LeadStatus::Verified);
    assert!(verified.verified_at.is_some());

    let err = admin
        .set_lead_verification(&fx.admin, lead.lead_id, LeadStatus::Rejected, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidLeadTransition {
            from: LeadStatus::Verified,
            to: LeadStatus::Rejected
        }
    ));

    let logs = admin
        .lead_verification_logs(&fx.admin, lead.lead_id)
        .await
        .unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].verified_by, fx.admin.user_id);
    assert_eq!(logs[0].reason.as_deref(), Some("Called the guest"));
}

#[tokio::test]
async fn only_approved_mentors_publish_events() {
    let fx = fixture().await;
    let events = EventService::new(&fx.state);
    let newcomer = add_mentor(&*fx.store, "Nisha", MentorVerificationStatus::Pending).await;

    let err = events
        .create_event(&newcomer, event_request(500, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized(_)));

    let pending = AdminService::new(&fx.state)
        .list_pending_mentors(&fx.admin)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].name, "Nisha");

    AdminService::new(&fx.state)
        .set_mentor_verification(&fx.admin, newcomer.user_id, MentorVerificationStatus::Approved)
        .await
        .unwrap();
    let event = events
        .create_event(&newcomer, event_request(500, 5))
        .await
        .unwrap();

    let listed = events.list_events().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed
        .iter()
        .any(|l| l.event.event_id == event.event_id && l.mentor_name == "Nisha"));
    assert!(fx.notifier.names().contains(&"mentor_verification_changed"));
}

#[tokio::test]
async fn bookings_consume_slots_atomically() {
    let fx = fixture().await;
    let events = EventService::new(&fx.state);
    let small = events
        .create_event(&fx.mentor, event_request(100, 1))
        .await
        .unwrap();

    events
        .book_event(&fx.guest, small.event_id, booking("Ravi", "9876543210"))
        .await
        .unwrap();
    let err = events
        .book_event(&fx.guest, small.event_id, booking("Ravi", "9876543210"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(msg) if msg == "No slots available"));

    let stored = fx.store.get_event(small.event_id).await.unwrap().unwrap();
    assert_eq!(stored.available_slots, 0);

    let err = events
        .book_event(&fx.mentor, fx.event.event_id, booking("Meera", "9876543210"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized(_)));
}

#[tokio::test]
async fn event_with_bookings_cannot_be_deleted() {
    let fx = fixture().await;
    let events = EventService::new(&fx.state);
    fx.verified_lead().await;

    let err = events
        .delete_event(&fx.mentor, fx.event.event_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let empty = events
        .create_event(&fx.mentor, event_request(100, 3))
        .await
        .unwrap();
    events.delete_event(&fx.mentor, empty.event_id).await.unwrap();
    assert!(fx.store.get_event(empty.event_id).await.unwrap().is_none());
}

#[tokio::test]
async fn mentor_sees_contact_details_only_after_purchase() {
    let fx = fixture().await;
    let verified = fx.verified_lead().await;
    let purchased = fx.purchased_lead().await;

    let views = LeadService::new(&fx.state)
        .list_mentor_leads(&fx.mentor)
        .await
        .unwrap();
    assert_eq!(views.len(), 2);

    let verified_view = views.iter().find(|v| v.lead_id == verified.lead_id).unwrap();
    assert!(verified_view.email.is_none());
    assert!(verified_view.phone.is_none());

    let purchased_view = views.iter().find(|v| v.lead_id == purchased.lead_id).unwrap();
    assert_eq!(purchased_view.email.as_deref(), Some("ravi@example.com"));
    assert_eq!(purchased_view.phone.as_deref(), Some("9876543210"));

    let bookings = LeadService::new(&fx.state)
        .list_user_bookings(&fx.guest)
        .await
        .unwrap();
    assert_eq!(bookings.len(), 2);
    assert!(bookings.iter().all(|b| b.event_title == "Resume Clinic"));
}

#[tokio::test]
async fn projected_revenue_tracks_verified_leads() {
    let fx = fixture().await;
    let revenue = RevenueService::new(&fx.state);

    fx.verified_lead().await;
    fx.verified_lead().await;
    fx.purchased_lead().await;

    let projection = revenue.projected_revenue(&fx.mentor).await.unwrap();
    assert_eq!(projection.total_leads, 2);
    assert_eq!(projection.total_potential_revenue, Decimal::from(5000));
    assert_eq!(projection.per_event.len(), 1);
    assert_eq!(projection.per_event[0].event_id, fx.event.event_id);

    let err = revenue.projected_revenue(&fx.guest).await.unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized(_)));
}

#[tokio::test]
async fn analytics_reflect_completed_payments() {
    let fx = fixture().await;
    let lead = fx.purchased_lead().await;
    fx.verified_lead().await;

    let invitations = InvitationService::new(&fx.state);
    let invitation = invitations
        .invite_guest(&fx.mentor, lead.lead_id, Decimal::from(3000))
        .await
        .unwrap();
    let intent = invitations
        .pay_for_ticket(&fx.guest, invitation.invitation_id)
        .await
        .unwrap();
    invitations
        .verify_ticket_payment(&fx.guest, intent.payment_id, DEMO_CODE)
        .await
        .unwrap();

    let analytics = AdminService::new(&fx.state)
        .analytics(&fx.admin)
        .await
        .unwrap();
    assert_eq!(analytics.total_users, 1);
    assert_eq!(analytics.total_mentors, 1);
    assert_eq!(analytics.total_events, 1);
    assert_eq!(analytics.total_leads, 2);
    assert_eq!(analytics.verified_leads, 1);
    assert_eq!(analytics.purchased_leads, 1);
    assert_eq!(analytics.total_revenue, Decimal::from(2500));
    assert_eq!(analytics.total_ticket_sales, Decimal::from(3000));

    let tickets = invitations.list_guest_tickets(&fx.guest).await.unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0].event_title, "Resume Clinic");
    assert_eq!(
        fx.notifier.names(),
        vec![
            "booking_received",
            "booking_received",
            "guest_invited",
            "ticket_issued"
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_ticket_verifications_issue_one_ticket() {
    let fx = fixture().await;
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

    let tickets = fx
        .store
        .list_tickets_by_invitation(invitation.invitation_id)
        .await
        .unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(fx.lead(lead.lead_id).await.status, LeadStatus::Confirmed);
}

#[tokio::test]
async fn lead_verification_by_unknown_admin_changes_nothing() {
    let fx = fixture_with(LifecycleConfig {
        lead_auto_verify: false,
        ..LifecycleConfig::default()
    })
    .await;
    let lead = fx.verified_lead().await;
    assert_eq!(lead.status, LeadStatus::Pending);

    // Holds a valid admin role but has no row in users.
    let ghost = Actor::new(Uuid::new_v4(), Role::Admin);
    let err = AdminService::new(&fx.state)
        .set_lead_verification(&ghost, lead.lead_id, LeadStatus::Verified, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let stored = fx.lead(lead.lead_id).await;
    assert_eq!(stored.status, LeadStatus::Pending);
    assert!(stored.verified_at.is_none());
    let logs = fx.store.list_verification_logs(lead.lead_id).await.unwrap();
    assert!(logs.is_empty());

    // The lead is still open for a real admin.
    let verified = AdminService::new(&fx.state)
        .set_lead_verification(&fx.admin, lead.lead_id, LeadStatus::Verified, None)
        .await
        .unwrap();
    assert_eq!(verified.status, LeadStatus::Verified);
    assert_eq!(
        fx.store.list_verification_logs(lead.lead_id).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn passing_an_unknown_lead_is_not_found_for_any_role() {
    let fx = fixture().await;
    let err = LeadService::new(&fx.state)
        .pass_guest(&fx.guest, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let lead = fx.purchased_lead().await;
    let err = LeadService::new(&fx.state)
        .pass_guest(&fx.guest, lead.lead_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized(_)));
}

#[tokio::test]
async fn mentor_profile_updates() {
    let fx = fixture().await;
    let profiles = ProfileService::new(&fx.state);

    let profile = profiles.get_mentor_profile(&fx.mentor).await.unwrap();
    assert_eq!(profile.bio.as_deref(), Some("Meera hosts career workshops"));

    let updated = profiles
        .update_mentor_profile(
            &fx.mentor,
            UpdateMentorProfileRequest {
                bio: None,
                expertise: Some(vec![
                    " Resumes ".to_string(),
                    "".to_string(),
                    "Negotiation".to_string(),
                ]),
                experience: Some("Ten years in hiring".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.expertise, vec!["Resumes", "Negotiation"]);
    assert_eq!(updated.experience.as_deref(), Some("Ten years in hiring"));
    assert_eq!(updated.bio, profile.bio);
    assert_eq!(
        updated.verification_status,
        MentorVerificationStatus::Approved
    );

    let err = profiles
        .update_mentor_profile(&fx.mentor, UpdateMentorProfileRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = profiles.get_mentor_profile(&fx.guest).await.unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized(_)));

    let no_profile = add_user(&*fx.store, "Tara", Role::Mentor).await;
    let err = profiles.get_mentor_profile(&no_profile).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
