use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use leadbridge_common::{
    AppError, Event, Invitation, InvitationStatus, Lead, LeadStatus, LeadVerificationLog,
    MentorProfile, MentorVerificationStatus, Payment, PaymentKind, Role, Ticket, User,
};
use leadbridge_database::{
    convert_all, DbPool, EventRecord, InvitationRecord, LeadRecord, MentorProfileRecord,
    PaymentRecord, TicketRecord, UserRecord, VerificationLogRecord,
};

use super::{
    BookingOutcome, EventPatch, InvitationOutcome, MarketplaceStore, MentorProfilePatch,
    PurchaseOutcome, TicketOutcome, TransitionOutcome,
};

const USER_COLUMNS: &str = "user_id, name, email, role, email_verified, created_at";
const PROFILE_COLUMNS: &str =
    "mentor_id, bio, expertise, experience, verification_status, created_at, updated_at";
const EVENT_COLUMNS: &str = "event_id, mentor_id, title, description, category, event_datetime, \
     duration_minutes, available_slots, price_per_lead, created_at";
const LEAD_COLUMNS: &str = "lead_id, event_id, user_id, name, email, phone, message, status, \
     price_per_lead, purchased_by, payment_id, verified_at, created_at, updated_at";
const PAYMENT_COLUMNS: &str = "payment_id, kind, payer_id, lead_id, invitation_id, amount, \
     demo_payment_code, verified, created_at, verified_at";
const INVITATION_COLUMNS: &str = "invitation_id, lead_id, event_id, mentor_id, guest_user_id, \
     ticket_price, status, invited_at, paid_at";
const TICKET_COLUMNS: &str =
    "ticket_id, invitation_id, lead_id, event_id, guest_user_id, ticket_price, issued_at";
const LOG_COLUMNS: &str = "log_id, lead_id, verified_by, status, reason, created_at";

/// PostgreSQL adapter. Compound operations run in one transaction and guard
/// every state change with the expected prior status in the WHERE clause.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_foreign_key_violation())
        .unwrap_or(false)
}

/// `UPDATE ... WHERE status = from`; `None` when the lead was not in `from`.
async fn compare_and_set_lead<'e, E>(
    executor: E,
    lead_id: Uuid,
    from: LeadStatus,
    to: LeadStatus,
    now: DateTime<Utc>,
) -> Result<Option<LeadRecord>, AppError>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, LeadRecord>(&format!(
        "UPDATE leads SET status = $3, updated_at = $4, \
             verified_at = CASE WHEN $3 = 'VERIFIED' THEN $4 ELSE verified_at END \
         WHERE lead_id = $1 AND status = $2 \
         RETURNING {LEAD_COLUMNS}"
    ))
    .bind(lead_id)
    .bind(from.as_str())
    .bind(to.as_str())
    .bind(now)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

async fn lead_status<'e, E>(executor: E, lead_id: Uuid) -> Result<Option<LeadStatus>, AppError>
where
    E: sqlx::PgExecutor<'e>,
{
    let status: Option<String> = sqlx::query_scalar("SELECT status FROM leads WHERE lead_id = $1")
        .bind(lead_id)
        .fetch_optional(executor)
        .await?;
    status.map(|s| s.parse()).transpose()
}

#[async_trait]
impl MarketplaceStore for PgStore {
    async fn insert_user(&self, user: User) -> Result<(), AppError> {
        let result = sqlx::query(
            "INSERT INTO users (user_id, name, email, role, email_verified, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.user_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(user.email_verified)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(AppError::Conflict(format!(
                "Email {} already registered",
                user.email
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, user_id"
        ))
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn count_users_with_role(&self, role: Role) -> Result<i64, AppError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_mentor_profile(&self, profile: MentorProfile) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO mentor_profiles \
             (mentor_id, bio, expertise, experience, verification_status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(profile.mentor_id)
        .bind(&profile.bio)
        .bind(&profile.expertise)
        .bind(&profile.experience)
        .bind(profile.verification_status.as_str())
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_mentor_profile(&self, mentor_id: Uuid) -> Result<Option<MentorProfile>, AppError> {
        sqlx::query_as::<_, MentorProfileRecord>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM mentor_profiles WHERE mentor_id = $1"
        ))
        .bind(mentor_id)
        .fetch_optional(&self.pool)
        .await?
        .map(MentorProfile::try_from)
        .transpose()
    }

    async fn list_mentor_profiles(
        &self,
        status: Option<MentorVerificationStatus>,
    ) -> Result<Vec<MentorProfile>, AppError> {
        let rows = sqlx::query_as::<_, MentorProfileRecord>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM mentor_profiles \
             WHERE ($1::TEXT IS NULL OR verification_status = $1) \
             ORDER BY created_at, mentor_id"
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn update_mentor_profile(
        &self,
        mentor_id: Uuid,
        patch: MentorProfilePatch,
        now: DateTime<Utc>,
    ) -> Result<Option<MentorProfile>, AppError> {
        sqlx::query_as::<_, MentorProfileRecord>(&format!(
            "UPDATE mentor_profiles SET \
                 bio = COALESCE($2, bio), \
                 expertise = COALESCE($3, expertise), \
                 experience = COALESCE($4, experience), \
                 updated_at = $5 \
             WHERE mentor_id = $1 \
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(mentor_id)
        .bind(patch.bio)
        .bind(patch.expertise)
        .bind(patch.experience)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .map(MentorProfile::try_from)
        .transpose()
    }

    async fn set_mentor_verification(
        &self,
        mentor_id: Uuid,
        status: MentorVerificationStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<MentorProfile>, AppError> {
        sqlx::query_as::<_, MentorProfileRecord>(&format!(
            "UPDATE mentor_profiles SET verification_status = $2, updated_at = $3 \
             WHERE mentor_id = $1 RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(mentor_id)
        .bind(status.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .map(MentorProfile::try_from)
        .transpose()
    }

    async fn insert_event(&self, event: Event) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO events (event_id, mentor_id, title, description, category, \
             event_datetime, duration_minutes, available_slots, price_per_lead, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(event.event_id)
        .bind(event.mentor_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.category)
        .bind(event.event_datetime)
        .bind(event.duration_minutes)
        .bind(event.available_slots)
        .bind(event.price_per_lead)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_event(&self, event_id: Uuid) -> Result<Option<Event>, AppError> {
        let row = sqlx::query_as::<_, EventRecord>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_id = $1"
        ))
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Event::from))
    }

    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query_as::<_, EventRecord>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY event_datetime, event_id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn list_events_by_mentor(&self, mentor_id: Uuid) -> Result<Vec<Event>, AppError> {
        let rows = sqlx::query_as::<_, EventRecord>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE mentor_id = $1 \
             ORDER BY event_datetime, event_id"
        ))
        .bind(mentor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn update_event(&self, event_id: Uuid, patch: EventPatch) -> Result<Option<Event>, AppError> {
        let row = sqlx::query_as::<_, EventRecord>(&format!(
            "UPDATE events SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 category = COALESCE($4, category), \
                 event_datetime = COALESCE($5, event_datetime), \
                 duration_minutes = COALESCE($6, duration_minutes), \
                 available_slots = COALESCE($7, available_slots), \
                 price_per_lead = COALESCE($8, price_per_lead) \
             WHERE event_id = $1 \
             RETURNING {EVENT_COLUMNS}"
        ))
        .bind(event_id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.category)
        .bind(patch.event_datetime)
        .bind(patch.duration_minutes)
        .bind(patch.available_slots)
        .bind(patch.price_per_lead)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Event::from))
    }

    async fn delete_event_without_leads(&self, event_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM events WHERE event_id = $1 \
             AND NOT EXISTS (SELECT 1 FROM leads WHERE event_id = $1)",
        )
        .bind(event_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn book_event(&self, lead: Lead) -> Result<BookingOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let taken = sqlx::query(
            "UPDATE events SET available_slots = available_slots - 1 \
             WHERE event_id = $1 AND available_slots > 0",
        )
        .bind(lead.event_id)
        .execute(&mut *tx)
        .await?;

        if taken.rows_affected() == 0 {
            let exists: Option<Uuid> =
                sqlx::query_scalar("SELECT event_id FROM events WHERE event_id = $1")
                    .bind(lead.event_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            tx.rollback().await?;
            return Ok(match exists {
                Some(_) => BookingOutcome::NoSlotsAvailable,
                None => BookingOutcome::EventNotFound,
            });
        }

        sqlx::query(
            "INSERT INTO leads (lead_id, event_id, user_id, name, email, phone, message, status, \
             price_per_lead, purchased_by, payment_id, verified_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(lead.lead_id)
        .bind(lead.event_id)
        .bind(lead.user_id)
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.message)
        .bind(lead.status.as_str())
        .bind(lead.price_per_lead)
        .bind(lead.purchased_by)
        .bind(lead.payment_id)
        .bind(lead.verified_at)
        .bind(lead.created_at)
        .bind(lead.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(BookingOutcome::Booked(lead))
    }

    async fn get_lead(&self, lead_id: Uuid) -> Result<Option<Lead>, AppError> {
        sqlx::query_as::<_, LeadRecord>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads WHERE lead_id = $1"
        ))
        .bind(lead_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Lead::try_from)
        .transpose()
    }

    async fn list_leads(&self) -> Result<Vec<Lead>, AppError> {
        let rows = sqlx::query_as::<_, LeadRecord>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads ORDER BY created_at, lead_id"
        ))
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn list_leads_by_user(&self, user_id: Uuid) -> Result<Vec<Lead>, AppError> {
        let rows = sqlx::query_as::<_, LeadRecord>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads WHERE user_id = $1 ORDER BY created_at, lead_id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn list_leads_by_events(&self, event_ids: &[Uuid]) -> Result<Vec<Lead>, AppError> {
        let rows = sqlx::query_as::<_, LeadRecord>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads WHERE event_id = ANY($1) \
             ORDER BY created_at, lead_id"
        ))
        .bind(event_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn count_leads_with_status(&self, status: Option<LeadStatus>) -> Result<i64, AppError> {
        let count = sqlx::query_scalar(
            "SELECT COUNT(*) FROM leads WHERE ($1::TEXT IS NULL OR status = $1)",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn transition_lead(
        &self,
        lead_id: Uuid,
        from: LeadStatus,
        to: LeadStatus,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, AppError> {
        if let Some(row) = compare_and_set_lead(&self.pool, lead_id, from, to, now).await? {
            return Ok(TransitionOutcome::Applied(Lead::try_from(row)?));
        }

        Ok(match lead_status(&self.pool, lead_id).await? {
            Some(current) => TransitionOutcome::StatusMismatch(current),
            None => TransitionOutcome::LeadNotFound,
        })
    }

    async fn verify_lead(
        &self,
        log: LeadVerificationLog,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let Some(row) =
            compare_and_set_lead(&mut *tx, log.lead_id, LeadStatus::Pending, log.status, now)
                .await?
        else {
            let current = lead_status(&mut *tx, log.lead_id).await?;
            tx.rollback().await?;
            return Ok(match current {
                Some(current) => TransitionOutcome::StatusMismatch(current),
                None => TransitionOutcome::LeadNotFound,
            });
        };

        let inserted = sqlx::query(
            "INSERT INTO lead_verification_logs \
             (log_id, lead_id, verified_by, status, reason, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(log.log_id)
        .bind(log.lead_id)
        .bind(log.verified_by)
        .bind(log.status.as_str())
        .bind(&log.reason)
        .bind(log.created_at)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(err) if is_foreign_key_violation(&err) => {
                tx.rollback().await?;
                return Err(AppError::not_found("User", log.verified_by));
            }
            Err(err) => return Err(err.into()),
        }

        tx.commit().await?;
        Ok(TransitionOutcome::Applied(Lead::try_from(row)?))
    }

    async fn list_verification_logs(&self, lead_id: Uuid) -> Result<Vec<LeadVerificationLog>, AppError> {
        let rows = sqlx::query_as::<_, VerificationLogRecord>(&format!(
            "SELECT {LOG_COLUMNS} FROM lead_verification_logs WHERE lead_id = $1 \
             ORDER BY created_at"
        ))
        .bind(lead_id)
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn insert_payment(&self, payment: Payment) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO payments (payment_id, kind, payer_id, lead_id, invitation_id, amount, \
             demo_payment_code, verified, created_at, verified_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(payment.payment_id)
        .bind(payment.kind.as_str())
        .bind(payment.payer_id)
        .bind(payment.lead_id)
        .bind(payment.invitation_id)
        .bind(payment.amount)
        .bind(&payment.demo_payment_code)
        .bind(payment.verified)
        .bind(payment.created_at)
        .bind(payment.verified_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<Payment>, AppError> {
        sqlx::query_as::<_, PaymentRecord>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE payment_id = $1"
        ))
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Payment::try_from)
        .transpose()
    }

    async fn list_verified_payments(&self) -> Result<Vec<Payment>, AppError> {
        let rows = sqlx::query_as::<_, PaymentRecord>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE verified ORDER BY created_at, payment_id"
        ))
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn complete_lead_purchase(
        &self,
        payment_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<PurchaseOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let payment: Payment = sqlx::query_as::<_, PaymentRecord>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE payment_id = $1 AND kind = $2 FOR UPDATE"
        ))
        .bind(payment_id)
        .bind(PaymentKind::LeadPurchase.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Payment", payment_id))?
        .try_into()?;

        if payment.verified {
            return Ok(PurchaseOutcome::PaymentAlreadyVerified);
        }

        let purchased = sqlx::query_as::<_, LeadRecord>(&format!(
            "UPDATE leads SET status = $2, purchased_by = $3, payment_id = $4, updated_at = $5 \
             WHERE lead_id = $1 AND status = $6 \
             RETURNING {LEAD_COLUMNS}"
        ))
        .bind(payment.lead_id)
        .bind(LeadStatus::Purchased.as_str())
        .bind(payment.payer_id)
        .bind(payment.payment_id)
        .bind(now)
        .bind(LeadStatus::Verified.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = purchased else {
            let current = lead_status(&mut *tx, payment.lead_id)
                .await?
                .ok_or_else(|| AppError::not_found("Lead", payment.lead_id))?;
            return Ok(PurchaseOutcome::LeadUnavailable(current));
        };

        sqlx::query("UPDATE payments SET verified = TRUE, verified_at = $2 WHERE payment_id = $1")
            .bind(payment.payment_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(PurchaseOutcome::Completed(Lead::try_from(row)?))
    }

    async fn create_invitation(&self, invitation: Invitation) -> Result<InvitationOutcome, AppError> {
        let mut tx = self.pool.begin().await?;

        let current: String =
            sqlx::query_scalar("SELECT status FROM leads WHERE lead_id = $1 FOR UPDATE")
                .bind(invitation.lead_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::not_found("Lead", invitation.lead_id))?;
        let current: LeadStatus = current.parse()?;

        let active: Option<Uuid> = sqlx::query_scalar(
            "SELECT invitation_id FROM invitations WHERE lead_id = $1 AND status <> $2",
        )
        .bind(invitation.lead_id)
        .bind(InvitationStatus::Cancelled.as_str())
        .fetch_optional(&mut *tx)
        .await?;
        if active.is_some() {
            return Ok(InvitationOutcome::ActiveInvitationExists);
        }

        if current != LeadStatus::Purchased {
            return Ok(InvitationOutcome::LeadUnavailable(current));
        }

        let inserted = sqlx::query(
            "INSERT INTO invitations (invitation_id, lead_id, event_id, mentor_id, guest_user_id, \
             ticket_price, status, invited_at, paid_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(invitation.invitation_id)
        .bind(invitation.lead_id)
        .bind(invitation.event_id)
        .bind(invitation.mentor_id)
        .bind(invitation.guest_user_id)
        .bind(invitation.ticket_price)
        .bind(invitation.status.as_str())
        .bind(invitation.invited_at)
        .bind(invitation.paid_at)
        .execute(&mut *tx)
        .await;

        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Ok(InvitationOutcome::ActiveInvitationExists)
            }
            Err(err) => return Err(err.into()),
        }

        sqlx::query("UPDATE leads SET status = $2, updated_at = $3 WHERE lead_id = $1")
            .bind(invitation.lead_id)
            .bind(LeadStatus::Invited.as_str())
            .bind(invitation.invited_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(InvitationOutcome::Created(invitation))
    }

    async fn get_invitation(&self, invitation_id: Uuid) -> Result<Option<Invitation>, AppError> {
        sqlx::query_as::<_, InvitationRecord>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE invitation_id = $1"
        ))
        .bind(invitation_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Invitation::try_from)
        .transpose()
    }

    async fn active_invitation_for_lead(&self, lead_id: Uuid) -> Result<Option<Invitation>, AppError> {
        sqlx::query_as::<_, InvitationRecord>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE lead_id = $1 AND status <> $2"
        ))
        .bind(lead_id)
        .bind(InvitationStatus::Cancelled.as_str())
        .fetch_optional(&self.pool)
        .await?
        .map(Invitation::try_from)
        .transpose()
    }

    async fn list_invitations_by_guest(&self, guest_user_id: Uuid) -> Result<Vec<Invitation>, AppError> {
        let rows = sqlx::query_as::<_, InvitationRecord>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE guest_user_id = $1 \
             ORDER BY invited_at, invitation_id"
        ))
        .bind(guest_user_id)
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn list_invitations_by_mentor(&self, mentor_id: Uuid) -> Result<Vec<Invitation>, AppError> {
        let rows = sqlx::query_as::<_, InvitationRecord>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE mentor_id = $1 \
             ORDER BY invited_at, invitation_id"
        ))
        .bind(mentor_id)
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn issue_ticket(&self, payment_id: Uuid, ticket: Ticket) -> Result<TicketOutcome, AppError> {
        let now = ticket.issued_at;
        let mut tx = self.pool.begin().await?;

        let payment: Payment = sqlx::query_as::<_, PaymentRecord>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE payment_id = $1 AND kind = $2 FOR UPDATE"
        ))
        .bind(payment_id)
        .bind(PaymentKind::Ticket.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Payment", payment_id))?
        .try_into()?;

        if payment.verified {
            return Ok(TicketOutcome::PaymentAlreadyVerified);
        }

        let invitation_status: String = sqlx::query_scalar(
            "SELECT status FROM invitations WHERE invitation_id = $1 FOR UPDATE",
        )
        .bind(ticket.invitation_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Invitation", ticket.invitation_id))?;
        let invitation_status: InvitationStatus = invitation_status.parse()?;
        if invitation_status != InvitationStatus::Pending {
            return Ok(TicketOutcome::InvitationUnavailable(invitation_status));
        }

        let confirmed = sqlx::query(
            "UPDATE leads SET status = $2, updated_at = $3 WHERE lead_id = $1 AND status = $4",
        )
        .bind(ticket.lead_id)
        .bind(LeadStatus::Confirmed.as_str())
        .bind(now)
        .bind(LeadStatus::Invited.as_str())
        .execute(&mut *tx)
        .await?;

        if confirmed.rows_affected() == 0 {
            let current = lead_status(&mut *tx, ticket.lead_id)
                .await?
                .ok_or_else(|| AppError::not_found("Lead", ticket.lead_id))?;
            return Ok(TicketOutcome::LeadUnavailable(current));
        }

        sqlx::query("UPDATE invitations SET status = $2, paid_at = $3 WHERE invitation_id = $1")
            .bind(ticket.invitation_id)
            .bind(InvitationStatus::Paid.as_str())
            .bind(now)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE payments SET verified = TRUE, verified_at = $2 WHERE payment_id = $1")
            .bind(payment.payment_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO tickets (ticket_id, invitation_id, lead_id, event_id, guest_user_id, \
             ticket_price, issued_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(ticket.ticket_id)
        .bind(ticket.invitation_id)
        .bind(ticket.lead_id)
        .bind(ticket.event_id)
        .bind(ticket.guest_user_id)
        .bind(ticket.ticket_price)
        .bind(ticket.issued_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(TicketOutcome::Issued(ticket))
    }

    async fn list_tickets_by_guest(&self, guest_user_id: Uuid) -> Result<Vec<Ticket>, AppError> {
        let rows = sqlx::query_as::<_, TicketRecord>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE guest_user_id = $1 \
             ORDER BY issued_at, ticket_id"
        ))
        .bind(guest_user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Ticket::from).collect())
    }

    async fn list_tickets_by_invitation(&self, invitation_id: Uuid) -> Result<Vec<Ticket>, AppError> {
        let rows = sqlx::query_as::<_, TicketRecord>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE invitation_id = $1"
        ))
        .bind(invitation_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Ticket::from).collect())
    }
}
