use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use leadbridge_common::{AppError, MentorVerificationStatus, Role, User};

use crate::models::UserRecord;

pub struct MigrationRunner {
    pool: PgPool,
}

impl MigrationRunner {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn run_all_migrations(&self) -> Result<(), AppError> {
        tracing::info!("Starting database migrations...");
        crate::run_migrations(&self.pool).await?;
        tracing::info!("All migrations completed successfully");
        Ok(())
    }

    pub async fn check_migration_status(&self) -> Result<MigrationStatus, AppError> {
        let migrator = sqlx::migrate!("./migrations");

        let applied: i64 = match sqlx::query_scalar(
            "SELECT COUNT(*) FROM _sqlx_migrations WHERE success = TRUE",
        )
        .fetch_one(&self.pool)
        .await
        {
            Ok(count) => count,
            // Table is created by the first migration run
            Err(sqlx::Error::Database(_)) => 0,
            Err(err) => return Err(err.into()),
        };

        let total = migrator.iter().count();
        let applied = applied as usize;
        let pending = total.saturating_sub(applied);

        Ok(MigrationStatus {
            total,
            applied,
            pending,
            is_up_to_date: pending == 0,
        })
    }

    /// Insert a user, plus a mentor profile when the role is MENTOR.
    /// Returns the existing id when the email is already registered.
    pub async fn ensure_user(
        &self,
        name: &str,
        email: &str,
        role: Role,
        mentor_status: MentorVerificationStatus,
    ) -> Result<Uuid, AppError> {
        let existing: Option<Uuid> =
            sqlx::query_scalar("SELECT user_id FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        if let Some(user_id) = existing {
            tracing::info!(%user_id, email, "User already exists");
            return Ok(user_id);
        }

        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (user_id, name, email, role, email_verified, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(email)
        .bind(role.as_str())
        .bind(true)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if role == Role::Mentor {
            sqlx::query(
                r#"
                INSERT INTO mentor_profiles (mentor_id, verification_status, created_at, updated_at)
                VALUES ($1, $2, $3, $3)
                "#,
            )
            .bind(user_id)
            .bind(mentor_status.as_str())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(%user_id, email, role = %role, "User created");
        Ok(user_id)
    }

    pub async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRecord>(
            "SELECT user_id, name, email, role, email_verified, created_at \
             FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .map(User::try_from)
        .transpose()
    }

    pub async fn seed_initial_data(&self, admin_email: &str) -> Result<Uuid, AppError> {
        self.ensure_user(
            "Administrator",
            admin_email,
            Role::Admin,
            MentorVerificationStatus::Pending,
        )
        .await
    }
}

#[derive(Debug)]
pub struct MigrationStatus {
    pub total: usize,
    pub applied: usize,
    pub pending: usize,
    pub is_up_to_date: bool,
}

impl std::fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Migrations: {}/{} applied, {} pending",
            self.applied, self.total, self.pending
        )
    }
}
