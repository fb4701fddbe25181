// Shared fixtures for the integration suite. The tests exercise the real
// schema, so they need TEST_DATABASE_URL pointing at a scratch Postgres
// database; when the variable is unset every test returns early.

use std::env;
use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, Error, web};
use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use jsonwebtoken::{EncodingKey, Header, encode};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use leavedesk::config::Config;
use leavedesk::database::Database;
use leavedesk::database::models::{GroupMembership, UserIdentity};
use leavedesk::database::repositories::memberships;
use leavedesk::routes;
use leavedesk::services::auth::SessionClaims;
use leavedesk::services::{
    ChangeAudit, GroupDirectory, InviteService, LogNotifier, QuotaLedger, VacationLifecycle,
};

pub struct TestContext {
    pub db: Database,
    pub config: Config,
}

impl TestContext {
    /// Connects to TEST_DATABASE_URL and applies the migrations. Returns
    /// None when the variable is unset so the suite can run without a
    /// database.
    pub async fn new() -> Option<Self> {
        let database_url = env::var("TEST_DATABASE_URL").ok()?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("Failed to connect to the test database");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let config = Config {
            database_url: database_url.clone(),
            session_secret: "test-session-secret-key-that-is-long-enough".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
        };

        Some(TestContext {
            db: Database::new(pool),
            config,
        })
    }

    /// The app under test, wired like the server binary minus CORS and
    /// request logging.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = Error,
            InitError = (),
        > + use<>,
    > {
        let notifier = Arc::new(LogNotifier);

        App::new()
            .app_data(web::Data::new(self.config.clone()))
            .app_data(web::Data::new(GroupDirectory::new(self.db.clone())))
            .app_data(web::Data::new(VacationLifecycle::new(
                self.db.clone(),
                notifier,
            )))
            .app_data(web::Data::new(QuotaLedger::new(self.db.clone())))
            .app_data(web::Data::new(InviteService::new(
                self.db.clone(),
                self.config.clone(),
            )))
            .app_data(web::Data::new(ChangeAudit::new(self.db.clone())))
            .configure(routes::configure)
    }

    /// A signed session token for the given directory user, the same shape
    /// the identity provider issues.
    pub fn token_for(&self, user: &UserIdentity) -> String {
        let claims = SessionClaims {
            sub: user.id,
            sid: Uuid::new_v4().to_string(),
            email: user.email.clone(),
            email_verified: user.email_verified,
            exp: (Utc::now() + Duration::hours(2)).timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.session_secret.as_ref()),
        )
        .expect("Failed to encode session token")
    }
}

/// Inserts a directory row the way the identity provider sync would.
pub async fn seed_user(db: &Database) -> UserIdentity {
    seed_user_with(db, true).await
}

#[allow(dead_code)]
pub async fn seed_unverified_user(db: &Database) -> UserIdentity {
    seed_user_with(db, false).await
}

async fn seed_user_with(db: &Database, email_verified: bool) -> UserIdentity {
    let id = Uuid::new_v4();
    let name: String = Name().fake();
    // The id prefix keeps emails unique across runs against a shared database.
    let email = format!("{}.{}", id.simple(), SafeEmail().fake::<String>());
    let now = Utc::now();

    sqlx::query(
        "INSERT INTO users (id, name, email, email_verified, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(id)
    .bind(&name)
    .bind(&email)
    .bind(email_verified)
    .bind(now)
    .bind(now)
    .execute(db.pool())
    .await
    .expect("Failed to insert directory user");

    UserIdentity {
        id,
        name,
        email,
        email_verified,
        created_at: now,
        updated_at: now,
    }
}

/// Adds an active membership directly, bypassing the invite flow.
#[allow(dead_code)]
pub async fn seed_member(
    db: &Database,
    group_id: Uuid,
    user_id: Uuid,
    view_access: bool,
    admin_access: bool,
    controlled_user: bool,
) -> GroupMembership {
    memberships::insert(
        db.pool(),
        group_id,
        user_id,
        view_access,
        admin_access,
        controlled_user,
        Some(Utc::now()),
    )
    .await
    .expect("Failed to insert membership")
    .expect("membership already present")
}

pub fn auth_header(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn setup_test_env() {
    unsafe {
        env::set_var("RUST_LOG", "debug");
    }
    let _ = env_logger::builder().is_test(true).try_init();
}
