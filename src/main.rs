use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use leavedesk::database::init_database;
use leavedesk::middleware::RequestId;
use leavedesk::routes;
use leavedesk::services::{
    ChangeAudit, GroupDirectory, InviteService, LogNotifier, QuotaLedger, VacationLifecycle,
};
use leavedesk::Config;

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Leavedesk API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("🚀 Starting Leavedesk API server...");

    // Load configuration
    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {})",
        config.environment
    );

    // Initialize database
    let db = init_database(&config.database_url).await?;
    println!("✅ Database initialized");

    // Wire up the domain services
    let notifier = Arc::new(LogNotifier);
    let directory = web::Data::new(GroupDirectory::new(db.clone()));
    let lifecycle = web::Data::new(VacationLifecycle::new(db.clone(), notifier));
    let ledger = web::Data::new(QuotaLedger::new(db.clone()));
    let invites = web::Data::new(InviteService::new(db.clone(), config.clone()));
    let audit = web::Data::new(ChangeAudit::new(db.clone()));
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    println!("🌐 Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            .app_data(directory.clone())
            .app_data(lifecycle.clone())
            .app_data(ledger.clone())
            .app_data(invites.clone())
            .app_data(audit.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&config.client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
