pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod utils;

pub use config::Config;
pub use database::Database;
pub use error::AppError;
