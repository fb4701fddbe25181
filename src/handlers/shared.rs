use actix_web::HttpResponse;
use chrono::{Datelike, Utc};
use serde::Serialize;

use crate::{
    error::AppError,
    utils::{MAX_QUERY_YEAR, MIN_QUERY_YEAR},
};

#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

/// 200 with a bare confirmation message.
pub fn message(text: &str) -> HttpResponse {
    HttpResponse::Ok().json(MessageBody {
        message: text.to_string(),
    })
}

/// Year/month query parameters with current-date defaults and bounds applied.
pub fn resolve_calendar_window(
    year: Option<i32>,
    month: Option<u32>,
) -> Result<(i32, u32), AppError> {
    let today = Utc::now();
    let year = year.unwrap_or_else(|| today.year());
    let month = month.unwrap_or_else(|| today.month());

    let mut errors = Vec::new();
    if !(MIN_QUERY_YEAR..=MAX_QUERY_YEAR).contains(&year) {
        errors.push(format!(
            "year must be between {MIN_QUERY_YEAR} and {MAX_QUERY_YEAR}"
        ));
    }
    if !(1..=12).contains(&month) {
        errors.push("month must be between 1 and 12".to_string());
    }

    if errors.is_empty() {
        Ok((year, month))
    } else {
        Err(AppError::validation(errors))
    }
}

/// Year query parameter alone, same defaulting and bounds.
pub fn resolve_query_year(year: Option<i32>) -> Result<i32, AppError> {
    let year = year.unwrap_or_else(|| Utc::now().year());
    if !(MIN_QUERY_YEAR..=MAX_QUERY_YEAR).contains(&year) {
        return Err(AppError::validation([format!(
            "year must be between {MIN_QUERY_YEAR} and {MAX_QUERY_YEAR}"
        )]));
    }

    Ok(year)
}
