use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserYearQuota {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub related_year: String,          // four-digit year, checked in the schema
    pub vacation_days: BigDecimal,     // NUMERIC(5,1)
    pub home_office_days: BigDecimal,  // NUMERIC(5,1)
    pub created_at: DateTime<Utc>,     // TIMESTAMPTZ
    pub updated_at: DateTime<Utc>,     // TIMESTAMPTZ
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaInitEntry {
    pub user_id: Uuid,
    pub vacation_days: Option<BigDecimal>,
    pub home_office_days: Option<BigDecimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitQuotasInput {
    pub related_year: Option<String>,
    pub entries: Vec<QuotaInitEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetQuotaInput {
    pub vacation_days: BigDecimal,
    pub home_office_days: BigDecimal,
}
