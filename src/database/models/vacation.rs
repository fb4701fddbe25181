use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lifecycle::SoftDelete;
use super::macros::string_enum;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VacationRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub requested_day: NaiveDate,         // DATE
    pub start_time: Option<NaiveTime>,    // TIME
    pub end_time: Option<NaiveTime>,      // TIME
    pub vacation_type: VacationType,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,         // TIMESTAMPTZ
    pub updated_at: DateTime<Utc>,         // TIMESTAMPTZ
    pub deleted_at: Option<DateTime<Utc>>, // TIMESTAMPTZ
}

impl SoftDelete for VacationRequest {
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }
}

impl VacationRequest {
    pub fn is_approved(&self) -> bool {
        self.approved_at.is_some()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVacationInput {
    pub group_id: Uuid,
    pub requested_day: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub vacation_type: Option<VacationType>,
}

string_enum! {
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum VacationType {
        Vacation => "VACATION",
        HomeOffice => "HOME_OFFICE",
        Sick => "SICK",
        BankHoliday => "BANK_HOLIDAY",
        NonPaidLeave => "NON_PAID_LEAVE",
        PaidTimeOff => "PAID_TIME_OFF",
        SickLeave => "SICK_LEAVE",
        StudyLeave => "STUDY_LEAVE",
        Other => "OTHER",
    }
}

impl Default for VacationType {
    fn default() -> Self {
        VacationType::Vacation
    }
}
