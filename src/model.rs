//! Shared entity types as consumed by the client.
//!
//! All of these are owned and persisted by the backend; the client holds
//! only transient copies created on fetch and discarded on navigation.
//! Schemas are deliberately tolerant at the boundary (aliases, defaults)
//! because the backend payloads are loosely cased and omit optional fields.

use serde::{Deserialize, Serialize};

/// A bookable service offered by a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(alias = "service_id")]
    pub id: i64,
    pub name: String,
    /// Service length used to derive the appointment's expected end time.
    #[serde(alias = "durationMinutes", alias = "duration")]
    pub duration_minutes: i64,
    #[serde(alias = "priceUsd", alias = "price", default)]
    pub price_usd: f64,
}

/// An employee who can be booked at a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    #[serde(alias = "employeeId")]
    pub employee_id: i64,
    #[serde(alias = "firstName", alias = "first name")]
    pub first_name: String,
    #[serde(alias = "lastName", alias = "last name")]
    pub last_name: String,
    #[serde(default)]
    pub expertise: Option<String>,
    #[serde(alias = "businessId", default)]
    pub business_id: Option<i64>,
}

impl Worker {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A service category used for catalog browsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(alias = "category_id")]
    pub id: i64,
    pub name: String,
}

/// Appointment status is a string enumeration whose transitions are
/// entirely server-driven; unknown values are preserved rather than
/// rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    Other(String),
}

impl From<String> for AppointmentStatus {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "scheduled" => Self::Scheduled,
            "completed" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Other(s),
        }
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Scheduled => "Scheduled".to_string(),
            AppointmentStatus::Completed => "Completed".to_string(),
            AppointmentStatus::Cancelled => "Cancelled".to_string(),
            AppointmentStatus::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(alias = "appointment_id")]
    pub id: i64,
    #[serde(alias = "customerId", default)]
    pub customer_id: Option<i64>,
    #[serde(alias = "employeeId", alias = "eid")]
    pub employee_id: i64,
    #[serde(alias = "serviceId", alias = "sid")]
    pub service_id: i64,
    #[serde(alias = "businessId", default)]
    pub business_id: Option<i64>,
    #[serde(alias = "startTime")]
    pub start_time: String,
    #[serde(alias = "expectedEndTime", default)]
    pub expected_end_time: Option<String>,
    #[serde(default = "default_status")]
    pub status: AppointmentStatus,
}

fn default_status() -> AppointmentStatus {
    AppointmentStatus::Scheduled
}

/// What a loyalty threshold counts. Unknown program types fall back to
/// points semantics when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdType {
    #[serde(rename = "appts_thresh")]
    Appointments,
    #[serde(rename = "pdct_thresh")]
    Products,
    #[serde(rename = "points_thresh")]
    Points,
    #[serde(rename = "price_thresh")]
    Price,
    #[serde(other)]
    Unknown,
}

impl From<&str> for ThresholdType {
    fn from(s: &str) -> Self {
        match s {
            "appts_thresh" => Self::Appointments,
            "pdct_thresh" => Self::Products,
            "points_thresh" => Self::Points,
            "price_thresh" => Self::Price,
            _ => Self::Unknown,
        }
    }
}

/// Threshold-based reward rule ("after 10 appointments, one free").
/// The client renders these; it never evaluates eligibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyProgram {
    #[serde(alias = "thresholdType")]
    pub threshold_type: ThresholdType,
    #[serde(alias = "thresholdValue")]
    pub threshold_value: f64,
    #[serde(alias = "rewardType")]
    pub reward_type: String,
    #[serde(alias = "rewardValue")]
    pub reward_value: f64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Time-bounded discount rule, optionally recurring on weekdays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    #[serde(alias = "promotion_id", default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(alias = "discountAmount", alias = "amount", default)]
    pub discount_amount: f64,
    #[serde(default)]
    pub starts_on: Option<String>,
    #[serde(default)]
    pub ends_on: Option<String>,
    /// Weekday numbers the promotion recurs on, when recurring.
    #[serde(default)]
    pub weekdays: Vec<u8>,
}

/// Per-salon loyalty progress, purely a display projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardProgress {
    pub current: f64,
    pub goal: f64,
    #[serde(alias = "pointsBalance", default)]
    pub points_balance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appointment_status_from_str() {
        assert_eq!(
            AppointmentStatus::from("Scheduled".to_string()),
            AppointmentStatus::Scheduled
        );
        assert_eq!(
            AppointmentStatus::from("cancelled".to_string()),
            AppointmentStatus::Cancelled
        );
        assert_eq!(
            AppointmentStatus::from("NoShow".to_string()),
            AppointmentStatus::Other("NoShow".to_string())
        );
    }

    #[test]
    fn test_threshold_type_parsing() {
        assert_eq!(ThresholdType::from("appts_thresh"), ThresholdType::Appointments);
        assert_eq!(ThresholdType::from("price_thresh"), ThresholdType::Price);
        assert_eq!(ThresholdType::from("mystery_thresh"), ThresholdType::Unknown);

        let program: LoyaltyProgram = serde_json::from_str(
            r#"{"thresholdType":"pdct_thresh","thresholdValue":5,"rewardType":"free_product","rewardValue":1}"#,
        )
        .unwrap();
        assert_eq!(program.threshold_type, ThresholdType::Products);
    }

    #[test]
    fn test_service_accepts_camel_case() {
        let service: Service = serde_json::from_str(
            r#"{"id":12,"name":"Haircut","durationMinutes":45,"priceUsd":30.0}"#,
        )
        .unwrap();
        assert_eq!(service.duration_minutes, 45);
    }
}
