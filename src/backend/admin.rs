//! Admin analytics fetchers.
//!
//! The dashboards fire their metric endpoints in parallel; a single
//! failing metric degrades to its zero value instead of taking the whole
//! dashboard down. Chart rendering is out of scope, only the fetch/shape
//! layer lives here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::{coerce_array, Backend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    fn query(&self) -> [(&'static str, String); 2] {
        [
            ("from", self.from.format("%Y-%m-%d").to_string()),
            ("to", self.to.format("%Y-%m-%d").to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCount {
    pub name: String,
    pub count: i64,
}

/// One dashboard load's worth of metrics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardMetrics {
    pub revenue: f64,
    pub appointments_booked: i64,
    pub appointments_completed: i64,
    pub new_customers: i64,
    pub top_services: Vec<ServiceCount>,
}

impl Backend {
    /// Load the admin dashboard. All metric endpoints run concurrently;
    /// each failure is logged and that metric reports zero.
    pub async fn load_dashboard(&self, range: DateRange) -> DashboardMetrics {
        let query = range.query();
        let (revenue, booked, completed, customers, top_services) = tokio::join!(
            self.metric_number("/admin/revenue", &query, "revenue"),
            self.metric_count("/admin/appointments-booked", &query, "count"),
            self.metric_count("/admin/appointments-completed", &query, "count"),
            self.metric_count("/admin/new-customers", &query, "count"),
            self.metric_list("/admin/top-services", &query, "services"),
        );

        DashboardMetrics {
            revenue,
            appointments_booked: booked,
            appointments_completed: completed,
            new_customers: customers,
            top_services,
        }
    }

    async fn metric_number(&self, path: &str, query: &[(&str, String)], key: &str) -> f64 {
        match self.get_envelope_query(path, query).await {
            Ok(body) => number_field(&body, key),
            Err(e) => {
                warn!(path, error = %e, "dashboard metric failed, reporting zero");
                0.0
            }
        }
    }

    async fn metric_count(&self, path: &str, query: &[(&str, String)], key: &str) -> i64 {
        match self.get_envelope_query(path, query).await {
            Ok(body) => count_field(&body, key),
            Err(e) => {
                warn!(path, error = %e, "dashboard metric failed, reporting zero");
                0
            }
        }
    }

    async fn metric_list(
        &self,
        path: &str,
        query: &[(&str, String)],
        key: &str,
    ) -> Vec<ServiceCount> {
        match self.get_envelope_query(path, query).await {
            Ok(body) => coerce_array(body.get(key)),
            Err(e) => {
                warn!(path, error = %e, "dashboard metric failed, reporting empty");
                Vec::new()
            }
        }
    }
}

fn number_field(body: &Value, key: &str) -> f64 {
    body.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

/// Counts are parsed as integers outright; a fractional or overflowing
/// value reports zero instead of silently truncating.
fn count_field(body: &Value, key: &str) -> i64 {
    body.get(key).and_then(Value::as_i64).unwrap_or(0)
}
