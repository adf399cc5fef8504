//! Catalog fetchers: services, workers, categories.
//!
//! Read paths feed the booking flow; the CRUD entry points are
//! pass-throughs for the owner management pages. No caching: every call
//! reflects the backend's current state and a failed fetch leaves the
//! caller's list empty.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::model::{Category, Service, Worker};

use super::{coerce_array, required_field, Backend};

/// Payload for creating or updating a service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInput {
    pub name: String,
    pub duration_minutes: i64,
    pub price_usd: f64,
}

impl Backend {
    pub async fn list_services(&self, business_id: i64) -> Result<Vec<Service>, ApiError> {
        let body = self
            .get_envelope(&format!("/api/business/{business_id}/services"))
            .await?;
        Ok(coerce_array(list_payload(&body, "services")))
    }

    pub async fn list_workers(&self, business_id: i64) -> Result<Vec<Worker>, ApiError> {
        let body = self
            .get_envelope(&format!("/api/business/{business_id}/available-workers"))
            .await?;
        Ok(coerce_array(list_payload(&body, "workers")))
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let body = self.get_envelope("/api/categories").await?;
        Ok(coerce_array(list_payload(&body, "categories")))
    }

    pub async fn create_service(
        &self,
        business_id: i64,
        input: &ServiceInput,
    ) -> Result<Service, ApiError> {
        let body = self
            .post_envelope(&format!("/api/business/{business_id}/services"), input)
            .await?;
        required_field(&body, "service")
    }

    pub async fn update_service(
        &self,
        service_id: i64,
        input: &ServiceInput,
    ) -> Result<Service, ApiError> {
        let body = self
            .put_envelope(&format!("/api/services/{service_id}"), input)
            .await?;
        required_field(&body, "service")
    }

    pub async fn delete_service(&self, service_id: i64) -> Result<(), ApiError> {
        self.delete_envelope(&format!("/api/services/{service_id}"))
            .await?;
        Ok(())
    }
}

/// Lists arrive under a named key or, from older endpoints, as the whole
/// payload under `data`.
fn list_payload<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get(key).or_else(|| body.get("data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_payload_prefers_named_key() {
        let body = json!({"status": "success", "services": [1], "data": [2]});
        assert_eq!(list_payload(&body, "services"), Some(&json!([1])));
    }

    #[test]
    fn test_list_payload_falls_back_to_data() {
        let body = json!({"status": "success", "data": [{"id": 1, "name": "Cuts"}]});
        let categories: Vec<Category> = coerce_array(list_payload(&body, "categories"));
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Cuts");
    }

    #[test]
    fn test_malformed_worker_rows_are_dropped() {
        let body = json!({
            "status": "success",
            "workers": [
                {"employeeId": 7, "firstName": "Max", "lastName": "Lee"},
                {"broken": true}
            ]
        });
        let workers: Vec<Worker> = coerce_array(list_payload(&body, "workers"));
        assert_eq!(workers.len(), 1);
        assert_eq!(workers[0].employee_id, 7);
    }
}
