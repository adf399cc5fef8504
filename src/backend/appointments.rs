//! Appointment endpoints: open slots, booking, notes, before/after images.
//!
//! A slot is an opaque "HH:MM" token computed entirely server-side; the
//! client never assumes one stays available between fetch and submit. A
//! rejected booking surfaces the backend's message verbatim and is never
//! retried.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ApiError;
use crate::model::Appointment;

use super::{coerce_array, Backend};

/// Booking request body. Field names follow the backend's wire contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAppointment {
    /// Service id.
    pub sid: i64,
    /// Employee id.
    pub eid: i64,
    pub business_id: i64,
    /// Composite local timestamp, `YYYY-MM-DDTHH:MM:SS`.
    pub start_time: String,
    pub expected_end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentNote {
    #[serde(alias = "note_id", default)]
    pub id: Option<i64>,
    #[serde(alias = "text", alias = "body")]
    pub content: String,
    #[serde(alias = "createdAt", default)]
    pub created_at: Option<String>,
}

/// Before/after image descriptor; the bytes live behind `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentImage {
    #[serde(alias = "image_id", default)]
    pub id: Option<i64>,
    pub url: String,
    /// "before" or "after"; anything else renders unlabeled.
    #[serde(default)]
    pub kind: Option<String>,
}

impl Backend {
    /// Open start times for a worker on a date, for a service of the given
    /// length. Entirely computed server-side; returned order is preserved.
    pub async fn available_slots(
        &self,
        employee_id: i64,
        date: NaiveDate,
        duration_minutes: i64,
    ) -> Result<Vec<String>, ApiError> {
        let body = self
            .get_envelope_query(
                &format!("/api/employee/{employee_id}/available-slots"),
                &[
                    ("date", date.format("%Y-%m-%d").to_string()),
                    ("duration", duration_minutes.to_string()),
                ],
            )
            .await?;
        Ok(coerce_array(body.get("slots")))
    }

    /// Book an appointment. The backend serializes concurrent bookings;
    /// losing the race comes back as a `Backend` rejection with the
    /// server's message.
    pub async fn create_appointment(
        &self,
        request: &NewAppointment,
    ) -> Result<Option<Appointment>, ApiError> {
        let body = self
            .post_envelope("/api/client/create-appointment", request)
            .await?;
        // Some deployments echo the created appointment, some return only
        // the envelope. Either is a success.
        Ok(body
            .get("appointment")
            .and_then(|v| serde_json::from_value(v.clone()).ok()))
    }

    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        let body = self.get_envelope("/api/client/appointments").await?;
        Ok(coerce_array(
            body.get("appointments").or_else(|| body.get("data")),
        ))
    }

    pub async fn appointment_notes(
        &self,
        appointment_id: i64,
    ) -> Result<Vec<AppointmentNote>, ApiError> {
        let body = self
            .get_envelope(&format!("/api/appointments/{appointment_id}/notes"))
            .await?;
        Ok(coerce_array(body.get("notes")))
    }

    pub async fn add_appointment_note(
        &self,
        appointment_id: i64,
        content: &str,
    ) -> Result<(), ApiError> {
        if content.trim().is_empty() {
            return Err(ApiError::validation("note", "cannot be empty"));
        }
        self.post_envelope(
            &format!("/api/appointments/{appointment_id}/notes"),
            &serde_json::json!({ "content": content }),
        )
        .await?;
        Ok(())
    }

    /// List before/after images for an appointment. `view` is the owning
    /// view's cancellation token: a response that arrives after the view
    /// went away is dropped, not applied.
    pub async fn appointment_images(
        &self,
        appointment_id: i64,
        view: &CancellationToken,
    ) -> Result<Vec<AppointmentImage>, ApiError> {
        let path = format!("/api/appointments/{appointment_id}/images");
        let body = tokio::select! {
            body = self.get_envelope(&path) => body?,
            _ = view.cancelled() => {
                debug!(appointment_id, "image listing dropped, view gone");
                return Ok(Vec::new());
            }
        };
        Ok(coerce_array(body.get("images")))
    }

    /// Fetch one image's bytes. The only call in the client with an
    /// explicit request timeout.
    pub async fn fetch_image(
        &self,
        image: &AppointmentImage,
        view: &CancellationToken,
    ) -> Result<Option<Vec<u8>>, ApiError> {
        let url = self.url(&image.url)?;
        let request = self.raw_get(url, self.image_timeout());

        let response = tokio::select! {
            response = request.send() => response.map_err(ApiError::Network)?,
            _ = view.cancelled() => return Ok(None),
        };
        if !response.status().is_success() {
            return Err(ApiError::Status {
                status: response.status().as_u16(),
            });
        }

        let bytes = tokio::select! {
            bytes = response.bytes() => bytes.map_err(ApiError::Network)?,
            _ = view.cancelled() => return Ok(None),
        };
        Ok(Some(bytes.to_vec()))
    }

    /// Fetch every listed image concurrently. Entries the view outlived
    /// are simply absent from the result.
    pub async fn fetch_images(
        &self,
        images: &[AppointmentImage],
        view: &CancellationToken,
    ) -> Result<Vec<Vec<u8>>, ApiError> {
        let results = futures::future::join_all(
            images.iter().map(|image| self.fetch_image(image, view)),
        )
        .await;

        let mut bytes = Vec::new();
        for result in results {
            if let Some(image) = result? {
                bytes.push(image);
            }
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_appointment_wire_shape() {
        let request = NewAppointment {
            sid: 12,
            eid: 7,
            business_id: 5,
            start_time: "2025-11-01T10:00:00".to_string(),
            expected_end_time: "2025-11-01T10:45:00".to_string(),
        };
        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire["sid"], 12);
        assert_eq!(wire["eid"], 7);
        assert_eq!(wire["start_time"], "2025-11-01T10:00:00");
    }

    #[test]
    fn test_note_accepts_text_alias() {
        let note: AppointmentNote =
            serde_json::from_str(r#"{"note_id": 3, "text": "trim shorter next time"}"#).unwrap();
        assert_eq!(note.content, "trim shorter next time");
    }
}
