//! Appointment booking flow.
//!
//! One `BookingFlow` backs one modal instance:
//! `Closed -> LoadingCatalog -> Ready -> Submitting -> (Closed on success |
//! Ready with error)`, and reopening always resets to `LoadingCatalog`.
//!
//! The slot fetch fires only when worker, date and service are all set;
//! changing any of the three clears the slot list and the selection.
//! Every slot request carries a sequence number plus the exact input
//! tuple that produced it, and a response whose tag no longer matches the
//! current inputs is discarded, so a rapid sequence of input changes
//! cannot let a stale response overwrite a newer one.
//!
//! Each fetch failure is terminal for its field: empty list, inline
//! error, no retry. The user re-triggers by re-selecting inputs or
//! reopening.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::{debug, warn};

use crate::backend::appointments::NewAppointment;
use crate::backend::Backend;
use crate::error::ApiError;
use crate::model::{Appointment, Service, Worker};

/// Seam between the flow and the REST client, so tests can script
/// responses without a server.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    async fn list_services(&self, business_id: i64) -> Result<Vec<Service>, ApiError>;
    async fn list_workers(&self, business_id: i64) -> Result<Vec<Worker>, ApiError>;
    async fn available_slots(
        &self,
        employee_id: i64,
        date: NaiveDate,
        duration_minutes: i64,
    ) -> Result<Vec<String>, ApiError>;
    async fn create_appointment(
        &self,
        request: &NewAppointment,
    ) -> Result<Option<Appointment>, ApiError>;
}

#[async_trait]
impl BookingBackend for Backend {
    async fn list_services(&self, business_id: i64) -> Result<Vec<Service>, ApiError> {
        Backend::list_services(self, business_id).await
    }

    async fn list_workers(&self, business_id: i64) -> Result<Vec<Worker>, ApiError> {
        Backend::list_workers(self, business_id).await
    }

    async fn available_slots(
        &self,
        employee_id: i64,
        date: NaiveDate,
        duration_minutes: i64,
    ) -> Result<Vec<String>, ApiError> {
        Backend::available_slots(self, employee_id, date, duration_minutes).await
    }

    async fn create_appointment(
        &self,
        request: &NewAppointment,
    ) -> Result<Option<Appointment>, ApiError> {
        Backend::create_appointment(self, request).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    LoadingCatalog,
    Ready,
    Submitting,
}

/// The exact inputs a slot request was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotQuery {
    pub employee_id: i64,
    pub date: NaiveDate,
    pub duration_minutes: i64,
}

/// Tag handed out when a slot request begins; must match the current
/// state for its response to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequest {
    seq: u64,
    pub query: SlotQuery,
}

/// Per-field inline errors, terminal until the user re-triggers the
/// fetch.
#[derive(Debug, Clone, Default)]
pub struct FieldErrors {
    pub services: Option<String>,
    pub workers: Option<String>,
    pub slots: Option<String>,
    pub submit: Option<String>,
}

pub struct BookingFlow<B> {
    backend: B,
    phase: Phase,
    business_id: i64,
    services: Vec<Service>,
    workers: Vec<Worker>,
    selected_service: Option<i64>,
    selected_worker: Option<i64>,
    /// Set when the worker came pre-selected via deep link; the field is
    /// then non-editable.
    worker_locked: bool,
    date: Option<NaiveDate>,
    slots: Vec<String>,
    selected_slot: Option<String>,
    slot_seq: u64,
    errors: FieldErrors,
}

impl<B: BookingBackend> BookingFlow<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            phase: Phase::Closed,
            business_id: 0,
            services: Vec::new(),
            workers: Vec::new(),
            selected_service: None,
            selected_worker: None,
            worker_locked: false,
            date: None,
            slots: Vec::new(),
            selected_slot: None,
            slot_seq: 0,
            errors: FieldErrors::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn selected_slot(&self) -> Option<&str> {
        self.selected_slot.as_deref()
    }

    pub fn worker_locked(&self) -> bool {
        self.worker_locked
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Open the modal for a business. Services and workers load in
    /// parallel with no ordering relationship; either may resolve first.
    /// A failed fetch leaves that field's list empty with an inline
    /// error. A pre-selected worker (deep link from a profile page) is
    /// preserved and the worker field locked rather than defaulted.
    pub async fn open(&mut self, business_id: i64, preselected_worker: Option<i64>) {
        // Reopening always resets.
        self.phase = Phase::LoadingCatalog;
        self.business_id = business_id;
        self.services.clear();
        self.workers.clear();
        self.selected_service = None;
        self.selected_worker = None;
        self.worker_locked = false;
        self.date = None;
        self.slots.clear();
        self.selected_slot = None;
        self.slot_seq += 1;
        self.errors = FieldErrors::default();

        let (services, workers) = tokio::join!(
            self.backend.list_services(business_id),
            self.backend.list_workers(business_id),
        );

        match services {
            Ok(services) => self.services = services,
            Err(e) => self.errors.services = Some(e.to_string()),
        }
        match workers {
            Ok(workers) => self.workers = workers,
            Err(e) => self.errors.workers = Some(e.to_string()),
        }

        if let Some(employee_id) = preselected_worker {
            self.selected_worker = Some(employee_id);
            self.worker_locked = true;
        }

        self.phase = Phase::Ready;
    }

    pub fn close(&mut self) {
        self.phase = Phase::Closed;
    }

    pub fn select_service(&mut self, service_id: i64) -> Result<(), ApiError> {
        if !self.services.iter().any(|s| s.id == service_id) {
            return Err(ApiError::validation("service", "unknown service"));
        }
        self.selected_service = Some(service_id);
        self.invalidate_slots();
        Ok(())
    }

    pub fn select_worker(&mut self, employee_id: i64) -> Result<(), ApiError> {
        if self.worker_locked {
            return Err(ApiError::validation("worker", "worker is fixed for this booking"));
        }
        if !self.workers.iter().any(|w| w.employee_id == employee_id) {
            return Err(ApiError::validation("worker", "unknown worker"));
        }
        self.selected_worker = Some(employee_id);
        self.invalidate_slots();
        Ok(())
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
        self.invalidate_slots();
    }

    pub fn select_slot(&mut self, slot: &str) -> Result<(), ApiError> {
        if !self.slots.iter().any(|s| s == slot) {
            return Err(ApiError::validation("slot", "not an offered slot"));
        }
        self.selected_slot = Some(slot.to_string());
        Ok(())
    }

    /// Any dependency change clears the slot list immediately, preventing
    /// a stale-slot submission, and invalidates in-flight requests.
    fn invalidate_slots(&mut self) {
        self.slots.clear();
        self.selected_slot = None;
        self.errors.slots = None;
        self.slot_seq += 1;
    }

    /// The current slot-query inputs, present only when worker, date and
    /// service are all chosen.
    fn slot_query(&self) -> Option<SlotQuery> {
        let employee_id = self.selected_worker?;
        let date = self.date?;
        let service = self.selected_service_ref()?;
        Some(SlotQuery {
            employee_id,
            date,
            duration_minutes: service.duration_minutes,
        })
    }

    fn selected_service_ref(&self) -> Option<&Service> {
        let id = self.selected_service?;
        self.services.iter().find(|s| s.id == id)
    }

    /// Start a slot request. Returns `None` while the dependencies are
    /// not all set (the fetch must not fire).
    pub fn begin_slot_request(&mut self) -> Option<SlotRequest> {
        let query = self.slot_query()?;
        self.slot_seq += 1;
        Some(SlotRequest {
            seq: self.slot_seq,
            query,
        })
    }

    /// Apply a slot response. Discards it (returning `false`) when the
    /// tag no longer matches the current inputs, i.e. the response is
    /// stale. The first returned slot becomes the default selection -- a
    /// convenience, not a guarantee it is still available at submit time.
    pub fn apply_slot_response(
        &mut self,
        request: &SlotRequest,
        result: Result<Vec<String>, ApiError>,
    ) -> bool {
        if request.seq != self.slot_seq || self.slot_query().as_ref() != Some(&request.query) {
            warn!(seq = request.seq, current = self.slot_seq, "discarding stale slot response");
            return false;
        }
        match result {
            Ok(slots) => {
                self.selected_slot = slots.first().cloned();
                self.slots = slots;
                self.errors.slots = None;
            }
            Err(e) => {
                self.slots.clear();
                self.selected_slot = None;
                self.errors.slots = Some(e.to_string());
            }
        }
        true
    }

    /// Fetch slots for the current inputs, if all are set. Returns
    /// whether a fetch fired.
    pub async fn refresh_slots(&mut self) -> bool {
        let Some(request) = self.begin_slot_request() else {
            debug!("slot refresh skipped, dependencies incomplete");
            return false;
        };
        let result = self
            .backend
            .available_slots(
                request.query.employee_id,
                request.query.date,
                request.query.duration_minutes,
            )
            .await;
        self.apply_slot_response(&request, result);
        true
    }

    /// Submit the booking. Client-side validation short-circuits before
    /// any network call. On success the modal closes and the confirmation
    /// is returned exactly once; on rejection (e.g. the slot raced away)
    /// the flow returns to `Ready` holding the backend's message verbatim
    /// and nothing is applied optimistically.
    pub async fn submit(&mut self) -> Result<Option<Appointment>, ApiError> {
        if self.phase != Phase::Ready {
            return Err(ApiError::validation("booking", "not ready to submit"));
        }
        let service = self
            .selected_service_ref()
            .ok_or_else(|| ApiError::validation("service", "required"))?
            .clone();
        let employee_id = self
            .selected_worker
            .ok_or_else(|| ApiError::validation("worker", "required"))?;
        let date = self
            .date
            .ok_or_else(|| ApiError::validation("date", "required"))?;
        let slot = self
            .selected_slot
            .clone()
            .ok_or_else(|| ApiError::validation("slot", "required"))?;

        let start = NaiveTime::parse_from_str(&slot, "%H:%M")
            .map(|time| date.and_time(time))
            .map_err(|_| ApiError::validation("slot", format!("unusable slot token {slot:?}")))?;
        // End time derives from the chosen service's real duration.
        let end = start + Duration::minutes(service.duration_minutes);

        let request = NewAppointment {
            sid: service.id,
            eid: employee_id,
            business_id: self.business_id,
            start_time: start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            expected_end_time: end.format("%Y-%m-%dT%H:%M:%S").to_string(),
        };

        self.phase = Phase::Submitting;
        self.errors.submit = None;
        match self.backend.create_appointment(&request).await {
            Ok(confirmation) => {
                self.phase = Phase::Closed;
                Ok(confirmation)
            }
            Err(e) => {
                self.phase = Phase::Ready;
                self.errors.submit = Some(e.to_string());
                Err(e)
            }
        }
    }
}
