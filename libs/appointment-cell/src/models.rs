// libs/appointment-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentStatus, Department};
use shared_models::error::AppError;

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub department: Department,
    pub date: NaiveDate,
    pub time: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentFilter {
    #[default]
    All,
    Upcoming,
    Past,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment, today: NaiveDate) -> bool {
        match self {
            AppointmentFilter::All => true,
            AppointmentFilter::Upcoming => appointment.is_upcoming(today),
            AppointmentFilter::Past => appointment.is_past(today),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAppointmentsQuery {
    pub filter: Option<AppointmentFilter>,
}

/// A listed appointment plus the flags a client needs to render it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub is_past: bool,
    pub can_cancel: bool,
}

impl AppointmentView {
    pub fn new(appointment: Appointment, today: NaiveDate) -> Self {
        let is_past = appointment.is_past(today);
        let can_cancel = appointment.status == AppointmentStatus::Scheduled && !is_past;

        Self {
            appointment,
            is_past,
            can_cancel,
        }
    }
}

/// Prefill values for the booking form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingFormDefaults {
    pub patient_name: String,
    pub email: String,
    pub phone: String,
    pub min_date: NaiveDate,
    pub departments: Vec<Department>,
}

// ==============================================================================
// STATISTICS MODELS
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentStats {
    pub total_appointments: usize,
    pub upcoming_appointments: usize,
    pub completed_appointments: usize,
    pub cancelled_appointments: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub first_name: String,
    #[serde(flatten)]
    pub stats: AppointmentStats,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppointmentError {
    #[error("Please login first")]
    NotSignedIn,

    #[error("Appointment not found: {0}")]
    NotFound(Uuid),

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("Appointment cannot move from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Appointment on {0} has not taken place yet")]
    NotYetHeld(NaiveDate),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotSignedIn => AppError::SessionRequired,
            AppointmentError::NotFound(id) => AppError::not_found(id),
            AppointmentError::MissingField { field } => AppError::validation(field, "is required"),
            AppointmentError::InvalidStatusTransition { .. } => AppError::validation("status", err.to_string()),
            AppointmentError::NotYetHeld(_) => AppError::validation("date", err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_parsing() {
        let filter: AppointmentFilter = serde_json::from_value(json!("upcoming")).unwrap();
        assert_eq!(filter, AppointmentFilter::Upcoming);
        assert_eq!(AppointmentFilter::default(), AppointmentFilter::All);
        assert!(serde_json::from_value::<AppointmentFilter>(json!("someday")).is_err());
    }

    #[test]
    fn test_book_request_accepts_department_label() {
        let request: BookAppointmentRequest = serde_json::from_value(json!({
            "department": "ENT (Ear, Nose, Throat)",
            "date": "2024-07-01",
            "time": "14:00",
            "reason": "Ear ache"
        }))
        .unwrap();

        assert_eq!(request.department, Department::Ent);
        assert_eq!(request.date.to_string(), "2024-07-01");
    }

    #[test]
    fn test_error_mapping() {
        let id = Uuid::new_v4();
        assert_eq!(AppError::from(AppointmentError::NotFound(id)), AppError::not_found(id));
        assert_eq!(AppError::from(AppointmentError::NotSignedIn), AppError::SessionRequired);
        assert_eq!(
            AppError::from(AppointmentError::InvalidStatusTransition {
                from: AppointmentStatus::Completed,
                to: AppointmentStatus::Cancelled,
            }),
            AppError::validation("status", "Appointment cannot move from Completed to Cancelled")
        );
    }
}
