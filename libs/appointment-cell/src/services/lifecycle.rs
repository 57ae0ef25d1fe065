// libs/appointment-cell/src/services/lifecycle.rs
use chrono::NaiveDate;
use tracing::{debug, warn};

use shared_models::appointment::{Appointment, AppointmentStatus};

use crate::models::AppointmentError;

/// Outcome of a permitted status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// Target equals the current status. Nothing to write.
    Unchanged,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        appointment: &Appointment,
        new_status: AppointmentStatus,
        today: NaiveDate,
    ) -> Result<Transition, AppointmentError> {
        let current_status = appointment.status;
        debug!("Validating status transition from {:?} to {:?}", current_status, new_status);

        if current_status == new_status {
            return Ok(Transition::Unchanged);
        }

        if !self.get_valid_transitions(current_status).contains(&new_status) {
            warn!("Invalid status transition attempted: {:?} -> {:?}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }

        // A visit can only be completed once its day has arrived.
        if new_status == AppointmentStatus::Completed && appointment.date > today {
            warn!("Refusing to complete appointment {} dated {}", appointment.id, appointment.date);
            return Err(AppointmentError::NotYetHeld(appointment.date));
        }

        Ok(Transition::Applied)
    }

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(&self, current_status: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Scheduled => vec![
                AppointmentStatus::Cancelled,
                AppointmentStatus::Completed,
            ],
            // Terminal states - no transitions allowed
            AppointmentStatus::Completed => vec![],
            AppointmentStatus::Cancelled => vec![],
        }
    }
}
