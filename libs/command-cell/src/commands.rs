use serde::{Deserialize, Serialize};
use uuid::Uuid;

use appointment_cell::models::{
    AppointmentFilter, AppointmentView, BookAppointmentRequest, BookingFormDefaults, DashboardStats,
};
use auth_cell::models::{LoginRequest, RegisterRequest, SessionResponse};
use shared_models::appointment::{Appointment, Department};
use shared_models::auth::SessionUser;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Register(RegisterRequest),
    Login(LoginRequest),
    Logout,
    CurrentSession,
    Departments,
    BookingForm,
    Book(BookAppointmentRequest),
    ListAppointments {
        #[serde(default)]
        filter: AppointmentFilter,
    },
    Cancel {
        appointment_id: Uuid,
    },
    Complete {
        appointment_id: Uuid,
    },
    Dashboard,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Register(_) => "register",
            Command::Login(_) => "login",
            Command::Logout => "logout",
            Command::CurrentSession => "current_session",
            Command::Departments => "departments",
            Command::BookingForm => "booking_form",
            Command::Book(_) => "book",
            Command::ListAppointments { .. } => "list_appointments",
            Command::Cancel { .. } => "cancel",
            Command::Complete { .. } => "complete",
            Command::Dashboard => "dashboard",
        }
    }

    /// Whether dispatching can change the state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Register(_)
                | Command::Login(_)
                | Command::Logout
                | Command::Book(_)
                | Command::Cancel { .. }
                | Command::Complete { .. }
        )
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum Outcome {
    Registered(SessionUser),
    LoggedIn(SessionUser),
    LoggedOut,
    Session(SessionResponse),
    Departments(Vec<Department>),
    BookingForm(BookingFormDefaults),
    Booked(Appointment),
    Appointments(Vec<AppointmentView>),
    Cancelled(Appointment),
    Completed(Appointment),
    Dashboard(DashboardStats),
}
