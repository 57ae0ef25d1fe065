use tracing::{debug, info_span};

use appointment_cell::services::AppointmentBookingService;
use auth_cell::models::SessionResponse;
use auth_cell::services::AuthService;
use shared_database::ClinicState;
use shared_models::error::AppError;
use shared_utils::{AppState, Clock};

use crate::commands::{Command, Outcome};

/// Routes each `Command` to exactly one service operation.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    auth: AuthService,
    appointments: AppointmentBookingService,
}

impl Dispatcher {
    pub fn new(state: &AppState) -> Self {
        Self::with_services(AuthService::new(state), AppointmentBookingService::new())
    }

    pub fn with_services(auth: AuthService, appointments: AppointmentBookingService) -> Self {
        Self { auth, appointments }
    }

    pub fn dispatch(&self, db: &mut ClinicState, command: Command, clock: &dyn Clock) -> Result<Outcome, AppError> {
        let _span = info_span!("dispatch", command = command.name()).entered();
        debug!("Dispatching command");

        let outcome = match command {
            Command::Register(request) => Outcome::Registered(self.auth.register(db, request, clock.now())?),
            Command::Login(request) => Outcome::LoggedIn(self.auth.login(db, request)?),
            Command::Logout => {
                self.auth.logout(db);
                Outcome::LoggedOut
            }
            Command::CurrentSession => Outcome::Session(SessionResponse::from(self.auth.current_session(db)?)),
            Command::Departments => Outcome::Departments(self.appointments.departments()),
            Command::BookingForm => Outcome::BookingForm(self.appointments.booking_form(db, clock.today())?),
            Command::Book(request) => {
                Outcome::Booked(self.appointments.book_appointment(db, request, clock.now())?)
            }
            Command::ListAppointments { filter } => {
                Outcome::Appointments(self.appointments.list_appointments(db, filter, clock.today())?)
            }
            Command::Cancel { appointment_id } => {
                Outcome::Cancelled(self.appointments.cancel_appointment(db, appointment_id, clock.today())?)
            }
            Command::Complete { appointment_id } => {
                Outcome::Completed(self.appointments.complete_appointment(db, appointment_id, clock.today())?)
            }
            Command::Dashboard => Outcome::Dashboard(self.appointments.get_appointment_stats(db, clock.today())?),
        };

        Ok(outcome)
    }
}
