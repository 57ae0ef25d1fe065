use tracing::debug;
use uuid::Uuid;

use shared_models::appointment::Appointment;
use shared_models::auth::{SessionUser, User};

/// Whole-process application data: users, appointments and the single active session.
///
/// Both tables are insertion ordered and only ever grow. Lookups are linear scans.
#[derive(Debug, Default, Clone)]
pub struct ClinicState {
    users: Vec<User>,
    appointments: Vec<Appointment>,
    session: Option<SessionUser>,
}

impl ClinicState {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------- users

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Exact, case-sensitive match on the stored email.
    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.email == email)
    }

    pub fn insert_user(&mut self, user: User) {
        debug!("Inserting user {}", user.id);
        self.users.push(user);
    }

    // --------------------------------------------------------- appointments

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn appointments_for<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a Appointment> + 'a {
        self.appointments.iter().filter(move |a| a.is_owned_by(user_id))
    }

    pub fn find_appointment(&self, id: Uuid) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    pub fn find_appointment_mut(&mut self, id: Uuid) -> Option<&mut Appointment> {
        self.appointments.iter_mut().find(|a| a.id == id)
    }

    pub fn insert_appointment(&mut self, appointment: Appointment) {
        debug!("Inserting appointment {} for user {}", appointment.id, appointment.user_id);
        self.appointments.push(appointment);
    }

    // -------------------------------------------------------------- session

    pub fn session(&self) -> Option<&SessionUser> {
        self.session.as_ref()
    }

    pub fn set_session(&mut self, user: SessionUser) {
        self.session = Some(user);
    }

    pub fn clear_session(&mut self) -> Option<SessionUser> {
        self.session.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared_models::appointment::{AppointmentStatus, Department};

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            full_name: "Test User".to_string(),
            email: email.to_string(),
            phone: "555".to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    fn appointment(user_id: &str) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            patient_name: "Test User".to_string(),
            email: "t@example.com".to_string(),
            phone: "555".to_string(),
            department: Department::Dental,
            date: "2024-03-01".parse().unwrap(),
            time: "09:00".to_string(),
            reason: "Cleaning".to_string(),
            status: AppointmentStatus::Scheduled,
            booked_at: Utc::now(),
        }
    }

    #[test]
    fn test_email_lookup_is_case_sensitive() {
        let mut state = ClinicState::new();
        state.insert_user(user("a", "Ada@Example.com"));

        assert!(state.find_user_by_email("Ada@Example.com").is_some());
        assert!(state.find_user_by_email("ada@example.com").is_none());
    }

    #[test]
    fn test_appointments_for_filters_by_owner() {
        let mut state = ClinicState::new();
        state.insert_appointment(appointment("a"));
        state.insert_appointment(appointment("b"));
        state.insert_appointment(appointment("a"));

        assert_eq!(state.appointments_for("a").count(), 2);
        assert_eq!(state.appointments_for("b").count(), 1);
        assert_eq!(state.appointments_for("c").count(), 0);
    }

    #[test]
    fn test_find_appointment_mut_updates_in_place() {
        let mut state = ClinicState::new();
        let apt = appointment("a");
        let id = apt.id;
        state.insert_appointment(apt);

        state.find_appointment_mut(id).unwrap().status = AppointmentStatus::Cancelled;

        assert_eq!(state.appointments().len(), 1);
        assert_eq!(state.find_appointment(id).unwrap().status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn test_session_lifecycle() {
        let mut state = ClinicState::new();
        assert!(state.session().is_none());

        let stored = user("a", "a@example.com");
        state.set_session(SessionUser::from(&stored));
        assert_eq!(state.session().map(|s| s.id.as_str()), Some("a"));

        assert!(state.clear_session().is_some());
        assert!(state.session().is_none());
        assert!(state.clear_session().is_none());
    }
}
