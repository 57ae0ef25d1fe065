// libs/appointment-cell/src/services/booking.rs
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::ClinicState;
use shared_models::appointment::{Appointment, AppointmentStatus, Department};
use shared_models::auth::SessionUser;
use shared_utils::validation::non_blank;

use crate::models::{
    AppointmentError, AppointmentFilter, AppointmentStats, AppointmentView, BookAppointmentRequest,
    BookingFormDefaults, DashboardStats,
};
use crate::services::lifecycle::{AppointmentLifecycleService, Transition};

/// Booking, listing and status changes for the signed-in user's appointments.
///
/// Every call reads the session from the given state; `today` is always passed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppointmentBookingService {
    lifecycle: AppointmentLifecycleService,
}

impl AppointmentBookingService {
    pub fn new() -> Self {
        Self {
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    pub fn book_appointment(
        &self,
        db: &mut ClinicState,
        request: BookAppointmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Appointment, AppointmentError> {
        let session = require_session(db)?;

        let time = non_blank(&request.time).ok_or(AppointmentError::MissingField { field: "time" })?;
        let reason = non_blank(&request.reason).ok_or(AppointmentError::MissingField { field: "reason" })?;

        info!(
            "Booking {} appointment for user {} on {} at {}",
            request.department, session.id, request.date, time
        );

        let appointment = Appointment {
            id: Uuid::new_v4(),
            user_id: session.id,
            patient_name: session.full_name,
            email: session.email,
            phone: session.phone,
            department: request.department,
            date: request.date,
            time: time.to_string(),
            reason: reason.to_string(),
            status: AppointmentStatus::Scheduled,
            booked_at: now,
        };

        db.insert_appointment(appointment.clone());

        info!("Appointment {} booked successfully", appointment.id);
        Ok(appointment)
    }

    pub fn booking_form(&self, db: &ClinicState, today: NaiveDate) -> Result<BookingFormDefaults, AppointmentError> {
        let session = require_session(db)?;

        Ok(BookingFormDefaults {
            patient_name: session.full_name,
            email: session.email,
            phone: session.phone,
            min_date: today,
            departments: self.departments(),
        })
    }

    pub fn departments(&self) -> Vec<Department> {
        Department::ALL.to_vec()
    }

    /// The session user's appointments matching `filter`, newest date first.
    /// Appointments on the same date keep booking order.
    pub fn list_appointments(
        &self,
        db: &ClinicState,
        filter: AppointmentFilter,
        today: NaiveDate,
    ) -> Result<Vec<AppointmentView>, AppointmentError> {
        let session = require_session(db)?;
        debug!("Listing {:?} appointments for user {}", filter, session.id);

        let mut appointments: Vec<Appointment> = db
            .appointments_for(&session.id)
            .filter(|apt| filter.matches(apt, today))
            .cloned()
            .collect();

        appointments.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(appointments
            .into_iter()
            .map(|apt| AppointmentView::new(apt, today))
            .collect())
    }

    pub fn cancel_appointment(
        &self,
        db: &mut ClinicState,
        appointment_id: Uuid,
        today: NaiveDate,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Cancelling appointment: {}", appointment_id);
        let appointment = self.transition(db, appointment_id, AppointmentStatus::Cancelled, today)?;

        info!("Appointment {} cancelled successfully", appointment_id);
        Ok(appointment)
    }

    pub fn complete_appointment(
        &self,
        db: &mut ClinicState,
        appointment_id: Uuid,
        today: NaiveDate,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Completing appointment: {}", appointment_id);
        let appointment = self.transition(db, appointment_id, AppointmentStatus::Completed, today)?;

        info!("Appointment {} completed", appointment_id);
        Ok(appointment)
    }

    pub fn get_appointment_stats(&self, db: &ClinicState, today: NaiveDate) -> Result<DashboardStats, AppointmentError> {
        let session = require_session(db)?;
        debug!("Calculating appointment statistics for user {}", session.id);

        let stats = db
            .appointments_for(&session.id)
            .fold(AppointmentStats::default(), |mut stats, apt| {
                stats.total_appointments += 1;
                if apt.is_upcoming(today) {
                    stats.upcoming_appointments += 1;
                }
                match apt.status {
                    AppointmentStatus::Completed => stats.completed_appointments += 1,
                    AppointmentStatus::Cancelled => stats.cancelled_appointments += 1,
                    AppointmentStatus::Scheduled => {}
                }
                stats
            });

        Ok(DashboardStats {
            first_name: session.first_name().to_string(),
            stats,
        })
    }

    /// Moves one of the session user's appointments to `new_status`. Appointments
    /// owned by someone else are reported as not found. Only `status` is written.
    fn transition(
        &self,
        db: &mut ClinicState,
        appointment_id: Uuid,
        new_status: AppointmentStatus,
        today: NaiveDate,
    ) -> Result<Appointment, AppointmentError> {
        let session = require_session(db)?;

        let appointment = db
            .find_appointment_mut(appointment_id)
            .filter(|apt| apt.is_owned_by(&session.id))
            .ok_or_else(|| {
                warn!("Appointment {} not found for user {}", appointment_id, session.id);
                AppointmentError::NotFound(appointment_id)
            })?;

        if self.lifecycle.validate_status_transition(appointment, new_status, today)? == Transition::Applied {
            appointment.status = new_status;
        }

        Ok(appointment.clone())
    }
}

fn require_session(db: &ClinicState) -> Result<SessionUser, AppointmentError> {
    db.session().cloned().ok_or(AppointmentError::NotSignedIn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_utils::test_utils::{parse_date, sample_appointment};

    fn signed_in(db: &mut ClinicState, id: &str) -> SessionUser {
        let user = SessionUser {
            id: id.to_string(),
            full_name: format!("{} Tester", id),
            email: format!("{}@example.com", id),
            phone: "+1555".to_string(),
        };
        db.set_session(user.clone());
        user
    }

    fn book_request(date: &str) -> BookAppointmentRequest {
        BookAppointmentRequest {
            department: Department::Neurology,
            date: parse_date(date),
            time: "09:30".to_string(),
            reason: "  Headaches ".to_string(),
        }
    }

    fn ids(views: &[AppointmentView]) -> Vec<NaiveDate> {
        views.iter().map(|v| v.appointment.date).collect()
    }

    /// User with {2024-01-01 Scheduled, 2024-12-31 Scheduled, 2023-06-01 Cancelled}.
    fn seeded() -> (ClinicState, SessionUser) {
        let mut db = ClinicState::new();
        let user = signed_in(&mut db, "alice");
        db.insert_appointment(sample_appointment(&user, "2024-01-01", AppointmentStatus::Scheduled));
        db.insert_appointment(sample_appointment(&user, "2024-12-31", AppointmentStatus::Scheduled));
        db.insert_appointment(sample_appointment(&user, "2023-06-01", AppointmentStatus::Cancelled));
        (db, user)
    }

    #[test]
    fn test_book_snapshots_session_identity() {
        let mut db = ClinicState::new();
        let user = signed_in(&mut db, "alice");
        let now = Utc::now();

        let apt = AppointmentBookingService::new()
            .book_appointment(&mut db, book_request("2024-07-01"), now)
            .unwrap();

        assert_eq!(apt.user_id, user.id);
        assert_eq!(apt.patient_name, user.full_name);
        assert_eq!(apt.email, user.email);
        assert_eq!(apt.phone, user.phone);
        assert_eq!(apt.reason, "Headaches");
        assert_eq!(apt.status, AppointmentStatus::Scheduled);
        assert_eq!(apt.booked_at, now);
        assert_eq!(db.appointments(), &[apt]);
    }

    #[test]
    fn test_book_without_session_creates_nothing() {
        let mut db = ClinicState::new();

        let result = AppointmentBookingService::new().book_appointment(&mut db, book_request("2024-07-01"), Utc::now());

        assert_matches!(result, Err(AppointmentError::NotSignedIn));
        assert!(db.appointments().is_empty());
    }

    #[test]
    fn test_book_allows_past_dates_and_double_booking() {
        let mut db = ClinicState::new();
        signed_in(&mut db, "alice");
        let service = AppointmentBookingService::new();

        service.book_appointment(&mut db, book_request("2020-01-01"), Utc::now()).unwrap();
        service.book_appointment(&mut db, book_request("2020-01-01"), Utc::now()).unwrap();

        assert_eq!(db.appointments().len(), 2);
    }

    #[test]
    fn test_book_requires_reason() {
        let mut db = ClinicState::new();
        signed_in(&mut db, "alice");
        let mut request = book_request("2024-07-01");
        request.reason = "   ".to_string();

        let result = AppointmentBookingService::new().book_appointment(&mut db, request, Utc::now());

        assert_eq!(result, Err(AppointmentError::MissingField { field: "reason" }));
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let (db, _) = seeded();
        let service = AppointmentBookingService::new();
        let today = parse_date("2024-06-01");

        let upcoming = service.list_appointments(&db, AppointmentFilter::Upcoming, today).unwrap();
        assert_eq!(ids(&upcoming), vec![parse_date("2024-12-31")]);

        let past = service.list_appointments(&db, AppointmentFilter::Past, today).unwrap();
        assert_eq!(ids(&past), vec![parse_date("2024-01-01"), parse_date("2023-06-01")]);

        let all = service.list_appointments(&db, AppointmentFilter::All, today).unwrap();
        assert_eq!(
            ids(&all),
            vec![parse_date("2024-12-31"), parse_date("2024-01-01"), parse_date("2023-06-01")]
        );
    }

    #[test]
    fn test_list_view_flags() {
        let (db, _) = seeded();
        let all = AppointmentBookingService::new()
            .list_appointments(&db, AppointmentFilter::All, parse_date("2024-06-01"))
            .unwrap();

        let flags: Vec<(bool, bool)> = all.iter().map(|v| (v.is_past, v.can_cancel)).collect();
        assert_eq!(flags, vec![(false, true), (true, false), (true, false)]);
    }

    #[test]
    fn test_list_sort_is_stable_for_same_date() {
        let mut db = ClinicState::new();
        let user = signed_in(&mut db, "alice");
        let first = sample_appointment(&user, "2024-07-01", AppointmentStatus::Scheduled);
        let second = sample_appointment(&user, "2024-07-01", AppointmentStatus::Scheduled);
        let (first_id, second_id) = (first.id, second.id);
        db.insert_appointment(first);
        db.insert_appointment(second);

        let all = AppointmentBookingService::new()
            .list_appointments(&db, AppointmentFilter::All, parse_date("2024-06-01"))
            .unwrap();

        let listed: Vec<Uuid> = all.iter().map(|v| v.appointment.id).collect();
        assert_eq!(listed, vec![first_id, second_id]);
    }

    #[test]
    fn test_list_is_isolated_per_user() {
        let (mut db, alice) = seeded();
        let bob = signed_in(&mut db, "bob");
        db.insert_appointment(sample_appointment(&bob, "2024-08-08", AppointmentStatus::Scheduled));
        let service = AppointmentBookingService::new();
        let today = parse_date("2024-06-01");

        let bobs = service.list_appointments(&db, AppointmentFilter::All, today).unwrap();
        assert_eq!(bobs.len(), 1);
        assert!(bobs.iter().all(|v| v.appointment.user_id == bob.id));

        db.set_session(alice.clone());
        let alices = service.list_appointments(&db, AppointmentFilter::All, today).unwrap();
        assert_eq!(alices.len(), 3);
        assert!(alices.iter().all(|v| v.appointment.user_id == alice.id));
    }

    #[test]
    fn test_cancel_changes_only_status() {
        let (mut db, _) = seeded();
        let before = db.appointments()[1].clone();

        let cancelled = AppointmentBookingService::new()
            .cancel_appointment(&mut db, before.id, parse_date("2024-06-01"))
            .unwrap();

        let expected = Appointment {
            status: AppointmentStatus::Cancelled,
            ..before
        };
        assert_eq!(cancelled, expected);
        assert_eq!(db.appointments().len(), 3);
        assert_eq!(db.find_appointment(expected.id), Some(&expected));
    }

    #[test]
    fn test_cancel_twice_is_harmless() {
        let (mut db, _) = seeded();
        let id = db.appointments()[2].id;
        let service = AppointmentBookingService::new();
        let today = parse_date("2024-06-01");

        let first = service.cancel_appointment(&mut db, id, today).unwrap();
        let second = service.cancel_appointment(&mut db, id, today).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn test_complete_twice_is_harmless() {
        let (mut db, _) = seeded();
        let id = db.appointments()[0].id;
        let service = AppointmentBookingService::new();
        let today = parse_date("2024-06-01");

        let first = service.complete_appointment(&mut db, id, today).unwrap();
        let second = service.complete_appointment(&mut db, id, today).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.status, AppointmentStatus::Completed);
        assert_eq!(db.find_appointment(id), Some(&second));
    }

    #[test]
    fn test_cancel_other_users_appointment_is_not_found() {
        let (mut db, _) = seeded();
        let id = db.appointments()[0].id;
        signed_in(&mut db, "mallory");

        let result = AppointmentBookingService::new().cancel_appointment(&mut db, id, parse_date("2024-06-01"));

        assert_eq!(result, Err(AppointmentError::NotFound(id)));
        assert_eq!(db.find_appointment(id).unwrap().status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn test_cancel_unknown_id() {
        let (mut db, _) = seeded();
        let id = Uuid::new_v4();

        let result = AppointmentBookingService::new().cancel_appointment(&mut db, id, parse_date("2024-06-01"));
        assert_eq!(result, Err(AppointmentError::NotFound(id)));
    }

    #[test]
    fn test_complete_and_stats() {
        let (mut db, _) = seeded();
        let service = AppointmentBookingService::new();
        let today = parse_date("2024-06-01");
        let held = db.appointments()[0].id;
        let future = db.appointments()[1].id;

        let before = service.get_appointment_stats(&db, today).unwrap();
        assert_eq!(
            before.stats,
            AppointmentStats {
                total_appointments: 3,
                upcoming_appointments: 1,
                completed_appointments: 0,
                cancelled_appointments: 1,
            }
        );
        assert_eq!(before.first_name, "alice");

        service.complete_appointment(&mut db, held, today).unwrap();
        assert_matches!(
            service.complete_appointment(&mut db, future, today),
            Err(AppointmentError::NotYetHeld(_))
        );

        let after = service.get_appointment_stats(&db, today).unwrap();
        assert_eq!(after.stats.completed_appointments, 1);
        assert_eq!(after.stats.upcoming_appointments, 1);
    }

    #[test]
    fn test_reads_require_session() {
        let db = ClinicState::new();
        let service = AppointmentBookingService::new();
        let today = parse_date("2024-06-01");

        assert_matches!(service.list_appointments(&db, AppointmentFilter::All, today), Err(AppointmentError::NotSignedIn));
        assert_matches!(service.get_appointment_stats(&db, today), Err(AppointmentError::NotSignedIn));
        assert_matches!(service.booking_form(&db, today), Err(AppointmentError::NotSignedIn));
    }

    #[test]
    fn test_booking_form_prefill() {
        let mut db = ClinicState::new();
        let user = signed_in(&mut db, "alice");

        let form = AppointmentBookingService::new()
            .booking_form(&db, parse_date("2024-06-01"))
            .unwrap();

        assert_eq!(form.patient_name, user.full_name);
        assert_eq!(form.min_date, parse_date("2024-06-01"));
        assert_eq!(form.departments.len(), 10);
        assert_eq!(form.departments[0], Department::GeneralMedicine);
    }
}
