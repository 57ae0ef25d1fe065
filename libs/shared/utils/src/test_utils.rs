use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::appointment::{Appointment, AppointmentStatus, Department};
use shared_models::auth::{SessionUser, User};

use crate::clock::{Clock, FixedClock};
use crate::state::AppState;

pub struct TestConfig {
    pub min_password_length: usize,
    pub seed_demo_user: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            min_password_length: 6,
            seed_demo_user: false,
        }
    }
}

impl TestConfig {
    /// Cheapest Argon2 parameters so tests do not spend their time hashing.
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            min_password_length: self.min_password_length,
            seed_demo_user: self.seed_demo_user,
            argon2_memory_kib: 8,
            argon2_iterations: 1,
            ..AppConfig::default()
        }
    }
}

/// Empty state whose clock is pinned to noon UTC on `today` (`YYYY-MM-DD`).
pub fn test_state(today: &str) -> Arc<AppState> {
    let clock = FixedClock::on(parse_date(today));
    test_state_with(TestConfig::default(), clock)
}

pub fn test_state_with(config: TestConfig, clock: impl Clock + 'static) -> Arc<AppState> {
    Arc::new(AppState::new(config.to_app_config(), Arc::new(clock)).expect("test argon2 params are valid"))
}

pub fn parse_date(date: &str) -> NaiveDate {
    date.parse().expect("test dates are YYYY-MM-DD")
}

pub struct TestUser {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new("Jane Patient", "jane@example.com")
    }
}

impl TestUser {
    pub fn new(full_name: &str, email: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: "+15550001111".to_string(),
            password: "secret123".to_string(),
        }
    }

    pub fn register_body(&self) -> Value {
        json!({
            "full_name": self.full_name,
            "email": self.email,
            "phone": self.phone,
            "password": self.password,
            "confirm_password": self.password
        })
    }

    pub fn login_body(&self) -> Value {
        json!({
            "email": self.email,
            "password": self.password
        })
    }

    pub fn to_user(&self, state: &AppState) -> User {
        User {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            password_hash: state
                .passwords
                .hash_password(&self.password)
                .expect("hashing succeeds with test params"),
            created_at: state.clock.now(),
        }
    }

    /// Stores the user without signing in.
    pub async fn insert(&self, state: &AppState) -> SessionUser {
        let user = self.to_user(state);
        let session = SessionUser::from(&user);
        state.db.write().await.insert_user(user);
        session
    }

    /// Stores the user and makes it the active session.
    pub async fn insert_signed_in(&self, state: &AppState) -> SessionUser {
        let session = self.insert(state).await;
        state.db.write().await.set_session(session.clone());
        session
    }
}

/// Builds an appointment owned by `owner` without going through the booking service.
pub fn sample_appointment(owner: &SessionUser, date: &str, status: AppointmentStatus) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        user_id: owner.id.clone(),
        patient_name: owner.full_name.clone(),
        email: owner.email.clone(),
        phone: owner.phone.clone(),
        department: Department::GeneralMedicine,
        date: parse_date(date),
        time: "10:00".to_string(),
        reason: "Routine checkup".to_string(),
        status,
        booked_at: chrono::Utc::now(),
    }
}
