use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::ClinicState;
use shared_models::auth::{SessionUser, User};
use shared_utils::password::PasswordService;
use shared_utils::validation::{non_blank, validate_email};
use shared_utils::AppState;

use crate::models::{AuthError, LoginRequest, NewAccount, RegisterRequest, StoredCredentials};

pub const DEMO_USER_ID: &str = "demo-user";
pub const DEMO_USER_EMAIL: &str = "demo@medicare.com";
pub const DEMO_USER_PASSWORD: &str = "demo123";
const DEMO_USER_NAME: &str = "John Doe";
const DEMO_USER_PHONE: &str = "+1234567890";

/// Registration, login and the single active session.
///
/// Every operation works on a `ClinicState` borrowed by the caller, so the
/// service itself carries only the password policy. Registration and login are
/// also exposed as separate steps so callers can hash or verify passwords
/// without holding the state lock.
#[derive(Debug, Clone)]
pub struct AuthService {
    passwords: PasswordService,
    min_password_length: usize,
}

impl AuthService {
    pub fn new(state: &AppState) -> Self {
        Self::with_policy(state.passwords.clone(), state.config.min_password_length)
    }

    pub fn with_policy(passwords: PasswordService, min_password_length: usize) -> Self {
        Self {
            passwords,
            min_password_length,
        }
    }

    /// Creates the account and signs it in. On any error the state is left untouched.
    pub fn register(
        &self,
        db: &mut ClinicState,
        request: RegisterRequest,
        now: DateTime<Utc>,
    ) -> Result<SessionUser, AuthError> {
        let account = self.validate_registration(&request)?;
        self.check_email_available(db, &account.email)?;

        let password_hash = self.hash_password(&request.password)?;
        self.create_account(db, account, password_hash, now)
    }

    /// Field checks that need no state: required fields, email format,
    /// confirmation and length, in that order.
    pub fn validate_registration(&self, request: &RegisterRequest) -> Result<NewAccount, AuthError> {
        let full_name = non_blank(&request.full_name).ok_or(AuthError::MissingField { field: "full_name" })?;
        let email = non_blank(&request.email).ok_or(AuthError::MissingField { field: "email" })?;
        let phone = non_blank(&request.phone).ok_or(AuthError::MissingField { field: "phone" })?;

        debug!("Registering new user: {}", email);

        if !validate_email(email) {
            warn!("Registration rejected, invalid email: {}", email);
            return Err(AuthError::InvalidEmail);
        }

        if request.password != request.confirm_password {
            warn!("Registration rejected for {}: passwords do not match", email);
            return Err(AuthError::PasswordMismatch);
        }

        if request.password.chars().count() < self.min_password_length {
            warn!("Registration rejected for {}: password too short", email);
            return Err(AuthError::PasswordTooShort {
                min: self.min_password_length,
            });
        }

        Ok(NewAccount {
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        })
    }

    pub fn check_email_available(&self, db: &ClinicState, email: &str) -> Result<(), AuthError> {
        if db.find_user_by_email(email).is_some() {
            warn!("Registration rejected, email already registered: {}", email);
            return Err(AuthError::EmailAlreadyRegistered);
        }
        Ok(())
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        self.passwords
            .hash_password(password)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    /// Stores a validated account and signs it in. The email is checked again
    /// here since it may have been taken while the password was being hashed.
    pub fn create_account(
        &self,
        db: &mut ClinicState,
        account: NewAccount,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Result<SessionUser, AuthError> {
        self.check_email_available(db, &account.email)?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            full_name: account.full_name,
            email: account.email,
            phone: account.phone,
            password_hash,
            created_at: now,
        };
        let session = SessionUser::from(&user);

        db.insert_user(user);
        db.set_session(session.clone());

        info!("User {} registered and signed in", session.id);
        Ok(session)
    }

    /// Unknown email and wrong password fail identically. A failed attempt keeps
    /// whatever session was already active.
    pub fn login(&self, db: &mut ClinicState, request: LoginRequest) -> Result<SessionUser, AuthError> {
        let credentials = self.find_credentials(db, &request)?;
        self.check_password(&request.password, &credentials)?;
        self.start_session(db, &credentials)
    }

    pub fn find_credentials(&self, db: &ClinicState, request: &LoginRequest) -> Result<StoredCredentials, AuthError> {
        let email = request.email.trim();
        debug!("Login attempt for: {}", email);

        match db.find_user_by_email(email) {
            Some(user) => Ok(StoredCredentials {
                email: user.email.clone(),
                password_hash: user.password_hash.clone(),
            }),
            None => {
                warn!("Login failed for {}", email);
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    pub fn check_password(&self, password: &str, credentials: &StoredCredentials) -> Result<(), AuthError> {
        let verified = self
            .passwords
            .verify_password(password, &credentials.password_hash)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        if !verified {
            warn!("Login failed for {}", credentials.email);
            return Err(AuthError::InvalidCredentials);
        }

        Ok(())
    }

    /// Signs in the user owning `credentials`.
    pub fn start_session(&self, db: &mut ClinicState, credentials: &StoredCredentials) -> Result<SessionUser, AuthError> {
        let user = db
            .find_user_by_email(&credentials.email)
            .ok_or(AuthError::InvalidCredentials)?;

        let session = SessionUser::from(user);
        db.set_session(session.clone());

        info!("User {} signed in", session.id);
        Ok(session)
    }

    /// Always succeeds. Returns the user that was signed in, if any.
    pub fn logout(&self, db: &mut ClinicState) -> Option<SessionUser> {
        let previous = db.clear_session();

        match &previous {
            Some(user) => info!("User {} signed out", user.id),
            None => debug!("Logout with no active session"),
        }

        previous
    }

    pub fn current_session(&self, db: &ClinicState) -> Result<SessionUser, AuthError> {
        db.session().cloned().ok_or(AuthError::NotSignedIn)
    }

    /// Adds the demo account unless its email is already taken. Does not sign in.
    pub fn seed_demo_user(&self, db: &mut ClinicState, now: DateTime<Utc>) -> Result<(), AuthError> {
        if db.find_user_by_email(DEMO_USER_EMAIL).is_some() {
            debug!("Demo user already present");
            return Ok(());
        }

        let password_hash = self.hash_password(DEMO_USER_PASSWORD)?;

        db.insert_user(User {
            id: DEMO_USER_ID.to_string(),
            full_name: DEMO_USER_NAME.to_string(),
            email: DEMO_USER_EMAIL.to_string(),
            phone: DEMO_USER_PHONE.to_string(),
            password_hash,
            created_at: now,
        });

        info!("Seeded demo user {}", DEMO_USER_EMAIL);
        Ok(())
    }
}
