use std::sync::Arc;

use tokio::sync::RwLock;

use shared_config::AppConfig;
use shared_database::ClinicState;

use crate::clock::{Clock, SystemClock};
use crate::password::PasswordService;

/// Router state shared by every cell.
///
/// All domain data lives in one `ClinicState`. Mutating handlers hold the write
/// guard for the whole operation, so operations never interleave.
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: RwLock<ClinicState>,
    pub clock: Arc<dyn Clock>,
    pub passwords: PasswordService,
}

impl AppState {
    pub fn new(config: AppConfig, clock: Arc<dyn Clock>) -> Result<Self, argon2::Error> {
        let passwords = PasswordService::from_config(&config)?;

        Ok(Self {
            config: Arc::new(config),
            db: RwLock::new(ClinicState::new()),
            clock,
            passwords,
        })
    }

    pub fn with_system_clock(config: AppConfig) -> Result<Self, argon2::Error> {
        Self::new(config, Arc::new(SystemClock))
    }
}
