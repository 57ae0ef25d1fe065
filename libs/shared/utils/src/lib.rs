pub mod blocking;
pub mod clock;
pub mod extractor;
pub mod password;
pub mod state;
pub mod test_utils;
pub mod validation;

pub use blocking::run_blocking;
pub use clock::{Clock, FixedClock, SystemClock};
pub use state::AppState;
