pub mod auth;

pub use auth::{AuthService, DEMO_USER_EMAIL, DEMO_USER_ID, DEMO_USER_PASSWORD};
