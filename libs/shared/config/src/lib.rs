use std::env;
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;
pub const DEFAULT_ARGON2_MEMORY_KIB: u32 = 19_456;
pub const DEFAULT_ARGON2_ITERATIONS: u32 = 2;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub seed_demo_user: bool,
    pub min_password_length: usize,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            seed_demo_user: true,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            argon2_memory_kib: DEFAULT_ARGON2_MEMORY_KIB,
            argon2_iterations: DEFAULT_ARGON2_ITERATIONS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            host: parse_or("HOST", env::var("HOST").ok(), defaults.host),
            port: parse_or("PORT", env::var("PORT").ok(), defaults.port),
            seed_demo_user: parse_or(
                "SEED_DEMO_USER",
                env::var("SEED_DEMO_USER").ok(),
                defaults.seed_demo_user,
            ),
            min_password_length: parse_or(
                "MIN_PASSWORD_LENGTH",
                env::var("MIN_PASSWORD_LENGTH").ok(),
                defaults.min_password_length,
            ),
            argon2_memory_kib: parse_or(
                "ARGON2_MEMORY_KIB",
                env::var("ARGON2_MEMORY_KIB").ok(),
                defaults.argon2_memory_kib,
            ),
            argon2_iterations: parse_or(
                "ARGON2_ITERATIONS",
                env::var("ARGON2_ITERATIONS").ok(),
                defaults.argon2_iterations,
            ),
        };

        if config.min_password_length == 0 {
            warn!("MIN_PASSWORD_LENGTH is 0, any password will be accepted");
        }

        config
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parses an optional raw value, falling back to `default` when it is unset or malformed.
fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Display,
{
    match raw {
        None => default,
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("{} has invalid value {:?}, using default {}", key, value, default);
                default
            }
        },
    }
}
