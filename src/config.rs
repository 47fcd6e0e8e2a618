//! Runtime configuration for the Metro Empire server.

use once_cell::sync::Lazy;
use std::env;

#[derive(Debug)]
pub struct Settings {
    /// Origin allowed by the CORS layer (`*` or an exact origin).
    pub allowed_origin: String,
    /// How many times a handler re-runs its read-modify-write loop when the
    /// versioned row commit loses a race.
    pub commit_retries: u32,
}

impl Settings {
    fn from_env() -> Self {
        let allowed_origin = env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "*".into());

        let commit_retries = env::var("COMMIT_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        Settings {
            allowed_origin,
            commit_retries,
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
