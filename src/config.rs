use std::env;

/// Configuration loaded from environment variables
pub struct Config {
    pub default_region: String,
    pub refresh_interval_ms: u64,
    pub rng_seed: Option<u64>,
    pub users_file: String,
    pub mpesa_base_url: String,
    pub mpesa_consumer_key: String,
    pub mpesa_consumer_secret: String,
    pub mpesa_shortcode: String,
    pub mpesa_passkey: String,
    pub mpesa_callback_url: String,
    pub rust_log: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Gateway credentials default to empty strings; without them the
    /// gateway rejects auth and the dashboard runs on simulated data.
    pub fn from_env() -> Self {
        Self {
            default_region: env::var("DEFAULT_REGION").unwrap_or_else(|_| "Nairobi".to_string()),
            refresh_interval_ms: env::var("REFRESH_INTERVAL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5000),
            rng_seed: env::var("RNG_SEED").ok().and_then(|s| s.parse().ok()),
            users_file: env::var("USERS_FILE").unwrap_or_else(|_| "users.json".to_string()),
            mpesa_base_url: env::var("MPESA_BASE_URL")
                .unwrap_or_else(|_| "https://sandbox.safaricom.co.ke".to_string()),
            mpesa_consumer_key: env::var("MPESA_CONSUMER_KEY").unwrap_or_default(),
            mpesa_consumer_secret: env::var("MPESA_CONSUMER_SECRET").unwrap_or_default(),
            // Public sandbox test shortcode
            mpesa_shortcode: env::var("MPESA_SHORTCODE").unwrap_or_else(|_| "174379".to_string()),
            mpesa_passkey: env::var("MPESA_PASSKEY").unwrap_or_default(),
            mpesa_callback_url: env::var("MPESA_CALLBACK_URL")
                .unwrap_or_else(|_| "https://example.com/mpesa_callback".to_string()),
            rust_log: env::var("RUST_LOG").ok(),
        }
    }
}
