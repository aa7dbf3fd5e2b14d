// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://www.whitehouse.gov/presidential-actions/";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";
pub const TIMEOUT_SECS: u64 = 10;

// Persisted store
pub const CSV_FILE: &str = "executive_orders.csv";

// Retry
pub const RETRIES: u32 = 3;
pub const INITIAL_DELAY_MS: u64 = 1_000;
pub const BACKOFF_FACTOR: u32 = 2;
pub const MAX_DELAY_MS: u64 = 30_000;

// Scrape
pub const REQUEST_PAUSE_MS: u64 = 1_000; // be polite
pub const MAX_PAGES: usize = 500; // listing pagination safety cap

// Verification
pub const MIN_BODY_CHARS: usize = 1;
pub const VERIFY_MARKERS: &[&str] = &[
    "executive-orders",
    "executive order",
    "by the authority vested in me",
];

// Environment overrides
pub const ENV_URL: &str = "EO_SCRAPE_URL";
pub const ENV_CSV: &str = "EO_SCRAPE_CSV";
pub const ENV_RETRIES: &str = "EO_SCRAPE_RETRIES";
pub const ENV_PAUSE_MS: &str = "EO_SCRAPE_PAUSE_MS";
pub const ENV_MAX_PAGES: &str = "EO_SCRAPE_MAX_PAGES";
