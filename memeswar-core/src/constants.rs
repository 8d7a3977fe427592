//! Fixed values of the Memes War service contract and the bot's pacing.
//!
//! Anything the service dictates (paths, cookie name, status codes) lives
//! here so a contract change is a one-file diff.

// Service ------------------------------------------------------------------
pub const DEFAULT_BASE_URL: &str = "https://memes-war.memecore.com/api";
pub const SERVICE_ORIGIN: &str = "https://memes-war.memecore.com";
pub const SESSION_COOKIE_NAME: &str = "telegramInitData";
pub const INIT_DATA_USER_KEY: &str = "user";

// Status codes -------------------------------------------------------------
pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_NOT_FOUND: u16 = 404;
/// The service answers 409 when the action was already performed.
pub const STATUS_CONFLICT: u16 = 409;

// Pacing (seconds) ---------------------------------------------------------
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const ACCOUNT_DELAY_SECS: u64 = 5;
pub const QUEST_DELAY_SECS: u64 = 2;
pub const VERIFY_DELAY_SECS: u64 = 3;
pub const CYCLE_INTERVAL_SECS: u64 = 3600;

// Retry --------------------------------------------------------------------
pub const MAX_VALIDATION_ATTEMPTS: u32 = 3;
pub const BACKOFF_BASE: u64 = 2;

// Validation probes --------------------------------------------------------
pub const PROBE_QUEST_ID: u64 = 1;
pub const PROBE_REFERRAL_CODE: &str = "PROBE";
pub const PROBE_WARBOND_COUNT: u64 = 1;
