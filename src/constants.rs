// API endpoint paths, joined onto the configured base URL
pub const LOGIN_PATH: &str = "/cvcue/keyLogin";
pub const SESSION_LIST_PATH: &str = "/api/session.list";
pub const STATS_GET_PATH: &str = "/api/stats.get";
pub const SEGMENT_LIST_PATH: &str = "/api/config.segment.list";
pub const CLIENT_GET_PATH: &str = "/api/identity.client.get";

// Required environment variables
pub const ENV_KEY_ID: &str = "NSE_KEY_ID";
pub const ENV_KEY_VALUE: &str = "NSE_KEY_VALUE";
pub const ENV_ORG_ID: &str = "NSE_ORG_ID";
pub const ENV_BASE_URL: &str = "NSE_BASE_URL";

// Query defaults
pub const DEFAULT_WINDOW_MINUTES: i64 = 30;
pub const DEFAULT_HOURS_BACK: i64 = 6;
pub const DEFAULT_STATS_HOURS_BACK: i64 = 24;
pub const DEFAULT_CLIENTS_HOURS_BACK: i64 = 24;
// The session endpoint caps a page at 1000 records
pub const DEFAULT_PAGE_LIMIT: usize = 1000;
// Flat delay between successive API calls, not adaptive backoff
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 200;
pub const DEFAULT_ENRICH_DELAY_MS: u64 = 50;

pub const LOGIN_TIMEOUT_SECS: u64 = 30;
pub const QUERY_TIMEOUT_SECS: u64 = 60;

pub const FAILED_STATUS: &str = "failed";
pub const NETWORK_ACCESS_SESSION_TYPE: &str = "network_access";
pub const DEFAULT_OUTPUT_DIR: &str = "data/exports";

// Statistic types queried by the stats export
pub const STATS_TYPES: &[&str] = &[
    "stats.count.users",
    "stats.count.clients",
    "stats.count.nads",
    "hourly.auth.count",
    "daily.topN.auth.errors",
    "daily.topN.locations.failed",
];

// Columns promoted to the front of the clients CSV
pub const CLIENT_PRIORITY_COLUMNS: &[&str] = &[
    "mac",
    "username",
    "userID",
    "deviceType",
    "description",
    "ip",
    "nadName",
    "segmentName",
    "location",
    "lastAuthAt",
    "cert_expiry",
];

// Export kind aliases
pub const SESSIONS_ALIASES: &[&str] = &["sessions", "sess", "s"];
pub const STATS_ALIASES: &[&str] = &["stats", "st"];
pub const CLIENTS_ALIASES: &[&str] = &["clients", "cl", "c"];
