//! Shared defaults for the telemetry pipeline
//!
//! Values mirror what collectors built for this envelope format expect, so
//! changing them changes observable batching behavior.

/// Records buffered before the debounce flush is allowed to deliver a batch
pub const DEFAULT_CACHE_NUM: usize = 50;

/// Trailing-debounce quiet window in milliseconds
///
/// Every buffered send restarts this window. The flush only happens once no
/// new record arrived for this long AND the buffer reached `cache_num`.
pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 3_000;

/// Default capacity of the breadcrumb ring
pub const DEFAULT_MAX_BREADCRUMBS: usize = 10;

/// Sampling rate that activates every plugin
pub const DEFAULT_SAMPLE: f64 = 100.0;

/// Stack frames kept per parsed error
pub const STACKTRACE_LIMIT: usize = 10;

/// Length of generated envelope and user ids
pub const UNIQUE_ID_LEN: usize = 16;

/// Requests failing with status 0 faster than this are treated as unreachable
/// (cross-origin or DNS), slower ones as timeouts.
pub const CROSS_ORIGIN_THRESHOLD_MS: u64 = 3_000;

/// Device store key holding the persisted user id
pub const USER_ID_KEY: &str = "uuid";

/// Prefix applied to every device store key
pub const STORE_PREFIX: &str = "ktelemetry";

pub const SDK_NAME: &str = env!("CARGO_PKG_NAME");
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Content type used by the request transport
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Content type used by the beacon transport (beacons post plain text bodies)
pub const BEACON_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

/// Upper bound on a single delivery request
pub const DELIVERY_TIMEOUT_SECS: u64 = 10;

/// Process exit status used after an interrupt-triggered flush (128 + SIGINT)
pub const INTERRUPT_EXIT_CODE: i32 = 130;

/// Query parameter carrying the envelope on the pixel transport
pub const PIXEL_QUERY_PARAM: &str = "data";
