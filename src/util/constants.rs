// logmonitor - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "logmonitor";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Monitoring defaults
// =============================================================================

/// Log file monitored when no --path flag is given.
pub const DEFAULT_LOG_PATH: &str = "/tmp/access.log";

/// Default frame duration — the window over which per-frame stats are
/// computed and the dashboard refreshed.
pub const DEFAULT_FRAME_DURATION_SECS: u64 = 10;

/// Default alert observation window.
pub const DEFAULT_ALERT_PERIOD_SECS: u64 = 120;

/// Default request-per-second threshold above which the alert fires.
pub const DEFAULT_ALERT_THRESHOLD: u64 = 10;

/// Smallest accepted frame duration. Frame rates are integer requests per
/// whole second, so sub-second frames would divide by zero.
pub const MIN_FRAME_DURATION_SECS: u64 = 1;

// =============================================================================
// Tail reader limits
// =============================================================================

/// How long a single `TailReader::next()` call waits for a new line before
/// reporting "no data yet" (ms). Bounds the async buffer's stop latency.
pub const TAIL_READ_TIMEOUT_MS: u64 = 100;

/// How often the tail reader re-stats the file while waiting for data (ms).
pub const TAIL_POLL_INTERVAL_MS: u64 = 25;

/// Maximum bytes read from the file in one poll tick. Prevents a large
/// burst of writes from stalling the read loop.
pub const MAX_TAIL_READ_BYTES_PER_TICK: usize = 512 * 1024; // 512 KiB

/// Upper bound on the carried partial-line buffer. A file that never emits
/// a newline (binary content, a pathological line) is truncated at this
/// size rather than growing the buffer without limit.
pub const MAX_TAIL_PARTIAL_BYTES: usize = 1024 * 1024; // 1 MiB

// =============================================================================
// Scheduler
// =============================================================================

/// Idle sleep inside the frame poll loop once the frame's snapshot has been
/// emitted (ms). Keeps CPU usage bounded without delaying the snapshot.
pub const SCHEDULER_IDLE_TICK_MS: u64 = 20;

// =============================================================================
// Dashboard
// =============================================================================

/// How often the dashboard polls for input and redraws (ms).
pub const REDRAW_INTERVAL_MS: u64 = 250;

/// Number of past frames shown in the req/s bar chart.
pub const RATE_HISTORY_LEN: usize = 12;

/// Maximum number of sections listed in the "Most hits" panel.
pub const MAX_SECTIONS_SHOWN: usize = 10;

/// Number of alert transition messages kept in the alert panel.
pub const ALERT_LOG_CAPACITY: usize = 5;

// =============================================================================
// Logging
// =============================================================================

/// Default log level when RUST_LOG is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Best-effort process error-log file. The dashboard owns the terminal, so
/// diagnostics go to a file; stderr is the fallback when it cannot be opened.
pub const ERROR_LOG_PATH: &str = "/var/log/http_log_monitor.log";
