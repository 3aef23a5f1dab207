use crate::errors::{AppError, AppResult};
use crate::models::TimeWindow;
use chrono::{DateTime, Duration, Utc};

/// Computes the sequence of fixed-size, half-open windows covering
/// `[start, now)`.
///
/// Windows are non-overlapping and contiguous: each window is
/// `[current, current + window_minutes)`, except the last, which is clipped
/// to `now` so the sequence never overshoots. The computation is pure —
/// given the same `start`, `now` and window size it always produces the
/// same boundaries.
///
/// A `start` at or after `now` yields an empty sequence; that is not an
/// error (the caller exports zero records).
///
/// # Errors
///
/// Returns `InvalidInput` if `window_minutes` is not positive.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use nse_cli::export::windows::compute_windows;
///
/// # fn main() -> Result<(), nse_cli::errors::AppError> {
/// let start = Utc.with_ymd_and_hms(2025, 10, 31, 12, 0, 0).unwrap();
/// let now = Utc.with_ymd_and_hms(2025, 10, 31, 13, 5, 0).unwrap();
/// let windows = compute_windows(start, now, 30)?;
///
/// assert_eq!(windows.len(), 3);
/// assert_eq!(windows[2].to, now);
/// # Ok(())
/// # }
/// ```
pub fn compute_windows(
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    window_minutes: i64,
) -> AppResult<Vec<TimeWindow>> {
    if window_minutes <= 0 {
        return Err(AppError::InvalidInput(format!(
            "Window size must be positive, got {window_minutes} minutes"
        )));
    }

    let step = Duration::minutes(window_minutes);
    let mut windows = Vec::new();
    let mut current = start;

    while current < now {
        let end = std::cmp::min(current + step, now);
        windows.push(TimeWindow {
            from: current,
            to: end,
        });
        current += step;
    }

    Ok(windows)
}
