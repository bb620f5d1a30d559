// Time Provider Port
// Clock source for message log timestamps

/// Clock the supervisor stamps each captured output line with
pub trait TimeProvider: Send + Sync {
    /// Milliseconds since the unix epoch, recorded as `at_ms` on each
    /// log entry
    fn now_millis(&self) -> i64;
}

/// Wall clock provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
