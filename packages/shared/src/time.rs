//! Time helpers behind a clock abstraction so room timestamps are testable.

use chrono::{DateTime, Utc};

/// Source of "now" for anything that stamps domain objects.
pub trait Clock: Send + Sync {
    /// Current Unix time in milliseconds.
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        current_timestamp_millis()
    }
}

/// Clock frozen at a fixed instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_millis: i64,
}

impl FixedClock {
    pub fn new(fixed_millis: i64) -> Self {
        Self { fixed_millis }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_millis
    }
}

/// Current Unix time in milliseconds (UTC).
pub fn current_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render Unix milliseconds as RFC 3339 (UTC).
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis).map(|dt| dt.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic_enough() {
        // テスト項目: SystemClock が呼び出すたびに減少しないタイムスタンプを返す
        // given (前提条件):
        let clock = SystemClock;

        // when (操作):
        let first = clock.now_millis();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = clock.now_millis();

        // then (期待する結果):
        assert!(first > 0);
        assert!(second >= first);
    }

    #[test]
    fn test_fixed_clock_never_moves() {
        // テスト項目: FixedClock は常に同じ値を返す
        // given (前提条件):
        let clock = FixedClock::new(1_700_000_000_000);

        // when (操作):
        let readings = [clock.now_millis(), clock.now_millis()];

        // then (期待する結果):
        assert_eq!(readings, [1_700_000_000_000, 1_700_000_000_000]);
    }

    #[test]
    fn test_timestamp_to_rfc3339() {
        // テスト項目: ミリ秒タイムスタンプが UTC の RFC 3339 文字列になる
        // given (前提条件):
        let timestamp = 1_672_531_200_123; // 2023-01-01T00:00:00.123Z

        // when (操作):
        let rendered = timestamp_to_rfc3339(timestamp);

        // then (期待する結果):
        let rendered = rendered.expect("timestamp should be representable");
        assert!(rendered.starts_with("2023-01-01T00:00:00.123"));
        assert!(rendered.ends_with("+00:00"));
    }

    #[test]
    fn test_timestamp_to_rfc3339_out_of_range() {
        // テスト項目: 表現できないタイムスタンプは None になる
        // given (前提条件):
        let timestamp = i64::MAX;

        // when (操作):
        let rendered = timestamp_to_rfc3339(timestamp);

        // then (期待する結果):
        assert!(rendered.is_none());
    }
}
