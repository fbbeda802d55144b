use std::time::{SystemTime, UNIX_EPOCH};

use crate::shared::constants::STAMPED_EXTENSION;

/// Source of capture-time tokens for stamped filenames.
pub trait Clock: Send {
    /// Wall-clock nanoseconds since the Unix epoch.
    fn now_nanos(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}

/// Qualifies a base path with a unique capture-time suffix:
/// `dir/stem` becomes `dir/stem_<nanos>.avi`.
///
/// Tokens strictly increase across calls even if the clock stalls or
/// steps backwards, so two stamps from one namer never collide.
pub struct OutputFileNamer {
    clock: Box<dyn Clock>,
    last_token: Option<u64>,
}

impl OutputFileNamer {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            clock,
            last_token: None,
        }
    }

    pub fn stamp(&mut self, base_path: &str) -> String {
        let token = self.next_token();
        let (directory, stem) = split_base_path(base_path);
        format!("{directory}{stem}_{token}.{STAMPED_EXTENSION}")
    }

    fn next_token(&mut self) -> u64 {
        let now = self.clock.now_nanos();
        let token = match self.last_token {
            Some(last) if now <= last => last + 1,
            _ => now,
        };
        self.last_token = Some(token);
        token
    }
}

impl Default for OutputFileNamer {
    fn default() -> Self {
        Self::new(Box::new(SystemClock))
    }
}

/// Splits on the last `/` or `\`; the directory keeps its trailing separator.
fn split_base_path(base_path: &str) -> (&str, &str) {
    match base_path.rfind(|c| c == '/' || c == '\\') {
        Some(idx) => base_path.split_at(idx + 1),
        None => ("", base_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    struct FakeClock {
        now: Arc<AtomicU64>,
    }

    impl Clock for FakeClock {
        fn now_nanos(&self) -> u64 {
            self.now.load(Ordering::SeqCst)
        }
    }

    fn namer_at(nanos: u64) -> (OutputFileNamer, Arc<AtomicU64>) {
        let now = Arc::new(AtomicU64::new(nanos));
        let clock = FakeClock { now: now.clone() };
        (OutputFileNamer::new(Box::new(clock)), now)
    }

    #[test]
    fn test_stamp_keeps_directory() {
        let (mut namer, _) = namer_at(1_700_000_000_123_456_789);
        assert_eq!(
            namer.stamp("/a/b/clip"),
            "/a/b/clip_1700000000123456789.avi"
        );
    }

    #[test]
    fn test_stamp_without_directory() {
        let (mut namer, _) = namer_at(42);
        assert_eq!(namer.stamp("output"), "output_42.avi");
    }

    #[test]
    fn test_stamp_windows_separator() {
        let (mut namer, _) = namer_at(7);
        assert_eq!(namer.stamp("C:\\videos\\run"), "C:\\videos\\run_7.avi");
    }

    #[test]
    fn test_stamp_trailing_separator_gives_empty_stem() {
        let (mut namer, _) = namer_at(7);
        assert_eq!(namer.stamp("/tmp/"), "/tmp/_7.avi");
    }

    #[test]
    fn test_tokens_differ_at_different_times() {
        let (mut namer, now) = namer_at(1_000);
        let first = namer.stamp("/a/b/clip");
        now.store(2_000, Ordering::SeqCst);
        let second = namer.stamp("/a/b/clip");
        assert!(first.starts_with("/a/b/clip_"));
        assert!(second.ends_with(".avi"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_tokens_strictly_increase_when_clock_stalls() {
        let (mut namer, now) = namer_at(500);
        assert_eq!(namer.stamp("x"), "x_500.avi");
        assert_eq!(namer.stamp("x"), "x_501.avi");
        now.store(100, Ordering::SeqCst);
        assert_eq!(namer.stamp("x"), "x_502.avi");
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_nanos() > 1_577_836_800_000_000_000);
    }
}
