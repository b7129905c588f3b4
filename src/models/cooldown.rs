use serde::{Deserialize, Serialize};

/// Email cooldown record, one row per address
///
/// Written only after a confirmed successful send; a request arriving before
/// the window elapses is rejected without contacting the mail provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownRecord {
    /// When the last email to this address was sent (Unix timestamp)
    pub last_email_sent_at: i64,
}

/// Outcome of a cooldown check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownStatus {
    pub blocked: bool,
    pub remaining_seconds: i64,
}

impl CooldownRecord {
    /// Compute the cooldown state at `now` for the given window
    pub fn check(&self, now: i64, window_secs: i64) -> CooldownStatus {
        let elapsed = now - self.last_email_sent_at;
        let remaining_seconds = (window_secs - elapsed).max(0);
        CooldownStatus {
            blocked: remaining_seconds > 0,
            remaining_seconds,
        }
    }

    /// Whether the window has fully elapsed, making the row stale
    pub fn is_expired(&self, now: i64, window_secs: i64) -> bool {
        !self.check(now, window_secs).blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: i64 = 60;

    #[test]
    fn test_blocked_inside_window() {
        let record = CooldownRecord {
            last_email_sent_at: 1_000_000,
        };

        let status = record.check(1_000_030, WINDOW);
        assert!(status.blocked);
        assert_eq!(status.remaining_seconds, 30);
    }

    #[test]
    fn test_blocked_immediately_after_send() {
        let record = CooldownRecord {
            last_email_sent_at: 1_000_000,
        };

        let status = record.check(1_000_000, WINDOW);
        assert!(status.blocked);
        assert_eq!(status.remaining_seconds, WINDOW);
    }

    #[test]
    fn test_allowed_at_window_boundary() {
        let record = CooldownRecord {
            last_email_sent_at: 1_000_000,
        };

        let status = record.check(1_000_060, WINDOW);
        assert!(!status.blocked);
        assert_eq!(status.remaining_seconds, 0);
    }

    #[test]
    fn test_allowed_after_window() {
        let record = CooldownRecord {
            last_email_sent_at: 1_000_000,
        };

        let status = record.check(1_000_061, WINDOW);
        assert!(!status.blocked);
        assert_eq!(status.remaining_seconds, 0);
        assert!(record.is_expired(1_000_061, WINDOW));
    }

    #[test]
    fn test_clock_skew_stays_blocked() {
        // A record from the future (clock rollback) must not unlock early
        let record = CooldownRecord {
            last_email_sent_at: 1_000_100,
        };

        let status = record.check(1_000_000, WINDOW);
        assert!(status.blocked);
        assert!(status.remaining_seconds > WINDOW);
    }
}
