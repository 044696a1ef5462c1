// tests/support/mocks/time.rs
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use platform_oidc::application::ports::time::Clock;
use std::sync::Mutex;

/// Fixed timestamp shared by every test.
static FIXED_NOW: Lazy<DateTime<Utc>> = Lazy::new(|| {
    DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
        .expect("invalid RFC3339 in tests/support/mocks/time.rs")
        .with_timezone(&Utc)
});

pub fn fixed_now() -> DateTime<Utc> {
    *FIXED_NOW
}

/// Wall clock. Tokens are checked for expiry against real time by the
/// signer, so end-to-end flows that verify tokens need it.
pub struct RealClock;

impl Clock for RealClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock the test can move forward, starting at the real current time.
pub struct SteppingClock {
    now: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc::now()),
        }
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().expect("clock mutex");
        *guard += by;
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex")
    }
}
