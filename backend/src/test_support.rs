//! Test utilities shared by unit tests (in `src/`) and integration tests
//! (in `tests/`). Compiled only for tests or with the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::{TokenCodec, TokenConfig};

/// Signing secret used by test token codecs.
pub const TEST_SECRET: &str = "test-signing-secret-with-enough-entropy";

/// 2026-01-01T00:00:00Z, the default starting instant for test clocks.
pub fn fixture_instant() -> DateTime<Utc> {
    match DateTime::from_timestamp(1_767_225_600, 0) {
        Some(instant) => instant,
        None => panic!("fixture instant is representable"),
    }
}

/// Clock whose reading only changes when a test advances it.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Clock starting at [`fixture_instant`].
    pub fn at_fixture_instant() -> Arc<Self> {
        Arc::new(Self::new(fixture_instant()))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Token codec signing with [`TEST_SECRET`] and HS256 against `clock`.
pub fn test_token_codec(clock: Arc<dyn Clock>) -> TokenCodec {
    let config = match TokenConfig::new(TEST_SECRET, "HS256") {
        Ok(config) => config,
        Err(error) => panic!("test token config is valid: {error}"),
    };
    TokenCodec::new(&config, clock)
}
