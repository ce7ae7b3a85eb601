//! Push keys - time-ordered unique keys for store children
//!
//! Structure (20 characters over a 64-symbol ordered alphabet):
//! - Characters 0-7:  Timestamp (milliseconds since Unix epoch, big-endian base64)
//! - Characters 8-19: Random suffix (incremented within the same millisecond)
//!
//! Keys sort lexicographically in creation order, which is what the realtime
//! store uses as insertion order.

use parking_lot::Mutex;
use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";
const TIME_LEN: usize = 8;
const RANDOM_LEN: usize = 12;

/// Thread-safe push key generator
///
/// Two keys generated in the same millisecond share the timestamp prefix and
/// differ by an incremented random suffix, so keys are strictly increasing.
pub struct PushIdGenerator {
    state: Mutex<GeneratorState>,
}

struct GeneratorState {
    last_timestamp: i64,
    last_random: [u8; RANDOM_LEN],
}

impl PushIdGenerator {
    /// Create a new generator
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GeneratorState {
                last_timestamp: 0,
                last_random: [0; RANDOM_LEN],
            }),
        }
    }

    /// Generate a new unique push key
    pub fn generate(&self) -> String {
        self.generate_at(current_timestamp())
    }

    fn generate_at(&self, now: i64) -> String {
        let mut state = self.state.lock();

        // A clock that steps backwards keeps the previous prefix so order holds
        let timestamp = now.max(state.last_timestamp);

        if timestamp == state.last_timestamp {
            increment(&mut state.last_random);
        } else {
            let mut rng = rand::thread_rng();
            for digit in &mut state.last_random {
                *digit = rng.gen_range(0..64);
            }
            state.last_timestamp = timestamp;
        }

        let mut key = String::with_capacity(TIME_LEN + RANDOM_LEN);
        let mut time_chars = [0u8; TIME_LEN];
        let mut remaining = timestamp;
        for slot in time_chars.iter_mut().rev() {
            *slot = PUSH_CHARS[(remaining % 64) as usize];
            remaining /= 64;
        }
        key.extend(time_chars.iter().map(|&c| c as char));
        key.extend(state.last_random.iter().map(|&d| PUSH_CHARS[d as usize] as char));
        key
    }
}

impl Default for PushIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Add one to the random suffix, carrying leftwards.
fn increment(digits: &mut [u8; RANDOM_LEN]) {
    for digit in digits.iter_mut().rev() {
        if *digit == 63 {
            *digit = 0;
        } else {
            *digit += 1;
            return;
        }
    }
}

/// Decode the timestamp prefix of a push key (milliseconds since Unix epoch)
///
/// Returns `None` for keys that were not produced by a push key generator.
pub fn push_key_timestamp(key: &str) -> Option<i64> {
    if key.len() != TIME_LEN + RANDOM_LEN {
        return None;
    }

    key.bytes().take(TIME_LEN).try_fold(0i64, |acc, c| {
        PUSH_CHARS
            .iter()
            .position(|&p| p == c)
            .map(|value| acc * 64 + value as i64)
    })
}

fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
