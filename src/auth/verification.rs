//! Email verification codes

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Lowest and highest six-digit codes
const CODE_RANGE: std::ops::RangeInclusive<u32> = 100_000..=999_999;

/// Upper bound on a code's lifetime, one day
pub const MAX_CODE_TTL_SECS: u64 = 24 * 60 * 60;

/// Pending verification code with its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Generate a fresh random code valid for `ttl_secs` from `now`
    pub fn generate(now: DateTime<Utc>, ttl_secs: u64) -> Self {
        let code = rand::thread_rng().gen_range(CODE_RANGE);
        let ttl = i64::try_from(ttl_secs.min(MAX_CODE_TTL_SECS)).unwrap_or_default();

        Self {
            code: code.to_string(),
            expires_at: now + Duration::seconds(ttl),
        }
    }
}
