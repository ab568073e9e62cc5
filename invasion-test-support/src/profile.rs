//! Environment-driven tuning for property and fuzz tests.
//!
//! `PROGTEST_CASES` overrides how many cases each property runs and
//! `INVASION_FUZZ_SEED` pins the seed of the fuzz run so a failure reported by
//! CI can be replayed locally.

use std::env;

/// Environment variable controlling proptest case counts.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable pinning the fuzz seed.
pub const FUZZ_SEED_ENV_KEY: &str = "INVASION_FUZZ_SEED";

/// Runtime profile for property and fuzz tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuzzProfile {
    cases: u32,
    seed: u64,
}

impl FuzzProfile {
    /// Loads a profile from the environment, falling back to the defaults for
    /// unset or invalid values.
    ///
    /// # Examples
    /// ```
    /// use invasion_test_support::profile::FuzzProfile;
    ///
    /// let profile = FuzzProfile::load(64, 7);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_seed: u64) -> Self {
        Self {
            cases: read_env_or_default(PROGTEST_CASES_ENV_KEY, default_cases, parse_cases),
            seed: read_env_or_default(FUZZ_SEED_ENV_KEY, default_seed, parse_seed),
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub const fn cases(&self) -> u32 {
        self.cases
    }

    /// Seed for the fuzz run.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

fn read_env_or_default<T: Copy>(
    key: &'static str,
    default: T,
    parser: fn(&str) -> Result<T, String>,
) -> T {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    parser(&raw).unwrap_or_else(|reason| {
        tracing::warn!(
            env = key,
            raw = %raw,
            reason = %reason,
            "invalid test profile override; using default",
        );
        default
    })
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    let parsed = raw
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("parse error: {error}"))?;
    if parsed == 0 {
        return Err("cases must be > 0".to_owned());
    }
    Ok(parsed)
}

fn parse_seed(raw: &str) -> Result<u64, String> {
    let trimmed = raw.trim();
    let parsed = match trimmed.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse::<u64>(),
    };
    parsed.map_err(|error| format!("parse error: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    struct EnvGuard {
        key: &'static str,
        original: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let original = env::var(key).ok();
            // SAFETY: tests serialize access with ENV_LOCK.
            unsafe { env::set_var(key, value) };
            Self { key, original }
        }

        fn unset(key: &'static str) -> Self {
            let original = env::var(key).ok();
            // SAFETY: tests serialize access with ENV_LOCK.
            unsafe { env::remove_var(key) };
            Self { key, original }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.original {
                // SAFETY: tests serialize access with ENV_LOCK.
                Some(value) => unsafe { env::set_var(self.key, value) },
                // SAFETY: tests serialize access with ENV_LOCK.
                None => unsafe { env::remove_var(self.key) },
            }
        }
    }

    #[test]
    fn load_defaults_when_no_overrides_exist() {
        let _lock = ENV_LOCK.lock().expect("env lock");
        let _cases = EnvGuard::unset(PROGTEST_CASES_ENV_KEY);
        let _seed = EnvGuard::unset(FUZZ_SEED_ENV_KEY);

        let profile = FuzzProfile::load(64, 9);
        assert_eq!(profile.cases(), 64);
        assert_eq!(profile.seed(), 9);
    }

    #[rstest]
    #[case("1", 1)]
    #[case(" 250 ", 250)]
    fn load_accepts_case_overrides(#[case] raw: &str, #[case] expected: u32) {
        let _lock = ENV_LOCK.lock().expect("env lock");
        let _cases = EnvGuard::set(PROGTEST_CASES_ENV_KEY, raw);

        assert_eq!(FuzzProfile::load(64, 0).cases(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-3")]
    #[case("many")]
    fn load_ignores_invalid_case_overrides(#[case] raw: &str) {
        let _lock = ENV_LOCK.lock().expect("env lock");
        let _cases = EnvGuard::set(PROGTEST_CASES_ENV_KEY, raw);

        assert_eq!(FuzzProfile::load(64, 0).cases(), 64);
    }

    #[rstest]
    #[case("42", 42)]
    #[case("0xff", 255)]
    #[case("18446744073709551615", u64::MAX)]
    fn load_accepts_seed_overrides(#[case] raw: &str, #[case] expected: u64) {
        let _lock = ENV_LOCK.lock().expect("env lock");
        let _seed = EnvGuard::set(FUZZ_SEED_ENV_KEY, raw);

        assert_eq!(FuzzProfile::load(1, 0).seed(), expected);
    }

    #[test]
    fn load_ignores_invalid_seed_override() {
        let _lock = ENV_LOCK.lock().expect("env lock");
        let _seed = EnvGuard::set(FUZZ_SEED_ENV_KEY, "0xzz");

        assert_eq!(FuzzProfile::load(1, 5).seed(), 5);
    }
}
