//! Property-test run profile parsing for CI and local overrides.
//!
//! Every proptest suite in the workspace reads its case count and fork mode
//! through [`ProptestRunProfile`], so one pair of environment variables
//! tunes them all.

use std::env;

use thiserror::Error;

/// Environment variable controlling proptest case counts.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable controlling proptest process forking.
pub const QUARTIC_PBT_FORK_ENV_KEY: &str = "QUARTIC_PBT_FORK";

/// Reason an override was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    /// The case count is not an unsigned integer.
    #[error("case count {raw:?} is not an unsigned integer")]
    NotANumber {
        /// Raw override value.
        raw: String,
    },
    /// The case count is zero.
    #[error("case count must be greater than zero")]
    ZeroCases,
    /// The fork flag is not a recognised boolean spelling.
    #[error("fork flag {raw:?} is not one of true/false/1/0/yes/no/on/off")]
    NotAFlag {
        /// Raw override value.
        raw: String,
    },
}

/// Runtime profile for property-test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Loads a profile from the process environment, falling back to the
    /// given defaults for unset or invalid overrides.
    ///
    /// # Examples
    /// ```
    /// use quartic_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self::from_lookup(default_cases, default_fork, |key| env::var(key).ok())
    }

    /// Loads a profile from an arbitrary key lookup.
    ///
    /// Invalid overrides are logged at `warn` and replaced by the default.
    ///
    /// # Examples
    /// ```
    /// use quartic_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::from_lookup(64, false, |key| {
    ///     (key == "PROGTEST_CASES").then(|| "8".to_owned())
    /// });
    /// assert_eq!(profile.cases(), 8);
    /// assert!(!profile.fork());
    /// ```
    #[must_use]
    pub fn from_lookup(
        default_cases: u32,
        default_fork: bool,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let cases = resolve(&lookup, PROGTEST_CASES_ENV_KEY, default_cases, parse_cases);
        let fork = resolve(&lookup, QUARTIC_PBT_FORK_ENV_KEY, default_fork, parse_flag);
        Self { cases, fork }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether to run proptest cases in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

fn resolve<T: Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
    parse: fn(&str) -> Result<T, OverrideError>,
) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    parse(&raw).unwrap_or_else(|error| {
        tracing::warn!(
            env = key,
            raw = %raw,
            reason = %error,
            "invalid property-test profile override; using default",
        );
        default
    })
}

fn parse_cases(raw: &str) -> Result<u32, OverrideError> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(OverrideError::ZeroCases),
        Ok(cases) => Ok(cases),
        Err(_) => Err(OverrideError::NotANumber {
            raw: raw.to_owned(),
        }),
    }
}

fn parse_flag(raw: &str) -> Result<bool, OverrideError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(OverrideError::NotAFlag {
            raw: raw.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn profile(cases: Option<&str>, fork: Option<&str>, default_fork: bool) -> ProptestRunProfile {
        ProptestRunProfile::from_lookup(64, default_fork, |key| match key {
            PROGTEST_CASES_ENV_KEY => cases.map(str::to_owned),
            QUARTIC_PBT_FORK_ENV_KEY => fork.map(str::to_owned),
            _ => None,
        })
    }

    #[rstest]
    fn defaults_apply_without_overrides() {
        let loaded = profile(None, None, false);
        assert_eq!(loaded.cases(), 64);
        assert!(!loaded.fork());
    }

    #[rstest]
    #[case("1", 1)]
    #[case(" 250 ", 250)]
    #[case("25000", 25_000)]
    fn valid_case_overrides_apply(#[case] raw: &str, #[case] expected: u32) {
        assert_eq!(profile(Some(raw), None, false).cases(), expected);
    }

    #[rstest]
    #[case("0")]
    #[case("-1")]
    #[case("abc")]
    fn invalid_case_overrides_fall_back(#[case] raw: &str) {
        assert_eq!(profile(Some(raw), None, false).cases(), 64);
    }

    #[rstest]
    #[case("true", true)]
    #[case("ON", true)]
    #[case("1", true)]
    #[case("no", false)]
    #[case("FALSE", false)]
    #[case("0", false)]
    fn valid_fork_overrides_apply(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(profile(None, Some(raw), !expected).fork(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("maybe")]
    #[case("2")]
    fn invalid_fork_overrides_fall_back(#[case] raw: &str) {
        assert!(profile(None, Some(raw), true).fork());
    }

    #[rstest]
    #[case("0", OverrideError::ZeroCases)]
    #[case("x", OverrideError::NotANumber { raw: "x".to_owned() })]
    fn case_parse_errors_are_specific(#[case] raw: &str, #[case] expected: OverrideError) {
        assert_eq!(parse_cases(raw), Err(expected));
    }
}
