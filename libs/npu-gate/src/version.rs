//! Version string grammars
//!
//! Two property formats feed the gate:
//!
//! - **Base version**: `"<prefix> <a.b.c.d>"`. Surrounding spaces are ignored,
//!   exactly one interior space separates the prefix from the version, and
//!   anything after the fourth number is ignored (`"X 11.0.0.145-SP2"`).
//! - **Driver version**: `"100.320.010.024"`. At least four dot-separated
//!   tokens; extra tokens are ignored. Only the build token is numeric.

use crate::error::{Result, VersionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of components in every version the gate compares
pub const VERSION_LEN: usize = 4;

/// Four-component version, e.g. `11.0.0.145`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionTuple(pub [u32; VERSION_LEN]);

impl VersionTuple {
    pub const fn new(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self([a, b, c, d])
    }

    /// First component under its floor in `minimum`, as `(index, found, required)`.
    ///
    /// Components are checked left to right and every one must be at least
    /// its own floor, so `12.0.0.0` does not clear `11.0.0.145`.
    pub fn first_shortfall(&self, minimum: &VersionTuple) -> Option<(usize, u32, u32)> {
        self.0
            .iter()
            .zip(minimum.0.iter())
            .enumerate()
            .find(|(_, (found, required))| found < required)
            .map(|(index, (found, required))| (index, *found, *required))
    }

    /// Check every component against its floor
    pub fn meets_minimum(&self, minimum: &VersionTuple) -> bool {
        self.first_shortfall(minimum).is_none()
    }
}

impl fmt::Display for VersionTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

/// Strict form: exactly four components and nothing else
impl FromStr for VersionTuple {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self> {
        let (version, rest) = parse_dotted_prefix(s.trim())?;
        if !rest.is_empty() {
            return Err(VersionError::InvalidComponent {
                index: VERSION_LEN - 1,
                token: rest.to_string(),
            });
        }
        Ok(version)
    }
}

impl TryFrom<String> for VersionTuple {
    type Error = VersionError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<VersionTuple> for String {
    fn from(v: VersionTuple) -> Self {
        v.to_string()
    }
}

/// Parse an OS base-version descriptor such as `"  TAS-AL00 11.0.0.145  "`
pub fn parse_base_version(raw: &str) -> Result<VersionTuple> {
    let trimmed = raw.trim_matches(' ');
    if trimmed.is_empty() {
        return Err(VersionError::Empty);
    }

    let payload = match trimmed.matches(' ').count() {
        0 => return Err(VersionError::MissingDelimiter),
        1 => trimmed
            .split_once(' ')
            .map(|(_, payload)| payload)
            .ok_or(VersionError::MissingDelimiter)?,
        spaces => return Err(VersionError::ExtraDelimiters { spaces }),
    };

    // Trailing text after the fourth number is ignored
    let (version, _) = parse_dotted_prefix(payload)?;
    Ok(version)
}

/// Read `int '.' int '.' int '.' int` from the front of `s`.
///
/// Returns the version and whatever follows the fourth number.
fn parse_dotted_prefix(s: &str) -> Result<(VersionTuple, &str)> {
    let mut parts = [0u32; VERSION_LEN];
    let mut rest = s;

    for (index, part) in parts.iter_mut().enumerate() {
        if index > 0 {
            rest = rest
                .strip_prefix('.')
                .ok_or(VersionError::MissingSeparator { index: index - 1 })?;
        }

        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (digits, tail) = rest.split_at(end);

        *part = digits.parse().map_err(|_| VersionError::InvalidComponent {
            index,
            token: leading_token(rest).to_string(),
        })?;
        rest = tail;
    }

    Ok((VersionTuple(parts), rest))
}

/// Text up to the next `.`, for error messages
fn leading_token(s: &str) -> &str {
    s.split('.').next().unwrap_or(s)
}

/// Accelerator driver version, e.g. `100.320.010.024`
///
/// Tokens are kept as written. Rules match the family and revision tokens
/// against their three-digit form (`"010"`), and only the build token is
/// read as a number, so a token no rule inspects is never validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DriverVersion {
    pub major: String,
    pub minor: String,
    pub revision: String,
    pub build: String,
}

impl DriverVersion {
    /// Split a driver version property into its first four tokens.
    ///
    /// Components past the fourth are not inspected.
    pub fn parse(raw: &str) -> Result<Self> {
        let tokens: Vec<&str> = raw.split('.').take(VERSION_LEN).collect();

        match tokens.as_slice() {
            [major, minor, revision, build] => Ok(Self {
                major: major.to_string(),
                minor: minor.to_string(),
                revision: revision.to_string(),
                build: build.to_string(),
            }),
            _ => Err(VersionError::TooFewComponents {
                expected: VERSION_LEN,
                found: tokens.len(),
            }),
        }
    }

    /// Build number; `"12"` and `"012"` are the same build
    pub fn build_number(&self) -> Result<u32> {
        parse_component(VERSION_LEN - 1, &self.build)
    }
}

/// Whether a driver token is the three-digit form of `value`
pub(crate) fn token_is(token: &str, value: u32) -> bool {
    token == format!("{:03}", value)
}

impl fmt::Display for DriverVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.revision, self.build
        )
    }
}

impl FromStr for DriverVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_component(index: usize, token: &str) -> Result<u32> {
    // `u32::from_str` would take a leading `+`
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::InvalidComponent {
            index,
            token: token.to_string(),
        });
    }
    token.parse().map_err(|_| VersionError::InvalidComponent {
        index,
        token: token.to_string(),
    })
}
