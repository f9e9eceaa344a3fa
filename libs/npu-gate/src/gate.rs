//! Half-pixel resize-bilinear capability gate
//!
//! Two independent paths can admit a device:
//!
//! 1. **Driver version**: the accelerator driver belongs to a known family
//!    and its build is at least the family (or revision) minimum.
//! 2. **Base version**: the board is listed and every component of the OS
//!    base version is at least the board's minimum.
//!
//! The driver path runs first; the base-version path is the fallback. Any
//! failure inside a path only declines that path.

use crate::device::DeviceProperties;
use crate::error::Rejection;
use crate::table::GateConfig;
use crate::version::{parse_base_version, DriverVersion, VERSION_LEN};
use libdevprop::keys;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Which path admitted the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePath {
    DriverVersion,
    BaseVersion,
}

impl fmt::Display for GatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DriverVersion => write!(f, "driver version"),
            Self::BaseVersion => write!(f, "base version"),
        }
    }
}

/// Result of one path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PathOutcome {
    Supported,
    Rejected { reason: Rejection },
}

impl PathOutcome {
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Supported)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Supported => None,
            Self::Rejected { reason } => Some(reason),
        }
    }
}

impl From<Result<(), Rejection>> for PathOutcome {
    fn from(result: Result<(), Rejection>) -> Self {
        match result {
            Ok(()) => Self::Supported,
            Err(reason) => Self::Rejected { reason },
        }
    }
}

impl fmt::Display for PathOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Supported => write!(f, "supported"),
            Self::Rejected { reason } => write!(f, "rejected: {}", reason),
        }
    }
}

/// Gate decision with the per-path outcomes behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Accelerated path available
    pub supported: bool,
    /// Driver-version path
    pub driver: PathOutcome,
    /// Base-version path; `None` when the driver path already admitted the device
    pub base: Option<PathOutcome>,
}

impl Decision {
    pub fn via(&self) -> Option<GatePath> {
        if self.driver.is_supported() {
            Some(GatePath::DriverVersion)
        } else if self.base.as_ref().is_some_and(PathOutcome::is_supported) {
            Some(GatePath::BaseVersion)
        } else {
            None
        }
    }
}

/// Capability gate over an immutable configuration
#[derive(Debug, Clone, Copy)]
pub struct Gate<'a> {
    config: &'a GateConfig,
}

impl<'a> Gate<'a> {
    pub fn new(config: &'a GateConfig) -> Self {
        Self { config }
    }

    /// Base-version path as a plain boolean
    pub fn check_by_base_version(&self, board: &str, base_version: &str) -> bool {
        self.base_version_verdict(board, base_version).is_ok()
    }

    /// Driver-version path as a plain boolean
    pub fn check_by_driver_version(&self, driver_version: &str) -> bool {
        self.driver_version_verdict(driver_version).is_ok()
    }

    /// Base-version path with the reason for a decline
    pub fn base_version_verdict(&self, board: &str, base_version: &str) -> Result<(), Rejection> {
        let minimum = self
            .config
            .boards
            .minimum(board)
            .ok_or_else(|| Rejection::UnknownBoard {
                board: board.to_string(),
            })?;

        let version = parse_base_version(base_version)?;

        match version.first_shortfall(minimum) {
            Some((index, found, required)) => Err(Rejection::BelowMinimum {
                index,
                found,
                required,
            }),
            None => Ok(()),
        }
    }

    /// Driver-version path with the reason for a decline
    pub fn driver_version_verdict(&self, driver_version: &str) -> Result<(), Rejection> {
        let version = DriverVersion::parse(driver_version)?;

        let mut family = self.config.driver_rules.for_family(&version).peekable();
        if family.peek().is_none() {
            return Err(Rejection::UnknownDriverFamily {
                major: version.major.clone(),
                minor: version.minor.clone(),
            });
        }

        let rule = match family.find(|rule| rule.matches_revision(&version)) {
            Some(rule) => rule,
            None => {
                return Err(Rejection::UnknownDriverRevision {
                    major: version.major.clone(),
                    minor: version.minor.clone(),
                    revision: version.revision.clone(),
                })
            }
        };

        let build = version.build_number()?;
        if build < rule.min_build {
            return Err(Rejection::BelowMinimum {
                index: VERSION_LEN - 1,
                found: build,
                required: rule.min_build,
            });
        }

        Ok(())
    }

    /// Run both paths and keep the reasons.
    ///
    /// An unavailable driver version only declines the driver path; the
    /// base-version path still runs.
    pub fn evaluate(&self, props: &DeviceProperties) -> Decision {
        let driver = PathOutcome::from(match props.driver_version.as_deref() {
            Some(driver_version) => self.driver_version_verdict(driver_version),
            None => Err(Rejection::PropertyUnavailable {
                key: keys::DRIVER_VERSION,
            }),
        });
        debug!("Driver version path: {}", driver);

        if driver.is_supported() {
            return Decision {
                supported: true,
                driver,
                base: None,
            };
        }

        let base = PathOutcome::from(match (props.board.as_deref(), props.base_version.as_deref()) {
            (Some(board), Some(base_version)) => self.base_version_verdict(board, base_version),
            (None, _) => Err(Rejection::PropertyUnavailable { key: keys::BOARD }),
            (_, None) => Err(Rejection::PropertyUnavailable {
                key: keys::BASE_VERSION,
            }),
        });
        debug!("Base version path: {}", base);

        Decision {
            supported: base.is_supported(),
            driver,
            base: Some(base),
        }
    }

    /// Whether the device supports half-pixel resize-bilinear in hardware
    pub fn supports_half_pixel(&self, props: &DeviceProperties) -> bool {
        self.evaluate(props).supported
    }

    /// Whether the device SoC ships an NPU
    pub fn contains_npu(&self, props: &DeviceProperties) -> bool {
        props
            .vendor_device
            .as_deref()
            .is_some_and(|soc| self.config.npu_socs.contains(soc))
    }
}
