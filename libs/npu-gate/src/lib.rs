//! # NPU Gate
//!
//! Decides whether a device's firmware and accelerator driver support the
//! hardware half-pixel resize-bilinear path, and whether its SoC carries an
//! NPU at all.
//!
//! ```text
//!   ro.vendor.hiaiversion ──► DriverVersion ──► DriverRules ──┐
//!                                                            OR ──► supported?
//!   ro.product.board ──────┐                                  │
//!   base_version ──────────┴► VersionTuple ──► BoardTable ────┘
//! ```
//!
//! Every parse or lookup failure declines its path; nothing is surfaced as
//! an error. [`Gate::evaluate`] keeps the reason for diagnostics.

mod device;
mod error;
mod gate;
mod table;
mod version;

pub use device::DeviceProperties;
pub use error::{Rejection, Result, VersionError};
pub use gate::{Decision, Gate, GatePath, PathOutcome};
pub use table::{BoardTable, DriverRule, DriverRules, GateConfig, SocList};
pub use version::{parse_base_version, DriverVersion, VersionTuple, VERSION_LEN};
