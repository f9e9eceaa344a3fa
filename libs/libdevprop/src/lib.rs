//! Device system property access
//!
//! Reads device properties (board, OS base version, accelerator driver
//! version, SoC name) from a pluggable source and remembers each answer for
//! the lifetime of the process.
//!
//! Sources:
//! - [`SystemProperties`]: the platform property service (bionic on Android,
//!   the `getprop` tool elsewhere)
//! - [`FileProperties`]: a `build.prop`-style `key=value` dump
//! - [`MemoryProperties`]: an in-memory map
//! - [`LayeredProperties`]: a stack of the above, first hit wins

mod cache;
mod error;
mod source;

pub use cache::{CachedProperty, PropertyCache};
pub use error::{DevPropError, Result};
pub use source::{
    FileProperties, LayeredProperties, MemoryProperties, PropertySource, SystemProperties,
};

/// Size of the platform property value buffer, terminator included
pub const PROP_VALUE_MAX: usize = 92;

/// Well-known property keys
pub mod keys {
    /// Manufacturer board identifier (e.g. `TAS`)
    pub const BOARD: &str = "ro.product.board";

    /// OS build descriptor, `"<prefix> <a.b.c.d>"`
    pub const BASE_VERSION: &str = "persist.sys.hiview.base_version";

    /// Accelerator driver version, `"100.320.010.024"`
    pub const DRIVER_VERSION: &str = "ro.vendor.hiaiversion";

    /// SoC name (e.g. `kirin990`)
    pub const VENDOR_DEVICE: &str = "ro.product.vendor.device";

    /// Every key the probe reads
    pub const ALL: [&str; 4] = [BOARD, BASE_VERSION, DRIVER_VERSION, VENDOR_DEVICE];
}

/// Clamp a raw value the way the property service stores it.
///
/// Values longer than `PROP_VALUE_MAX - 1` bytes are cut on a char boundary;
/// an empty value reads as absent.
pub(crate) fn normalize(raw: &str) -> Option<String> {
    let mut end = raw.len().min(PROP_VALUE_MAX - 1);
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    let value = &raw[..end];

    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Reject keys the property service would never accept
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key.chars().any(|c| c.is_whitespace() || c == '\0' || c == '=') {
        return Err(DevPropError::InvalidKey(key.to_string()));
    }
    Ok(())
}
