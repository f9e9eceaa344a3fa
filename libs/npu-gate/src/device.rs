//! Device property snapshot

use libdevprop::{keys, PropertyCache, PropertySource};
use serde::Serialize;

/// The properties the gate reads, `None` where unavailable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceProperties {
    /// `ro.product.board`
    pub board: Option<String>,
    /// `persist.sys.hiview.base_version`
    pub base_version: Option<String>,
    /// `ro.vendor.hiaiversion`
    pub driver_version: Option<String>,
    /// `ro.product.vendor.device`
    pub vendor_device: Option<String>,
}

impl DeviceProperties {
    /// Read every property through the cache
    pub fn from_cache<S: PropertySource>(cache: &PropertyCache<S>) -> Self {
        Self {
            board: cache.get(keys::BOARD),
            base_version: cache.get(keys::BASE_VERSION),
            driver_version: cache.get(keys::DRIVER_VERSION),
            vendor_device: cache.get(keys::VENDOR_DEVICE),
        }
    }

    pub fn with_board(mut self, board: impl Into<String>) -> Self {
        self.board = Some(board.into());
        self
    }

    pub fn with_base_version(mut self, base_version: impl Into<String>) -> Self {
        self.base_version = Some(base_version.into());
        self
    }

    pub fn with_driver_version(mut self, driver_version: impl Into<String>) -> Self {
        self.driver_version = Some(driver_version.into());
        self
    }

    pub fn with_vendor_device(mut self, vendor_device: impl Into<String>) -> Self {
        self.vendor_device = Some(vendor_device.into());
        self
    }
}
