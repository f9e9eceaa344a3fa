//! Property sources

use crate::error::{DevPropError, Result};
use crate::{normalize, validate_key};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Anything that can answer a property lookup
pub trait PropertySource: Send + Sync {
    /// Read a property. `Ok(None)` means the property is absent or empty.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

impl<S: PropertySource + ?Sized> PropertySource for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// The platform property service
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProperties;

impl PropertySource for SystemProperties {
    fn read(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        read_system_property(key)
    }

    fn name(&self) -> &'static str {
        "system"
    }
}

#[cfg(target_os = "android")]
fn read_system_property(key: &str) -> Result<Option<String>> {
    use crate::PROP_VALUE_MAX;
    use std::ffi::{CStr, CString};

    let name = CString::new(key).map_err(|_| DevPropError::InvalidKey(key.to_string()))?;
    let mut buf = [0 as libc::c_char; PROP_VALUE_MAX];

    // SAFETY: `buf` is PROP_VALUE_MAX bytes, the most the call ever writes,
    // and is NUL-terminated on every non-negative return.
    let len = unsafe { libc::__system_property_get(name.as_ptr(), buf.as_mut_ptr()) };
    if len <= 0 {
        return Ok(None);
    }

    // SAFETY: see above
    let value = unsafe { CStr::from_ptr(buf.as_ptr()) };
    let value = value
        .to_str()
        .map_err(|_| DevPropError::InvalidUtf8(key.to_string()))?;
    Ok(normalize(value))
}

#[cfg(not(target_os = "android"))]
fn read_system_property(key: &str) -> Result<Option<String>> {
    use std::process::Command;

    const GETPROP: &str = "getprop";

    let output = Command::new(GETPROP)
        .arg(key)
        .output()
        .map_err(|source| DevPropError::Spawn {
            program: GETPROP,
            source,
        })?;

    if !output.status.success() {
        return Err(DevPropError::CommandFailed {
            program: GETPROP,
            status: output.status,
        });
    }

    let stdout =
        String::from_utf8(output.stdout).map_err(|_| DevPropError::InvalidUtf8(key.to_string()))?;
    Ok(normalize(stdout.trim_end_matches(['\r', '\n'])))
}

/// In-memory properties
#[derive(Debug, Default, Clone)]
pub struct MemoryProperties {
    values: HashMap<String, String>,
}

impl MemoryProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for MemoryProperties {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl PropertySource for MemoryProperties {
    fn read(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.values.get(key).and_then(|v| normalize(v)))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Properties loaded from a `build.prop`-style dump
///
/// One `key=value` per line. Blank lines and `#` comments are skipped, as
/// are lines without `=` (such as `import` directives). Later lines override
/// earlier ones.
#[derive(Debug, Default, Clone)]
pub struct FileProperties {
    values: MemoryProperties,
}

impl FileProperties {
    /// Load properties from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        debug!("Loaded property dump {}", path.display());
        Ok(Self::parse(&content))
    }

    /// Parse dump contents
    pub fn parse(content: &str) -> Self {
        let mut values = MemoryProperties::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            match trimmed.split_once('=') {
                Some((key, value)) if validate_key(key.trim()).is_ok() => {
                    values.set(key.trim(), value);
                }
                _ => debug!("Skipping property line {}: {:?}", idx + 1, line),
            }
        }

        Self { values }
    }
}

impl PropertySource for FileProperties {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.values.read(key)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// A stack of sources queried in order
///
/// The first source holding a value wins. When no source has a value and at
/// least one failed, the first failure is returned so callers can retry.
#[derive(Default)]
pub struct LayeredProperties {
    layers: Vec<Box<dyn PropertySource>>,
}

impl LayeredProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer below the existing ones
    pub fn push(mut self, source: impl PropertySource + 'static) -> Self {
        self.layers.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl PropertySource for LayeredProperties {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let mut first_error = None;

        for layer in &self.layers {
            match layer.read(key) {
                Ok(Some(value)) => {
                    debug!("{} = {:?} (from {})", key, value, layer.name());
                    return Ok(Some(value));
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Property source {} failed for {}: {}", layer.name(), key, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }

    fn name(&self) -> &'static str {
        "layered"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;

    struct FailingSource;

    impl PropertySource for FailingSource {
        fn read(&self, key: &str) -> Result<Option<String>> {
            Err(DevPropError::InvalidUtf8(key.to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn test_memory_source() {
        let props = MemoryProperties::new()
            .with(keys::BOARD, "TAS")
            .with(keys::DRIVER_VERSION, "");

        assert_eq!(props.read(keys::BOARD).unwrap(), Some("TAS".to_string()));
        assert_eq!(props.read(keys::DRIVER_VERSION).unwrap(), None);
        assert_eq!(props.read(keys::BASE_VERSION).unwrap(), None);
        assert!(props.read("bad key").is_err());
    }

    #[test]
    fn test_parse_dump() {
        let dump = "\
# begin build properties
import /vendor/build.prop
ro.product.board=TAS
persist.sys.hiview.base_version=  TAS-LGRP1 11.0.0.145  \r
ro.vendor.hiaiversion=100.320.010.023

ro.product.board=LIO
";
        let props = FileProperties::parse(dump);

        assert_eq!(props.read(keys::BOARD).unwrap(), Some("LIO".to_string()));
        // Value whitespace is kept verbatim
        assert_eq!(
            props.read(keys::BASE_VERSION).unwrap(),
            Some("  TAS-LGRP1 11.0.0.145  ".to_string())
        );
        assert_eq!(
            props.read(keys::DRIVER_VERSION).unwrap(),
            Some("100.320.010.023".to_string())
        );
        assert_eq!(props.read(keys::VENDOR_DEVICE).unwrap(), None);
    }

    #[test]
    fn test_layered_first_hit_wins() {
        let layered = LayeredProperties::new()
            .push(MemoryProperties::new().with(keys::BOARD, "ANA"))
            .push(MemoryProperties::new().with(keys::BOARD, "TAS").with(keys::VENDOR_DEVICE, "kirin990"));

        assert_eq!(layered.len(), 2);
        assert_eq!(layered.read(keys::BOARD).unwrap(), Some("ANA".to_string()));
        assert_eq!(
            layered.read(keys::VENDOR_DEVICE).unwrap(),
            Some("kirin990".to_string())
        );
    }

    #[test]
    fn test_layered_error_only_when_nothing_found() {
        let layered = LayeredProperties::new()
            .push(FailingSource)
            .push(MemoryProperties::new().with(keys::BOARD, "ELS"));

        assert_eq!(layered.read(keys::BOARD).unwrap(), Some("ELS".to_string()));
        assert!(layered.read(keys::BASE_VERSION).is_err());

        let empty = LayeredProperties::new();
        assert!(empty.is_empty());
        assert_eq!(empty.read(keys::BOARD).unwrap(), None);
    }
}
