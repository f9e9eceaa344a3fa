//! Output formatting

use npu_gate::{Decision, DeviceProperties, Gate, PathOutcome};
use serde::Serialize;
use std::fmt;

/// Sentence printed by `check`
pub fn half_pixel_line(supported: bool) -> String {
    format!(
        "This device{}support high performance ResizeBilinear with half_pixel!",
        if supported { " " } else { " not " }
    )
}

/// Sentence printed by `npu`
pub fn npu_line(contains: bool) -> &'static str {
    if contains {
        "This device contains NPU"
    } else {
        "This device not contains NPU"
    }
}

/// Lines printed by `info`
pub fn info_lines(props: &DeviceProperties) -> Vec<String> {
    let show = |v: &Option<String>| v.clone().unwrap_or_default();

    vec![
        format!("Board={}", show(&props.board)),
        format!("BaseVersion={}", show(&props.base_version)),
        format!("DriverVersion={}", show(&props.driver_version)),
        format!("VendorDevice={}", show(&props.vendor_device)),
    ]
}

/// Everything `explain` knows about the device
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub properties: &'a DeviceProperties,
    pub half_pixel: Decision,
    pub contains_npu: bool,
}

impl<'a> Report<'a> {
    pub fn new(gate: &Gate<'_>, properties: &'a DeviceProperties) -> Self {
        Self {
            properties,
            half_pixel: gate.evaluate(properties),
            contains_npu: gate.contains_npu(properties),
        }
    }

    /// Base path outcome, if it ran
    pub fn base_outcome(&self) -> Option<&PathOutcome> {
        self.half_pixel.base.as_ref()
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let props = self.properties;
        let shown = |v: &Option<String>| v.as_deref().unwrap_or("<unavailable>").to_string();

        match self.half_pixel.via() {
            Some(path) => writeln!(f, "Half-pixel ResizeBilinear: supported (via {})", path)?,
            None => writeln!(f, "Half-pixel ResizeBilinear: not supported")?,
        }
        writeln!(
            f,
            "  Driver version:  {} -> {}",
            shown(&props.driver_version),
            self.half_pixel.driver
        )?;
        let base = match &self.half_pixel.base {
            Some(outcome) => outcome.to_string(),
            None => "skipped".to_string(),
        };
        writeln!(
            f,
            "  Base version:    {} on board {} -> {}",
            shown(&props.base_version),
            shown(&props.board),
            base
        )?;
        writeln!(
            f,
            "NPU:               {} ({})",
            if self.contains_npu { "yes" } else { "no" },
            shown(&props.vendor_device)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use npu_gate::GateConfig;

    #[test]
    fn test_sentences() {
        assert_eq!(
            half_pixel_line(true),
            "This device support high performance ResizeBilinear with half_pixel!"
        );
        assert_eq!(
            half_pixel_line(false),
            "This device not support high performance ResizeBilinear with half_pixel!"
        );
        assert_eq!(npu_line(true), "This device contains NPU");
        assert_eq!(npu_line(false), "This device not contains NPU");
    }

    #[test]
    fn test_info_lines() {
        let props = DeviceProperties::default().with_board("TAS");
        let lines = info_lines(&props);

        assert_eq!(lines[0], "Board=TAS");
        assert_eq!(lines[1], "BaseVersion=");
    }

    #[test]
    fn test_render_fallback() {
        let config = GateConfig::default();
        let gate = Gate::new(&config);
        let props = DeviceProperties::default()
            .with_driver_version("050.000.000.000")
            .with_board("TAS")
            .with_base_version("TAS-AL00 11.0.0.145")
            .with_vendor_device("kirin990");

        let report = Report::new(&gate, &props);
        let text = report.to_string();

        assert!(report.base_outcome().is_some_and(PathOutcome::is_supported));
        assert!(text.starts_with("Half-pixel ResizeBilinear: supported (via base version)"));
        assert!(text.contains("rejected: Driver family 050.000 has no rules"));
        assert!(text.contains("NPU:               yes (kirin990)"));
    }

    #[test]
    fn test_render_driver_shortcut() {
        let config = GateConfig::default();
        let gate = Gate::new(&config);
        let props = DeviceProperties::default().with_driver_version("100.500.000.012");

        let text = Report::new(&gate, &props).to_string();
        assert!(text.contains("supported (via driver version)"));
        assert!(text.contains("<unavailable> on board <unavailable> -> skipped"));
        assert!(text.contains("no (<unavailable>)"));
    }

    #[test]
    fn test_report_json() {
        let config = GateConfig::default();
        let gate = Gate::new(&config);
        let props = DeviceProperties::default().with_vendor_device("kirin810");

        let json = serde_json::to_value(Report::new(&gate, &props)).unwrap();
        assert_eq!(json["contains_npu"], true);
        assert_eq!(json["half_pixel"]["supported"], false);
        assert_eq!(json["properties"]["vendor_device"], "kirin810");
    }
}
