//! Minimum-version tables
//!
//! Built once (defaults or config file) and handed to the gate by reference.

use crate::version::{token_is, DriverVersion, VersionTuple};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum OS base version per board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardTable {
    boards: BTreeMap<String, VersionTuple>,
}

impl BoardTable {
    /// Table with no boards
    pub fn empty() -> Self {
        Self {
            boards: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, board: impl Into<String>, minimum: VersionTuple) {
        self.boards.insert(board.into(), minimum);
    }

    /// Lookup a board's minimum base version
    pub fn minimum(&self, board: &str) -> Option<&VersionTuple> {
        self.boards.get(board)
    }

    pub fn contains(&self, board: &str) -> bool {
        self.boards.contains_key(board)
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

impl Default for BoardTable {
    fn default() -> Self {
        let boards = [
            ("TAS", VersionTuple::new(11, 0, 0, 145)), // Mate 30
            ("LIO", VersionTuple::new(11, 0, 0, 145)), // Mate 30 Pro
            ("ANA", VersionTuple::new(11, 0, 0, 145)), // P40
            ("ELS", VersionTuple::new(11, 0, 0, 145)), // P40 Pro
        ];

        Self {
            boards: boards
                .into_iter()
                .map(|(board, min)| (board.to_string(), min))
                .collect(),
        }
    }
}

/// Minimum driver build for one driver family (and optionally one revision)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRule {
    /// First version component
    pub major: u32,
    /// Second version component
    pub minor: u32,
    /// Third version component; `None` accepts any revision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,
    /// Lowest acceptable fourth component
    pub min_build: u32,
}

impl DriverRule {
    pub const fn new(major: u32, minor: u32, revision: Option<u32>, min_build: u32) -> Self {
        Self {
            major,
            minor,
            revision,
            min_build,
        }
    }

    pub fn matches_family(&self, version: &DriverVersion) -> bool {
        token_is(&version.major, self.major) && token_is(&version.minor, self.minor)
    }

    /// Revision-free rules accept any third token, numeric or not
    pub fn matches_revision(&self, version: &DriverVersion) -> bool {
        self.revision.map_or(true, |r| token_is(&version.revision, r))
    }
}

/// Driver families that carry the accelerated path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverRules {
    rules: Vec<DriverRule>,
}

impl DriverRules {
    pub fn new(rules: Vec<DriverRule>) -> Self {
        Self { rules }
    }

    /// Rules for the version's family, in declaration order
    pub fn for_family<'a>(
        &'a self,
        version: &'a DriverVersion,
    ) -> impl Iterator<Item = &'a DriverRule> + 'a {
        self.rules.iter().filter(move |r| r.matches_family(version))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DriverRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for DriverRules {
    fn default() -> Self {
        Self::new(vec![
            DriverRule::new(100, 320, Some(10), 24),
            DriverRule::new(100, 320, Some(11), 20),
            DriverRule::new(100, 320, Some(12), 12),
            DriverRule::new(100, 330, None, 12),
            DriverRule::new(100, 500, None, 12),
        ])
    }
}

/// SoCs that ship an NPU
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SocList {
    socs: Vec<String>,
}

impl SocList {
    pub fn new<I, S>(socs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            socs: socs.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact, case-sensitive match
    pub fn contains(&self, soc: &str) -> bool {
        self.socs.iter().any(|s| s == soc)
    }
}

impl Default for SocList {
    fn default() -> Self {
        Self::new(["kirin990", "kirin810", "kirin820", "kirin985", "kirin9000"])
    }
}

/// Everything the gate consults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Minimum base version per board
    #[serde(default)]
    pub boards: BoardTable,

    /// Supported driver families
    #[serde(default)]
    pub driver_rules: DriverRules,

    /// SoCs with an NPU
    #[serde(default)]
    pub npu_socs: SocList,
}
