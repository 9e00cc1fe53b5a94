//! Run configuration: grid size, step count and solver options.
//!
//! Every field has a default, so a TOML file only needs the keys it
//! overrides:
//!
//! ```toml
//! n = 512
//! steps = 1000
//! halo = "ghost"
//! ```

use crate::algs::halo::HaloLayout;
use crate::algs::init::Seed;
use crate::algs::reduction::ReductionScope;
use crate::heat_error::HeatError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_N: usize = 1024;
pub const DEFAULT_STEPS: usize = 1024 * 30;

/// Floating type of the grid cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Precision {
    #[default]
    F32,
    F64,
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Precision::F32 => "f32",
            Precision::F64 => "f64",
        })
    }
}

impl FromStr for Precision {
    type Err = HeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "f32" => Ok(Precision::F32),
            "f64" => Ok(Precision::F64),
            other => Err(HeatError::Config(format!(
                "unknown precision `{other}` (expected `f32` or `f64`)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeatConfig {
    /// Grid side length N.
    pub n: usize,
    /// Number of diffusion steps T.
    pub steps: usize,
    /// Rank that prints the elapsed time.
    pub report_rank: usize,
    pub seed: Seed,
    pub halo: HaloLayout,
    pub reduction: ReductionScope,
    pub precision: Precision,
}

impl Default for HeatConfig {
    fn default() -> Self {
        Self {
            n: DEFAULT_N,
            steps: DEFAULT_STEPS,
            report_rank: 0,
            seed: Seed::default(),
            halo: HaloLayout::default(),
            reduction: ReductionScope::default(),
            precision: Precision::default(),
        }
    }
}

impl HeatConfig {
    pub fn new(n: usize, steps: usize) -> Self {
        Self {
            n,
            steps,
            ..Self::default()
        }
    }

    pub fn from_toml_str(src: &str) -> Result<Self, HeatError> {
        toml::from_str(src).map_err(|e| HeatError::Config(e.to_string()))
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, HeatError> {
        let src = std::fs::read_to_string(path)
            .map_err(|e| HeatError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&src)
    }

    /// Startup check against the size of the process group.
    ///
    /// Rejects grids without an interior, groups with more ranks than rows
    /// (some band would be empty) and a report rank outside the group.
    pub fn validate(&self, ranks: usize) -> Result<(), HeatError> {
        if self.n < 3 {
            return Err(HeatError::GridTooSmall { n: self.n });
        }
        if ranks == 0 || self.n < ranks {
            return Err(HeatError::EmptyBand { n: self.n, ranks });
        }
        if self.report_rank >= ranks {
            return Err(HeatError::ReportRankOutOfRange {
                report_rank: self.report_rank,
                size: ranks,
            });
        }
        if self.n % ranks != 0 {
            log::debug!(
                "{} rows do not split evenly over {ranks} ranks; the last rank takes {} extra",
                self.n,
                self.n % ranks
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let cfg = HeatConfig::default();
        assert_eq!(cfg.n, 1024);
        assert_eq!(cfg.steps, 30720);
        assert_eq!(cfg.halo, HaloLayout::InBand);
        assert_eq!(cfg.reduction, ReductionScope::Band);
        assert_eq!(cfg.precision, Precision::F32);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = HeatConfig::from_toml_str("n = 64\nhalo = \"ghost\"\nreduction = \"full-grid\"\n").unwrap();
        assert_eq!(cfg.n, 64);
        assert_eq!(cfg.steps, DEFAULT_STEPS);
        assert_eq!(cfg.halo, HaloLayout::Ghost);
        assert_eq!(cfg.reduction, ReductionScope::FullGrid);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            HeatConfig::from_toml_str("grid = 3"),
            Err(HeatError::Config(_))
        ));
    }

    #[test]
    fn validation_failures() {
        assert_eq!(
            HeatConfig::new(2, 1).validate(1),
            Err(HeatError::GridTooSmall { n: 2 })
        );
        assert_eq!(
            HeatConfig::new(4, 1).validate(5),
            Err(HeatError::EmptyBand { n: 4, ranks: 5 })
        );
        let cfg = HeatConfig {
            report_rank: 2,
            ..HeatConfig::new(8, 1)
        };
        assert_eq!(
            cfg.validate(2),
            Err(HeatError::ReportRankOutOfRange { report_rank: 2, size: 2 })
        );
        assert!(HeatConfig::new(10, 1).validate(3).is_ok());
    }

    #[test]
    fn zero_ranks_is_an_empty_group() {
        assert_eq!(
            HeatConfig::default().validate(0),
            Err(HeatError::EmptyBand { n: DEFAULT_N, ranks: 0 })
        );
    }

    #[test]
    fn json_round_trip() {
        let cfg = HeatConfig {
            seed: Seed::Zero,
            precision: Precision::F64,
            ..HeatConfig::new(16, 4)
        };
        let ser = serde_json::to_string(&cfg).expect("serialize");
        let de: HeatConfig = serde_json::from_str(&ser).expect("deserialize");
        assert_eq!(de, cfg);
    }
}
