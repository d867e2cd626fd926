//! Image header as reported by `mrinfo -json_all`, and the stride
//! arithmetic used to lay out the output mask like the input series.

use crate::error::{MaskError, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Strides requested when staging images for ANTs (RAS, contiguous x).
pub const CANONICAL_STRIDES: &str = "+1,+2,+3";

/// The part of an `mrinfo -json_all` header this crate reads. Every other
/// field (spacing may hold `null` for a NaN volume axis) is ignored.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImageHeader {
    pub strides: Vec<i64>,
}

impl ImageHeader {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Strides for a 3D image derived from this header's spatial axes.
    pub fn spatial_strides(&self) -> Result<Strides> {
        spatial_strides(&self.strides)
    }
}

/// Per-axis stride list, formatted the way MRtrix3 accepts it on the
/// command line (`-1,2,3`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strides(Vec<i64>);

impl fmt::Display for Strides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

/// Keeps the first three strides and renumbers them so the fastest of
/// them becomes 1, preserving order and sign.
pub fn spatial_strides(strides: &[i64]) -> Result<Strides> {
    if strides.len() < 3 {
        return Err(MaskError::Header(format!(
            "expected at least 3 strides, found {}",
            strides.len()
        )));
    }
    let spatial = &strides[..3];
    if spatial.contains(&0) {
        return Err(MaskError::Header(format!(
            "invalid zero stride in {:?}",
            spatial
        )));
    }

    let min_abs = spatial.iter().map(|s| s.abs()).min().unwrap_or(1);
    let renumbered = spatial
        .iter()
        .map(|&s| (s.abs() + 1 - min_abs) * s.signum())
        .collect();
    Ok(Strides(renumbered))
}
