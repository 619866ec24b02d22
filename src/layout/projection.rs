//! The five tree projections.

use crate::error::PhyloError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geometric projection of a tree.
///
/// Deserialises from the full lowercase name or the two-letter code
/// (`rc`, `hr`, `dg`, `rd`, `cr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    /// Root on the left, leaves stacked vertically
    #[default]
    #[serde(alias = "rc")]
    Rectangular,
    /// Root on top, leaves stacked horizontally
    #[serde(alias = "hr")]
    Hierarchical,
    /// Depth given by subtree size instead of branch length
    #[serde(alias = "dg")]
    Diagonal,
    /// Unrooted, subtrees fanned out by leaf weight
    #[serde(alias = "rd")]
    Radial,
    /// Root in the centre, leaves on concentric arcs
    #[serde(alias = "cr")]
    Circular,
}

impl Projection {
    /// All projections, in declaration order.
    pub const ALL: [Projection; 5] = [
        Projection::Rectangular,
        Projection::Hierarchical,
        Projection::Diagonal,
        Projection::Radial,
        Projection::Circular,
    ];

    /// Two-letter code of this projection.
    pub fn code(&self) -> &'static str {
        match self {
            Projection::Rectangular => "rc",
            Projection::Hierarchical => "hr",
            Projection::Diagonal => "dg",
            Projection::Radial => "rd",
            Projection::Circular => "cr",
        }
    }

    /// Returns whether nodes are placed by angle (radial and circular).
    pub fn is_polar(&self) -> bool {
        matches!(self, Projection::Radial | Projection::Circular)
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Projection::Rectangular => "rectangular",
            Projection::Hierarchical => "hierarchical",
            Projection::Diagonal => "diagonal",
            Projection::Radial => "radial",
            Projection::Circular => "circular",
        };
        f.write_str(name)
    }
}

impl FromStr for Projection {
    type Err = PhyloError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Projection::ALL
            .into_iter()
            .find(|p| p.code() == lower || p.to_string() == lower)
            .ok_or_else(|| PhyloError::InvalidConfig(format!("unknown projection '{s}'")))
    }
}
