//! # Resolution Context
//!
//! The assembled per-request context for distribution factor resolution.
//!
//! ## Overview
//!
//! A [`DfContext`] is a flat snapshot of everything one resolution needs:
//! which girder and location, the force effect, roadway and framing geometry,
//! section stiffness, and the design code in force. It is assembled once per
//! (location, girder, effect) request and then treated as read-only by the
//! classification, evaluation, and resolution steps.
//!
//! Lengths are stored already rounded to the design code tolerance, so every
//! comparison downstream (overhang thresholds, spacing checks) sees the same
//! stable values.

use serde::{Deserialize, Serialize};

use crate::codes::DesignCode;
use crate::errors::{LldfError, LldfResult};
use crate::model::{BeamArrangement, CrossSectionFamily, DeckType};

// ============================================================================
// Request Enums
// ============================================================================

/// Force effect a distribution factor applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ForceEffect {
    /// Bending moment
    #[default]
    Moment,
    /// Shear
    Shear,
    /// Support reaction
    Reaction,
}

impl ForceEffect {
    /// All force effects, in resolution order
    pub const ALL: [ForceEffect; 3] = [ForceEffect::Moment, ForceEffect::Shear, ForceEffect::Reaction];

    /// Display name for UI and error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            ForceEffect::Moment => "moment",
            ForceEffect::Shear => "shear",
            ForceEffect::Reaction => "reaction",
        }
    }
}

impl std::fmt::Display for ForceEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Loaded lane case per LRFD Table 3.6.1.1.2-1.
///
/// Distribution factors are resolved separately for one loaded lane and for
/// two or more loaded lanes; the governing factor is the larger of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LoadedLanes {
    /// One design lane loaded
    One,
    /// Two or more design lanes loaded
    #[default]
    TwoPlus,
}

impl LoadedLanes {
    /// Both lane cases, in resolution order
    pub const ALL: [LoadedLanes; 2] = [LoadedLanes::One, LoadedLanes::TwoPlus];

    /// Number of design lanes this case loads, given the total available
    pub fn design_lane_count(&self, total_lanes: usize) -> usize {
        match self {
            LoadedLanes::One => 1,
            LoadedLanes::TwoPlus => total_lanes,
        }
    }

    /// Display name for UI and error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            LoadedLanes::One => "1 loaded lane",
            LoadedLanes::TwoPlus => "2+ loaded lanes",
        }
    }
}

impl std::fmt::Display for LoadedLanes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Side of a pier a shear request refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PierFace {
    /// Face toward the preceding span (up-station end of that span)
    Back,
    /// Face toward the following span (down-station end of that span)
    Ahead,
}

impl PierFace {
    /// Display name for UI and error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            PierFace::Back => "back face",
            PierFace::Ahead => "ahead face",
        }
    }
}

impl std::fmt::Display for PierFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Location a distribution factor request refers to.
///
/// Span and pier indexes are zero-based. A bridge with `n` spans has `n + 1`
/// piers; pier `0` and pier `n` are the abutments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DfLocation {
    /// A span, measured at the controlling fraction for the force effect
    Span { span: usize },
    /// One face of a pier (shear on either side of an interior support)
    PierFace { pier: usize, face: PierFace },
    /// Total reaction at a pier
    PierReaction { pier: usize },
}

impl std::fmt::Display for DfLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DfLocation::Span { span } => write!(f, "span {span}"),
            DfLocation::PierFace { pier, face } => write!(f, "pier {pier} {face}"),
            DfLocation::PierReaction { pier } => write!(f, "pier {pier} reaction"),
        }
    }
}

// ============================================================================
// Length Rounding
// ============================================================================

/// Round a length to the given tolerance.
///
/// A non-positive tolerance disables rounding. Two inputs that round to the
/// same multiple of the tolerance compare bit-identical afterwards, which is
/// what keeps threshold comparisons (overhang vs. half spacing) stable.
pub fn round_to_tolerance(value: f64, tolerance: f64) -> f64 {
    if tolerance <= 0.0 {
        return value;
    }
    (value / tolerance).round() * tolerance
}

// ============================================================================
// Assembled Context
// ============================================================================

/// Snapshot of one resolution request: girder, location, effect, geometry,
/// stiffness, and design code.
///
/// All lengths are in feet and already rounded to
/// [`DesignCode::spacing_tolerance_ft`]; section properties are in inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DfContext {
    /// Location the request refers to
    pub location: DfLocation,
    /// Zero-based girder line index, counted from the left edge
    pub girder_index: usize,
    /// Force effect being distributed
    pub force_effect: ForceEffect,

    // Roadway
    /// Number of girder lines in the cross section
    pub girder_count: usize,
    /// Number of design lanes on the roadway
    pub lane_count: usize,
    /// Design lane width, ft
    pub lane_width_ft: f64,

    // Framing geometry (rounded)
    /// Length of the span the controlling location falls in, ft
    pub span_length_ft: f64,
    /// Average girder spacing across the section, ft
    pub avg_spacing_ft: f64,
    /// Individual girder spacings, left to right, ft (`girder_count - 1` entries)
    pub spacing_ft: Vec<f64>,
    /// Left deck overhang beyond the left exterior girder, ft
    pub left_overhang_ft: f64,
    /// Right deck overhang beyond the right exterior girder, ft
    pub right_overhang_ft: f64,
    /// Skew angle at the start of the controlling span, degrees
    pub skew_start_deg: f64,
    /// Skew angle at the end of the controlling span, degrees
    pub skew_end_deg: f64,

    // Section stiffness
    /// Moment of inertia of the girder, in^4
    pub moment_of_inertia_in4: f64,
    /// Cross-sectional area of the girder, in^2
    pub area_in2: f64,
    /// Distance between girder and deck centroids, in
    pub eccentricity_in: f64,
    /// Modular ratio between girder and deck materials
    pub modular_ratio: f64,
    /// St. Venant torsional constant, in^4
    pub torsional_constant_in4: f64,
    /// Longitudinal stiffness parameter Kg, in^4
    pub stiffness_parameter_in4: f64,

    // Classification inputs
    /// Whether the girder is an edge girder of the cross section
    pub is_exterior: bool,
    /// Whether adjacent members are connected to act as a unit
    pub is_connected_as_unit: bool,
    /// Deck type over the girders
    pub deck: DeckType,
    /// Adjacent or spread arrangement
    pub arrangement: BeamArrangement,
    /// Structural family of the girder section
    pub family: CrossSectionFamily,

    /// Design code in force
    pub code: DesignCode,
}

impl DfContext {
    /// Mean of the start and end skew angles, degrees
    pub fn avg_skew_deg(&self) -> f64 {
        (self.skew_start_deg + self.skew_end_deg) / 2.0
    }

    /// Deck overhang on this girder's side, if it is an exterior girder
    pub fn exterior_overhang_ft(&self) -> Option<f64> {
        if self.girder_index == 0 {
            Some(self.left_overhang_ft)
        } else if self.girder_count > 0 && self.girder_index == self.girder_count - 1 {
            Some(self.right_overhang_ft)
        } else {
            None
        }
    }

    /// Clone of this context with the girder treated as interior.
    ///
    /// Used when an owner variant designs a narrow-overhang exterior girder
    /// with the interior girder rules.
    pub fn as_interior(&self) -> DfContext {
        let mut ctx = self.clone();
        ctx.is_exterior = false;
        ctx
    }

    /// Validate the assembled context.
    ///
    /// Violations report [`LldfError::GeometryUnavailable`] naming this
    /// context's location and girder.
    pub fn validate(&self) -> LldfResult<()> {
        let fail = |reason: &str| {
            Err(LldfError::geometry_unavailable(
                self.location.to_string(),
                self.girder_index,
                reason,
            ))
        };

        if self.girder_count < 2 {
            return fail("at least two girder lines are required");
        }
        if self.girder_index >= self.girder_count {
            return fail("girder index is out of range");
        }
        if self.spacing_ft.len() != self.girder_count - 1 {
            return fail("spacing list does not match the girder count");
        }
        if !(self.span_length_ft.is_finite() && self.span_length_ft > 0.0) {
            return fail("span length must be positive");
        }
        if !(self.avg_spacing_ft.is_finite() && self.avg_spacing_ft > 0.0) {
            return fail("girder spacing must be positive");
        }
        if self.spacing_ft.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return fail("every girder spacing must be positive");
        }
        if !(self.left_overhang_ft.is_finite() && self.left_overhang_ft >= 0.0)
            || !(self.right_overhang_ft.is_finite() && self.right_overhang_ft >= 0.0)
        {
            return fail("deck overhangs must be non-negative");
        }
        if self.lane_count == 0 {
            return fail("at least one design lane is required");
        }
        if !(self.lane_width_ft.is_finite() && self.lane_width_ft > 0.0) {
            return fail("lane width must be positive");
        }
        if self.skew_start_deg.abs() >= 90.0 || self.skew_end_deg.abs() >= 90.0 {
            return fail("skew angles must be less than 90 degrees");
        }
        if !(self.moment_of_inertia_in4.is_finite() && self.moment_of_inertia_in4 > 0.0) {
            return fail("moment of inertia must be positive");
        }
        if !(self.area_in2.is_finite() && self.area_in2 > 0.0) {
            return fail("section area must be positive");
        }
        if !(self.modular_ratio.is_finite() && self.modular_ratio > 0.0) {
            return fail("modular ratio must be positive");
        }
        if !(self.torsional_constant_in4.is_finite() && self.torsional_constant_in4 >= 0.0) {
            return fail("torsional constant must be non-negative");
        }
        Ok(())
    }
}
