//! # Design Code Selection
//!
//! Design code editions and owner-agency variants per AASHTO LRFD Bridge
//! Design Specifications, Section 4.6.2.2.
//!
//! ## Overview
//!
//! Distribution factor resolution is driven by a [`DesignCode`]: the LRFD
//! edition in force plus an optional owner-agency variant. Variants never add
//! new strategies; they waive or force steps of the shared pipeline:
//!
//! | Variant | Behavior |
//! |---------|----------|
//! | AASHTO  | Baseline LRFD rules, no waivers |
//! | WSDOT   | Exterior girder treated as interior when the overhang is at most half the average girder spacing |
//! | TxDOT   | Adjacent members always classified as connected-as-unit; moment skew correction waived |
//!
//! ## Reference
//!
//! AASHTO LRFD, Section 4.6.2.2: Beam-Slab Bridges

use serde::{Deserialize, Serialize};

// ============================================================================
// LRFD Code Section References
// ============================================================================

/// LRFD code section references for distribution factor resolution.
///
/// These constants provide traceable references to the AASHTO LRFD Bridge
/// Design Specifications.
pub mod lrfd_ref {
    // Classification and stiffness
    /// Common deck superstructure cross sections
    pub const CROSS_SECTION_TYPES: &str = "LRFD Table 4.6.2.2.1-1";
    /// Longitudinal stiffness parameter Kg
    pub const STIFFNESS_PARAMETER: &str = "LRFD Eq. 4.6.2.2.1-1";
    /// Torsional constant for closed thin-walled shapes
    pub const TORSIONAL_CONSTANT: &str = "LRFD Eq. C4.6.2.2.1-3";
    /// Lever rule fallback
    pub const LEVER_RULE: &str = "LRFD C4.6.2.2.1";

    // Distribution factor tables
    /// Moment in interior beams
    pub const MOMENT_INTERIOR: &str = "LRFD Table 4.6.2.2.2b-1";
    /// Moment in exterior beams
    pub const MOMENT_EXTERIOR: &str = "LRFD Table 4.6.2.2.2d-1";
    /// Shear in interior beams
    pub const SHEAR_INTERIOR: &str = "LRFD Table 4.6.2.2.3a-1";
    /// Shear in exterior beams
    pub const SHEAR_EXTERIOR: &str = "LRFD Table 4.6.2.2.3b-1";
    /// Rigid cross section method for exterior beams
    pub const RIGID_METHOD: &str = "LRFD C4.6.2.2.2d";

    // Corrections
    /// Skew correction for moment
    pub const SKEW_MOMENT: &str = "LRFD Table 4.6.2.2.2e-1";
    /// Skew correction for shear at the obtuse corner
    pub const SKEW_SHEAR: &str = "LRFD Table 4.6.2.2.3c-1";

    // Live load model
    /// Multiple presence factors
    pub const MULTIPLE_PRESENCE: &str = "LRFD 3.6.1.1.2";
    /// Fatigue load, single design truck
    pub const FATIGUE_LOAD: &str = "LRFD 3.6.1.4";
}

/// Multiple presence factor for one loaded lane per LRFD Table 3.6.1.1.2-1.
///
/// The fatigue load is a single truck without multiple presence, so fatigue
/// distribution factors are obtained by dividing the governing single-lane
/// factor by this value.
pub const FATIGUE_SINGLE_LANE_MPF: f64 = 1.2;

/// Default tolerance for rounding assembled lengths, in feet (about 1/800 in).
///
/// Spacing, overhang, and span length comparisons are performed on rounded
/// values so that variant thresholds like the WSDOT overhang rule do not flip
/// on floating point noise.
pub const DEFAULT_SPACING_TOLERANCE_FT: f64 = 1.0e-4;

/// AASHTO LRFD edition in force for a resolution run.
///
/// Editions are ordered, so providers can gate equation changes with
/// comparisons like `edition >= LrfdEdition::FourthEdition2007`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum LrfdEdition {
    /// 2nd Edition (1998) with interims
    SecondEdition1998,
    /// 3rd Edition (2004)
    ThirdEdition2004,
    /// 4th Edition (2007)
    FourthEdition2007,
    /// 5th Edition (2010)
    FifthEdition2010,
    /// 6th Edition (2012)
    SixthEdition2012,
    /// 7th Edition (2014)
    SeventhEdition2014,
    /// 8th Edition (2017)
    EighthEdition2017,
    /// 9th Edition (2020)
    #[default]
    NinthEdition2020,
}

impl LrfdEdition {
    /// All editions for UI selection, oldest first
    pub const ALL: [LrfdEdition; 8] = [
        LrfdEdition::SecondEdition1998,
        LrfdEdition::ThirdEdition2004,
        LrfdEdition::FourthEdition2007,
        LrfdEdition::FifthEdition2010,
        LrfdEdition::SixthEdition2012,
        LrfdEdition::SeventhEdition2014,
        LrfdEdition::EighthEdition2017,
        LrfdEdition::NinthEdition2020,
    ];

    /// Publication year of the edition
    pub fn year(&self) -> u16 {
        match self {
            LrfdEdition::SecondEdition1998 => 1998,
            LrfdEdition::ThirdEdition2004 => 2004,
            LrfdEdition::FourthEdition2007 => 2007,
            LrfdEdition::FifthEdition2010 => 2010,
            LrfdEdition::SixthEdition2012 => 2012,
            LrfdEdition::SeventhEdition2014 => 2014,
            LrfdEdition::EighthEdition2017 => 2017,
            LrfdEdition::NinthEdition2020 => 2020,
        }
    }

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            LrfdEdition::SecondEdition1998 => "AASHTO LRFD 2nd Edition (1998)",
            LrfdEdition::ThirdEdition2004 => "AASHTO LRFD 3rd Edition (2004)",
            LrfdEdition::FourthEdition2007 => "AASHTO LRFD 4th Edition (2007)",
            LrfdEdition::FifthEdition2010 => "AASHTO LRFD 5th Edition (2010)",
            LrfdEdition::SixthEdition2012 => "AASHTO LRFD 6th Edition (2012)",
            LrfdEdition::SeventhEdition2014 => "AASHTO LRFD 7th Edition (2014)",
            LrfdEdition::EighthEdition2017 => "AASHTO LRFD 8th Edition (2017)",
            LrfdEdition::NinthEdition2020 => "AASHTO LRFD 9th Edition (2020)",
        }
    }
}

impl std::fmt::Display for LrfdEdition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Owner-agency variant layered on top of the LRFD edition.
///
/// Variants adjust classification and correction steps of the pipeline;
/// candidate strategies and the resolution order are shared by all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CodeVariant {
    /// Baseline AASHTO LRFD rules with no owner waivers
    #[default]
    Aashto,

    /// Washington State DOT Bridge Design Manual practice.
    /// Exterior girders with a narrow overhang are designed with the
    /// interior girder factors.
    Wsdot,

    /// Texas DOT Bridge Design Manual practice.
    /// Adjacent members are taken as sufficiently connected to act as a
    /// unit, and the moment skew correction is not applied.
    Txdot,
}

impl CodeVariant {
    /// All variants for UI selection
    pub const ALL: [CodeVariant; 3] = [CodeVariant::Aashto, CodeVariant::Wsdot, CodeVariant::Txdot];

    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            CodeVariant::Aashto => "AASHTO",
            CodeVariant::Wsdot => "WSDOT",
            CodeVariant::Txdot => "TxDOT",
        }
    }
}

impl std::fmt::Display for CodeVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Design code configuration for a resolution run.
///
/// Carried explicitly through the pipeline rather than read from any global
/// state, so two runs with different codes can share a process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignCode {
    /// LRFD edition in force
    pub edition: LrfdEdition,
    /// Owner-agency variant
    pub variant: CodeVariant,
    /// Tolerance for rounding assembled lengths, in feet
    pub spacing_tolerance_ft: f64,
}

impl Default for DesignCode {
    fn default() -> Self {
        DesignCode {
            edition: LrfdEdition::default(),
            variant: CodeVariant::default(),
            spacing_tolerance_ft: DEFAULT_SPACING_TOLERANCE_FT,
        }
    }
}

impl DesignCode {
    /// Create a design code with the default rounding tolerance
    pub fn new(edition: LrfdEdition, variant: CodeVariant) -> Self {
        DesignCode {
            edition,
            variant,
            spacing_tolerance_ft: DEFAULT_SPACING_TOLERANCE_FT,
        }
    }

    /// Set the edition (builder pattern)
    pub fn with_edition(mut self, edition: LrfdEdition) -> Self {
        self.edition = edition;
        self
    }

    /// Set the variant (builder pattern)
    pub fn with_variant(mut self, variant: CodeVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the rounding tolerance in feet (builder pattern)
    pub fn with_spacing_tolerance(mut self, tolerance_ft: f64) -> Self {
        self.spacing_tolerance_ft = tolerance_ft;
        self
    }

    /// Whether adjacent members are always classified as connected-as-unit,
    /// regardless of the modeled connectivity (TxDOT practice)
    pub fn forces_connected_as_unit(&self) -> bool {
        self.variant == CodeVariant::Txdot
    }

    /// Whether the moment skew correction is waived (TxDOT practice)
    pub fn waives_moment_skew(&self) -> bool {
        self.variant == CodeVariant::Txdot
    }

    /// Whether an exterior girder with an overhang at most half the average
    /// girder spacing is designed with interior girder factors (WSDOT practice)
    pub fn treats_narrow_overhang_as_interior(&self) -> bool {
        self.variant == CodeVariant::Wsdot
    }
}
