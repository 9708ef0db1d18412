//! # Code Equation Provider
//!
//! Boundary trait for the closed-form distribution factor equations.
//!
//! ## Overview
//!
//! The numeric content of the LRFD distribution factor tables lives outside
//! this crate. The engine decides *which* equations apply, in *what order*
//! candidates are compared, and *which overrides* fire; the
//! [`CodeEquations`] implementation supplies the table values themselves.
//! Every provider call is pure: same context in, same candidate out, with no
//! side effects. A strategy that does not apply to a context reports itself
//! unused rather than failing.
//!
//! ## Reference
//!
//! LRFD Tables 4.6.2.2.2b-1 through 4.6.2.2.3c-1.

use serde::{Deserialize, Serialize};

use crate::codes::lrfd_ref;
use crate::context::{DfContext, ForceEffect, LoadedLanes};

// ============================================================================
// Equation Families
// ============================================================================

/// Equation family keyed by the cross-section type letter of
/// LRFD Table 4.6.2.2.1-1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationFamily {
    /// Precast box beams spread apart, with a cast-in-place slab (type b)
    SpreadBox,
    /// Adjacent boxes connected only enough to prevent relative vertical
    /// displacement (type f)
    AdjacentBoxKeyed,
    /// Adjacent boxes connected sufficiently to act as a unit (type g)
    AdjacentBoxUnit,
    /// I-beams and bulb tees with a composite deck (type k)
    IBeam,
}

impl EquationFamily {
    /// All equation families
    pub const ALL: [EquationFamily; 4] = [
        EquationFamily::SpreadBox,
        EquationFamily::AdjacentBoxKeyed,
        EquationFamily::AdjacentBoxUnit,
        EquationFamily::IBeam,
    ];

    /// Cross-section type letter used by the code tables
    pub fn type_letter(&self) -> char {
        match self {
            EquationFamily::SpreadBox => 'b',
            EquationFamily::AdjacentBoxKeyed => 'f',
            EquationFamily::AdjacentBoxUnit => 'g',
            EquationFamily::IBeam => 'k',
        }
    }

    /// Display name for UI and reports
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationFamily::SpreadBox => "spread box beams (type b)",
            EquationFamily::AdjacentBoxKeyed => "adjacent boxes with shear keys (type f)",
            EquationFamily::AdjacentBoxUnit => "adjacent boxes acting as a unit (type g)",
            EquationFamily::IBeam => "I-beams (type k)",
        }
    }

    /// Code reference for the family table
    pub fn code_reference(&self) -> &'static str {
        lrfd_ref::CROSS_SECTION_TYPES
    }
}

impl std::fmt::Display for EquationFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Candidate Results
// ============================================================================

/// A named intermediate term reported by a strategy, for audit and reports
/// only. Resolution never reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuxTerm {
    /// Symbol as printed in the code tables ("e", "Kg", "de", ...)
    pub symbol: String,
    /// Value of the term
    pub value: f64,
}

impl AuxTerm {
    /// Create an auxiliary term
    pub fn new(symbol: impl Into<String>, value: f64) -> Self {
        AuxTerm {
            symbol: symbol.into(),
            value,
        }
    }

    /// Citation for the term's derivation, for the symbols whose values the
    /// assembler computes. Table inputs like "S" or "de" have no derivation
    /// of their own and return `None`.
    pub fn code_reference(&self) -> Option<&'static str> {
        match self.symbol.as_str() {
            "Kg" => Some(lrfd_ref::STIFFNESS_PARAMETER),
            "J" => Some(lrfd_ref::TORSIONAL_CONSTANT),
            _ => None,
        }
    }
}

/// Output of one strategy for one (force effect, lane case) combination.
///
/// `raw_factor` is the distribution factor before skew correction. For
/// equation-based exterior girder results, `raw_factor` already includes the
/// exterior multiplier `e`; the multiplier is reported separately for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    /// Whether the strategy applied to this context at all
    pub was_used: bool,
    /// Distribution factor before skew correction
    pub raw_factor: f64,
    /// Exterior adjustment multiplier e, equation-based exterior results only
    pub exterior_multiplier: Option<f64>,
    /// Intermediate terms for audit and reports
    pub terms: Vec<AuxTerm>,
}

impl CandidateResult {
    /// A strategy that did not apply to the context
    pub fn unused() -> Self {
        CandidateResult {
            was_used: false,
            raw_factor: 0.0,
            exterior_multiplier: None,
            terms: Vec::new(),
        }
    }

    /// A strategy that applied and produced the given raw factor
    pub fn applied(raw_factor: f64) -> Self {
        CandidateResult {
            was_used: true,
            raw_factor,
            exterior_multiplier: None,
            terms: Vec::new(),
        }
    }

    /// Attach the exterior multiplier e (builder pattern)
    pub fn with_exterior_multiplier(mut self, e: f64) -> Self {
        self.exterior_multiplier = Some(e);
        self
    }

    /// Attach an audit term (builder pattern)
    pub fn with_term(mut self, symbol: impl Into<String>, value: f64) -> Self {
        self.terms.push(AuxTerm::new(symbol, value));
        self
    }
}

impl Default for CandidateResult {
    fn default() -> Self {
        CandidateResult::unused()
    }
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Closed-form code equation evaluation, supplied by the host application.
///
/// Implementations must be pure functions of their arguments. The engine
/// calls them once per applicable strategy per (effect, lane case) and never
/// caches across requests, so determinism of the final factors rests on
/// determinism here.
pub trait CodeEquations {
    /// Distribution factor from the code table for the selected equation
    /// family.
    ///
    /// For exterior girders (`ctx.is_exterior`), the returned `raw_factor`
    /// must already include the exterior multiplier `e`, with `e` also
    /// reported via `exterior_multiplier`. Return
    /// [`CandidateResult::unused`] when the table has no entry for this
    /// combination.
    fn evaluate_equation(
        &self,
        family: EquationFamily,
        ctx: &DfContext,
        effect: ForceEffect,
        lanes: LoadedLanes,
    ) -> CandidateResult;

    /// Statics-based lever rule distribution (LRFD C4.6.2.2.1), treating the
    /// deck as a rigid bar simply supported on the girders and loaded by
    /// wheel lines at the code-mandated transverse offsets
    fn evaluate_lever_rule(
        &self,
        ctx: &DfContext,
        effect: ForceEffect,
        lanes: LoadedLanes,
    ) -> CandidateResult;

    /// Rigid cross-section distribution (LRFD C4.6.2.2.2d), a stiffness
    /// weighted share across all girders. Only invoked for multi-lane cases
    /// on adjacent sections acting as a unit
    fn evaluate_rigid_method(
        &self,
        ctx: &DfContext,
        effect: ForceEffect,
        lanes: LoadedLanes,
    ) -> CandidateResult;

    /// Whether the section stiffness (I, J) lies inside the validated range
    /// of applicability for this effect's equation. When this reports
    /// `false` for shear, the resolver discards the shear equation result
    /// and substitutes the resolved moment factor
    fn in_range_of_applicability(&self, ctx: &DfContext, effect: ForceEffect) -> bool;

    /// Skew correction factor for the given effect (LRFD Tables 4.6.2.2.2e-1
    /// and 4.6.2.2.3c-1). Called only when the resolved path is subject to
    /// skew correction
    fn skew_correction_factor(&self, ctx: &DfContext, effect: ForceEffect) -> f64;
}
