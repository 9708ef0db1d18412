//! # Live-Load Distribution Factor Pipeline
//!
//! Resolution of girder distribution factors, from model geometry to final
//! skew-corrected values.
//!
//! ## Overview
//!
//! A request runs through six stages, each its own module:
//!
//! 1. [`assemble`] pulls geometry and section properties out of the bridge
//!    model into a flat [`DfContext`](crate::context::DfContext), rounding
//!    spacing-derived inputs to the code tolerance.
//! 2. [`classify`] maps the cross section onto an equation family and
//!    captures the code-variant strategy adjustments.
//! 3. [`evaluate`] runs every potentially applicable method through the
//!    [`CodeEquations`](crate::provider::CodeEquations) provider and
//!    records the candidates.
//! 4. [`resolve`] picks the controlling value and applies the override
//!    ladder: exterior-not-below-interior, moment substitution for
//!    out-of-range shear, and the lanes-over-beams floor.
//! 5. [`skew`] applies the skew correction, honoring exemptions and
//!    variant waivers, and re-checks the floor on the corrected value.
//! 6. [`engine`] orchestrates the stages per (location, girder) request
//!    and folds in the governing lane case and the fatigue factor.
//!
//! Most callers only need [`DistributionFactorEngine`]; the stage
//! functions are public for audit tooling that wants to replay a single
//! step.

pub mod assemble;
pub mod classify;
pub mod engine;
pub mod evaluate;
pub mod resolve;
pub mod skew;

pub use assemble::{assemble_context, longitudinal_stiffness_parameter};
pub use classify::{classify, StrategySelection};
pub use engine::{
    girder_line_locations, DistributionFactorEngine, DistributionFactors, EffectFactors,
};
pub use evaluate::{evaluate_candidates, CandidateSet};
pub use resolve::{resolve, MethodTag, Resolution};
pub use skew::{apply_skew_correction, ResolvedFactor};
