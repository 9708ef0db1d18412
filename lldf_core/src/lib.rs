//! # lldf_core - Live-Load Distribution Factor Engine
//!
//! `lldf_core` resolves AASHTO LRFD live-load distribution factors for
//! girder bridges, with a clean, JSON-serializable API. Callers supply the
//! bridge geometry through the [`BridgeModel`] trait and the edition
//! equation tables through [`CodeEquations`]; the engine handles
//! classification, candidate selection, the override ladder, skew
//! correction, and fatigue, and reports how every value was obtained.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure resolution over borrowed model and tables; identical
//!   requests give identical results
//! - **JSON-First**: All result and error types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Auditable**: Every discarded candidate and applied override stays
//!   visible in the result
//!
//! ## Quick Start
//!
//! ```rust
//! use lldf_core::{
//!     BridgeDescription, CandidateResult, CodeEquations, DesignCode, DfContext, DfLocation,
//!     DistributionFactorEngine, EquationFamily, ForceEffect, LoadedLanes, SectionProperties,
//!     SpanDescription,
//! };
//!
//! // Equation tables come from the caller; fixed values stand in for a
//! // full edition table set here.
//! struct Tables;
//!
//! impl CodeEquations for Tables {
//!     fn evaluate_equation(
//!         &self,
//!         _family: EquationFamily,
//!         _ctx: &DfContext,
//!         _effect: ForceEffect,
//!         lanes: LoadedLanes,
//!     ) -> CandidateResult {
//!         match lanes {
//!             LoadedLanes::One => CandidateResult::applied(0.46),
//!             LoadedLanes::TwoPlus => CandidateResult::applied(0.64),
//!         }
//!     }
//!
//!     fn evaluate_lever_rule(
//!         &self,
//!         _ctx: &DfContext,
//!         _effect: ForceEffect,
//!         _lanes: LoadedLanes,
//!     ) -> CandidateResult {
//!         CandidateResult::applied(0.50)
//!     }
//!
//!     fn evaluate_rigid_method(
//!         &self,
//!         _ctx: &DfContext,
//!         _effect: ForceEffect,
//!         _lanes: LoadedLanes,
//!     ) -> CandidateResult {
//!         CandidateResult::unused()
//!     }
//!
//!     fn in_range_of_applicability(&self, _ctx: &DfContext, _effect: ForceEffect) -> bool {
//!         true
//!     }
//!
//!     fn skew_correction_factor(&self, _ctx: &DfContext, _effect: ForceEffect) -> f64 {
//!         1.0
//!     }
//! }
//!
//! // Single 120 ft span, five girder lines at 6 ft, three design lanes
//! let section = SectionProperties {
//!     moment_of_inertia_in4: 260_730.0,
//!     area_in2: 789.0,
//!     eccentricity_in: 30.8,
//!     modular_ratio: 1.0,
//!     torsional_constant_in4: Some(16_000.0),
//!     box_walls: None,
//! };
//! let bridge = BridgeDescription::new(
//!     "I-5 overcrossing",
//!     vec![SpanDescription::new(120.0)],
//!     5,
//!     6.0,
//!     section,
//! )
//! .with_lanes(3, 12.0);
//!
//! let tables = Tables;
//! let engine = DistributionFactorEngine::new(&bridge, &tables, DesignCode::default());
//! let factors = engine
//!     .compute_distribution_factors(DfLocation::Span { span: 0 }, 2)
//!     .unwrap();
//!
//! assert_eq!(factors.moment.governing_mg(), 0.64);
//! assert_eq!(factors.moment.fatigue_factor, 0.46 / 1.2);
//! ```
//!
//! ## Modules
//!
//! - [`codes`] - Design code editions, owner variants, and tolerances
//! - [`context`] - Force effects, locations, and the assembled parameter context
//! - [`distribution`] - The resolution pipeline and engine
//! - [`errors`] - Structured error types
//! - [`model`] - The [`BridgeModel`] trait and the self-contained [`BridgeDescription`]
//! - [`provider`] - The [`CodeEquations`] provider trait and candidate results

pub mod codes;
pub mod context;
pub mod distribution;
pub mod errors;
pub mod model;
pub mod provider;

// Re-export commonly used types at crate root for convenience
pub use codes::{CodeVariant, DesignCode, LrfdEdition};
pub use context::{DfContext, DfLocation, ForceEffect, LoadedLanes, PierFace};
pub use distribution::{
    assemble_context, classify, evaluate_candidates, resolve, apply_skew_correction,
    girder_line_locations, CandidateSet, DistributionFactorEngine, DistributionFactors,
    EffectFactors, MethodTag, Resolution, ResolvedFactor, StrategySelection,
};
pub use errors::{LldfError, LldfResult};
pub use model::{BridgeDescription, BridgeModel, SectionProperties, SpanDescription};
pub use provider::{CandidateResult, CodeEquations, EquationFamily};
