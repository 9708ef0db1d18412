//! # Candidate Method Evaluator
//!
//! Invokes the candidate strategies for one (force effect, lane case)
//! request and collects their results into a [`CandidateSet`].
//!
//! ## Overview
//!
//! Up to four candidates compete for the controlling factor:
//!
//! - **Equation**: the provider's closed-form table value for the selected
//!   family; always invoked.
//! - **Lever rule**: the statics fallback; invoked for exterior girders as
//!   the required companion check, and for any girder whose equation
//!   reported itself unused.
//! - **Rigid method**: the stiffness-weighted whole-section share; invoked
//!   for multi-lane cases on adjacent sections acting as a unit.
//! - **Lanes over beams**: the loaded-lanes-per-girder floor, computed here
//!   without the provider. Recorded as unused until resolution retains it.
//!
//! Strategies that were not invoked, or declined the context, still appear
//! in the set as unused candidates so reports can show the full picture.

use serde::{Deserialize, Serialize};

use crate::context::{DfContext, LoadedLanes};
use crate::distribution::classify::StrategySelection;
use crate::provider::{CandidateResult, CodeEquations, EquationFamily};

/// Results of every candidate strategy for one (force effect, lane case)
/// request, invoked or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSet {
    /// Closed-form table equation for the selected family
    pub equation: CandidateResult,
    /// Statics-based lever rule
    pub lever_rule: CandidateResult,
    /// Rigid cross-section method
    pub rigid_method: CandidateResult,
    /// Loaded lanes divided by girder lines. `was_used` is set only when
    /// resolution retains it as the floor
    pub lanes_over_beams: CandidateResult,
}

/// Evaluate the candidate strategies for one lane case of the context's
/// force effect.
///
/// Provider calls are pure, so the returned set depends only on the
/// arguments and evaluation order does not matter.
pub fn evaluate_candidates<P: CodeEquations>(
    provider: &P,
    selection: &StrategySelection,
    ctx: &DfContext,
    lanes: LoadedLanes,
) -> CandidateSet {
    let effect = ctx.force_effect;
    let equation = provider.evaluate_equation(selection.family, ctx, effect, lanes);

    // The exterior tables lean on the lever rule as a companion check; for
    // everyone else it is the fallback when the table has no entry
    let lever_rule = if ctx.is_exterior || !equation.was_used {
        provider.evaluate_lever_rule(ctx, effect, lanes)
    } else {
        CandidateResult::unused()
    };

    // Only a section that rotates as a unit can be distributed rigidly, and
    // the code invokes the method for the multi-lane case
    let rigid_method = if selection.family == EquationFamily::AdjacentBoxUnit
        && lanes == LoadedLanes::TwoPlus
    {
        provider.evaluate_rigid_method(ctx, effect, lanes)
    } else {
        CandidateResult::unused()
    };

    CandidateSet {
        equation,
        lever_rule,
        rigid_method,
        lanes_over_beams: lanes_over_beams(ctx, lanes),
    }
}

/// The loaded-lanes-over-girder-lines floor candidate.
///
/// Starts unused; resolution flips the flag if the floor ends up
/// controlling.
fn lanes_over_beams(ctx: &DfContext, lanes: LoadedLanes) -> CandidateResult {
    let loaded = lanes.design_lane_count(ctx.lane_count) as f64;
    CandidateResult {
        was_used: false,
        raw_factor: loaded / ctx.girder_count as f64,
        exterior_multiplier: None,
        terms: Vec::new(),
    }
}
