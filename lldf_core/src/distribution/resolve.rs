//! # Controlling-Value Resolver
//!
//! Reduces a [`CandidateSet`] to a single controlling factor plus a record
//! of how it was chosen.
//!
//! ## Overview
//!
//! Resolution applies, in order:
//!
//! 1. Candidates that did not apply are discarded.
//! 2. The largest of equation, lever rule, and rigid method wins; ties keep
//!    the earlier strategy in that order, so reruns are deterministic.
//! 3. An exterior girder resolved by equation or lever rule is never left
//!    below its interior companion for the same effect and lane case
//!    ([`MethodTag::InteriorOverride`]).
//! 4. A shear equation outside its range of applicability is discarded and
//!    the girder's resolved moment factor is substituted
//!    ([`MethodTag::MomentOverride`]).
//! 5. The loaded-lanes-over-beams floor replaces anything smaller
//!    ([`MethodTag::LanesBeamsFloor`]); that path is never skew corrected.
//!
//! Every step that fires lands in the tag set, so a report can state not
//! just the number but the rule that produced it.
//!
//! ## Reference
//!
//! LRFD 4.6.2.2.2d (exterior beams), LRFD C4.6.2.2.1 (lever rule)

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::{DfContext, ForceEffect, LoadedLanes};
use crate::distribution::evaluate::CandidateSet;
use crate::errors::{LldfError, LldfResult};

/// How a controlling value was produced: the winning strategy plus any
/// override that replaced or adjusted it.
///
/// Ordering is the tag's resolution order, which also fixes the iteration
/// order of the tag set in serialized output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MethodTag {
    /// Closed-form table equation for the selected family
    Equation,
    /// Statics-based lever rule
    LeverRule,
    /// Rigid cross-section method
    RigidMethod,
    /// Raised to the interior companion's resolved value
    InteriorOverride,
    /// Shear equation out of range; the resolved moment factor was
    /// substituted
    MomentOverride,
    /// Loaded-lanes-over-beams floor governs
    LanesBeamsFloor,
    /// Exterior girder designed with interior girder factors (owner
    /// variant)
    ExteriorAsInterior,
}

impl MethodTag {
    /// All tags, in resolution order
    pub const ALL: [MethodTag; 7] = [
        MethodTag::Equation,
        MethodTag::LeverRule,
        MethodTag::RigidMethod,
        MethodTag::InteriorOverride,
        MethodTag::MomentOverride,
        MethodTag::LanesBeamsFloor,
        MethodTag::ExteriorAsInterior,
    ];

    /// Display name for UI and reports
    pub fn display_name(&self) -> &'static str {
        match self {
            MethodTag::Equation => "table equation",
            MethodTag::LeverRule => "lever rule",
            MethodTag::RigidMethod => "rigid cross-section method",
            MethodTag::InteriorOverride => "raised to interior girder value",
            MethodTag::MomentOverride => "moment factor substituted for shear",
            MethodTag::LanesBeamsFloor => "lanes over beams floor",
            MethodTag::ExteriorAsInterior => "exterior designed as interior",
        }
    }
}

impl std::fmt::Display for MethodTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Controlling factor for one (force effect, lane case) request, before
/// skew correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Every candidate that was evaluated, controlling or not
    pub candidates: CandidateSet,
    /// Controlling factor before skew correction
    pub raw_factor: f64,
    /// Winning strategy and the overrides that fired
    pub controlling_methods: BTreeSet<MethodTag>,
    /// The resolved path is exempt from skew correction (floor values, and
    /// interior-override copies of floor values)
    pub skew_exempt: bool,
}

impl Resolution {
    /// Whether the given method participated in the controlling value
    pub fn controlled_by(&self, tag: MethodTag) -> bool {
        self.controlling_methods.contains(&tag)
    }
}

/// Resolve the controlling factor for one lane case of the context's force
/// effect.
///
/// `interior` is the already-resolved interior companion for the same
/// effect and lane case, present only when resolving an exterior girder on
/// a section that has one. `resolved_moment` is this girder's resolved
/// moment factor for the same lane case, required whenever
/// `shear_in_range` is false for a shear request.
///
/// The lanes-over-beams floor always qualifies, so the only failure paths
/// are a missing moment factor for the out-of-range substitution and a
/// corrupt candidate set; both report
/// [`LldfError::NoControllingCandidate`].
pub fn resolve(
    ctx: &DfContext,
    mut candidates: CandidateSet,
    lanes: LoadedLanes,
    interior: Option<&Resolution>,
    resolved_moment: Option<&Resolution>,
    shear_in_range: bool,
) -> LldfResult<Resolution> {
    let effect = ctx.force_effect;
    let no_candidate = || {
        LldfError::no_controlling_candidate(
            ctx.location.to_string(),
            ctx.girder_index,
            effect.display_name(),
            lanes.display_name(),
        )
    };

    // Steps 1 and 2: the largest applicable strategy wins. Iterating in
    // priority order and replacing only on a strictly greater value keeps
    // ties deterministic.
    let mut winner: Option<(MethodTag, f64)> = None;
    for (tag, candidate) in [
        (MethodTag::Equation, &candidates.equation),
        (MethodTag::LeverRule, &candidates.lever_rule),
        (MethodTag::RigidMethod, &candidates.rigid_method),
    ] {
        if !candidate.was_used || !candidate.raw_factor.is_finite() {
            continue;
        }
        let improves = match winner {
            Some((_, best)) => candidate.raw_factor > best,
            None => true,
        };
        if improves {
            winner = Some((tag, candidate.raw_factor));
        }
    }

    let mut controlling_methods = BTreeSet::new();
    let mut raw_factor = f64::NEG_INFINITY;
    let mut skew_exempt = false;
    if let Some((tag, value)) = winner {
        controlling_methods.insert(tag);
        raw_factor = value;
    }

    // Step 3: an exterior girder is never resolved below its interior
    // companion. The check covers equation and lever rule winners; a rigid
    // method result already reflects the whole cross section.
    if ctx.is_exterior
        && matches!(winner, Some((MethodTag::Equation | MethodTag::LeverRule, _)))
    {
        if let Some(interior) = interior {
            if raw_factor < interior.raw_factor {
                raw_factor = interior.raw_factor;
                controlling_methods.insert(MethodTag::InteriorOverride);
                // A floored interior value is exempt from skew correction;
                // the copy inherits the exemption so correction cannot pull
                // it back below the companion
                skew_exempt = interior.skew_exempt;
                debug!(
                    location = %ctx.location,
                    girder = ctx.girder_index,
                    effect = %effect,
                    lanes = %lanes,
                    interior_factor = interior.raw_factor,
                    "raised exterior factor to the interior companion value"
                );
            }
        }
    }

    // Step 4: an out-of-range shear equation is discarded outright in favor
    // of the girder's resolved moment factor for the same lane case. The
    // substituted value already carries the exterior multiplier and
    // override chain of its own resolution.
    if effect == ForceEffect::Shear && !shear_in_range {
        let moment = resolved_moment.ok_or_else(no_candidate)?;
        raw_factor = moment.raw_factor;
        controlling_methods = BTreeSet::from([MethodTag::MomentOverride]);
        skew_exempt = false;
        debug!(
            location = %ctx.location,
            girder = ctx.girder_index,
            lanes = %lanes,
            moment_factor = moment.raw_factor,
            "substituted the resolved moment factor for an out-of-range shear equation"
        );
    }

    // Step 5: the loaded-lanes-over-beams floor replaces anything smaller.
    // The floor value itself is never skew corrected.
    let floor = candidates.lanes_over_beams.raw_factor;
    if floor.is_finite() && floor > 0.0 && floor > raw_factor {
        raw_factor = floor;
        controlling_methods = BTreeSet::from([MethodTag::LanesBeamsFloor]);
        skew_exempt = true;
        candidates.lanes_over_beams.was_used = true;
    }

    if !raw_factor.is_finite() {
        return Err(no_candidate());
    }

    debug!(
        location = %ctx.location,
        girder = ctx.girder_index,
        effect = %effect,
        lanes = %lanes,
        raw_factor,
        methods = ?controlling_methods,
        "resolved controlling factor"
    );

    Ok(Resolution {
        candidates,
        raw_factor,
        controlling_methods,
        skew_exempt,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::DesignCode;
    use crate::context::DfLocation;
    use crate::model::{BeamArrangement, CrossSectionFamily, DeckType};
    use crate::provider::CandidateResult;

    fn context(effect: ForceEffect, is_exterior: bool) -> DfContext {
        DfContext {
            location: DfLocation::Span { span: 0 },
            girder_index: if is_exterior { 0 } else { 2 },
            force_effect: effect,
            girder_count: 5,
            lane_count: 3,
            lane_width_ft: 12.0,
            span_length_ft: 120.0,
            avg_spacing_ft: 6.0,
            spacing_ft: vec![6.0; 4],
            left_overhang_ft: 2.5,
            right_overhang_ft: 2.5,
            skew_start_deg: 0.0,
            skew_end_deg: 0.0,
            moment_of_inertia_in4: 260_730.0,
            area_in2: 789.0,
            eccentricity_in: 30.8,
            modular_ratio: 1.0,
            torsional_constant_in4: 16_000.0,
            stiffness_parameter_in4: 1_009_207.0,
            is_exterior,
            is_connected_as_unit: false,
            deck: DeckType::CastInPlace,
            arrangement: BeamArrangement::Spread,
            family: CrossSectionFamily::IBeam,
            code: DesignCode::default(),
        }
    }

    fn candidates(
        equation: Option<f64>,
        lever: Option<f64>,
        rigid: Option<f64>,
        floor: f64,
    ) -> CandidateSet {
        let wrap = |value: Option<f64>| match value {
            Some(raw) => CandidateResult::applied(raw),
            None => CandidateResult::unused(),
        };
        CandidateSet {
            equation: wrap(equation),
            lever_rule: wrap(lever),
            rigid_method: wrap(rigid),
            lanes_over_beams: CandidateResult {
                was_used: false,
                raw_factor: floor,
                exterior_multiplier: None,
                terms: Vec::new(),
            },
        }
    }

    fn prior(raw: f64, tag: MethodTag, skew_exempt: bool) -> Resolution {
        Resolution {
            candidates: candidates(Some(raw), None, None, 0.1),
            raw_factor: raw,
            controlling_methods: BTreeSet::from([tag]),
            skew_exempt,
        }
    }

    fn tags(list: &[MethodTag]) -> BTreeSet<MethodTag> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_largest_strategy_wins() {
        let ctx = context(ForceEffect::Moment, false);
        let set = candidates(Some(0.64), Some(0.58), None, 0.2);
        let resolution =
            resolve(&ctx, set, LoadedLanes::TwoPlus, None, None, true).unwrap();
        assert_eq!(resolution.raw_factor, 0.64);
        assert_eq!(resolution.controlling_methods, tags(&[MethodTag::Equation]));
        assert!(!resolution.skew_exempt);

        let set = candidates(Some(0.52), Some(0.58), Some(0.71), 0.2);
        let resolution =
            resolve(&ctx, set, LoadedLanes::TwoPlus, None, None, true).unwrap();
        assert_eq!(resolution.raw_factor, 0.71);
        assert_eq!(
            resolution.controlling_methods,
            tags(&[MethodTag::RigidMethod])
        );
    }

    #[test]
    fn test_ties_keep_the_earlier_strategy() {
        let ctx = context(ForceEffect::Moment, false);
        let set = candidates(Some(0.6), Some(0.6), Some(0.6), 0.2);
        let resolution =
            resolve(&ctx, set, LoadedLanes::TwoPlus, None, None, true).unwrap();
        assert_eq!(resolution.controlling_methods, tags(&[MethodTag::Equation]));

        let set = candidates(None, Some(0.6), Some(0.6), 0.2);
        let resolution =
            resolve(&ctx, set, LoadedLanes::TwoPlus, None, None, true).unwrap();
        assert_eq!(resolution.controlling_methods, tags(&[MethodTag::LeverRule]));
    }

    #[test]
    fn test_unused_candidates_are_discarded() {
        let ctx = context(ForceEffect::Moment, false);
        // The unused equation carries a raw factor of zero, which must not
        // compete
        let set = candidates(None, Some(0.45), None, 0.2);
        let resolution =
            resolve(&ctx, set, LoadedLanes::One, None, None, true).unwrap();
        assert_eq!(resolution.raw_factor, 0.45);
        assert_eq!(resolution.controlling_methods, tags(&[MethodTag::LeverRule]));
    }

    #[test]
    fn test_floor_replaces_smaller_strategies() {
        let ctx = context(ForceEffect::Moment, false);
        let set = candidates(Some(0.55), Some(0.5), None, 0.6);
        let resolution =
            resolve(&ctx, set, LoadedLanes::TwoPlus, None, None, true).unwrap();
        assert_eq!(resolution.raw_factor, 0.6);
        assert_eq!(
            resolution.controlling_methods,
            tags(&[MethodTag::LanesBeamsFloor])
        );
        assert!(resolution.skew_exempt);
        assert!(resolution.candidates.lanes_over_beams.was_used);
    }

    #[test]
    fn test_floor_tie_keeps_the_strategy_result() {
        let ctx = context(ForceEffect::Moment, false);
        let set = candidates(Some(0.6), None, None, 0.6);
        let resolution =
            resolve(&ctx, set, LoadedLanes::TwoPlus, None, None, true).unwrap();
        assert_eq!(resolution.controlling_methods, tags(&[MethodTag::Equation]));
        assert!(!resolution.skew_exempt);
        assert!(!resolution.candidates.lanes_over_beams.was_used);
    }

    #[test]
    fn test_floor_alone_when_no_strategy_applies() {
        let ctx = context(ForceEffect::Moment, false);
        let set = candidates(None, None, None, 0.2);
        let resolution =
            resolve(&ctx, set, LoadedLanes::One, None, None, true).unwrap();
        assert_eq!(resolution.raw_factor, 0.2);
        assert_eq!(
            resolution.controlling_methods,
            tags(&[MethodTag::LanesBeamsFloor])
        );
    }

    #[test]
    fn test_interior_override_raises_exterior() {
        let ctx = context(ForceEffect::Moment, true);
        let set = candidates(Some(0.5), Some(0.42), None, 0.2);
        let interior = prior(0.62, MethodTag::Equation, false);
        let resolution = resolve(
            &ctx,
            set,
            LoadedLanes::TwoPlus,
            Some(&interior),
            None,
            true,
        )
        .unwrap();
        assert_eq!(resolution.raw_factor, 0.62);
        assert_eq!(
            resolution.controlling_methods,
            tags(&[MethodTag::Equation, MethodTag::InteriorOverride])
        );
        assert!(!resolution.skew_exempt);
    }

    #[test]
    fn test_interior_override_not_triggered_when_exterior_governs() {
        let ctx = context(ForceEffect::Moment, true);
        let set = candidates(Some(0.7), Some(0.42), None, 0.2);
        let interior = prior(0.62, MethodTag::Equation, false);
        let resolution = resolve(
            &ctx,
            set,
            LoadedLanes::TwoPlus,
            Some(&interior),
            None,
            true,
        )
        .unwrap();
        assert_eq!(resolution.raw_factor, 0.7);
        assert!(!resolution.controlled_by(MethodTag::InteriorOverride));
    }

    #[test]
    fn test_interior_override_requires_exterior_context() {
        let ctx = context(ForceEffect::Moment, false);
        let set = candidates(Some(0.5), None, None, 0.2);
        let interior = prior(0.62, MethodTag::Equation, false);
        let resolution = resolve(
            &ctx,
            set,
            LoadedLanes::TwoPlus,
            Some(&interior),
            None,
            true,
        )
        .unwrap();
        assert_eq!(resolution.raw_factor, 0.5);
        assert!(!resolution.controlled_by(MethodTag::InteriorOverride));
    }

    #[test]
    fn test_interior_override_skips_rigid_method_winner() {
        let ctx = context(ForceEffect::Moment, true);
        // The rigid method already distributes over the whole section, so
        // the companion check does not second-guess it
        let set = candidates(Some(0.45), None, Some(0.5), 0.2);
        let interior = prior(0.62, MethodTag::Equation, false);
        let resolution = resolve(
            &ctx,
            set,
            LoadedLanes::TwoPlus,
            Some(&interior),
            None,
            true,
        )
        .unwrap();
        assert_eq!(resolution.raw_factor, 0.5);
        assert_eq!(
            resolution.controlling_methods,
            tags(&[MethodTag::RigidMethod])
        );
    }

    #[test]
    fn test_interior_override_propagates_floor_exemption() {
        let ctx = context(ForceEffect::Moment, true);
        let set = candidates(Some(0.5), None, None, 0.2);
        let interior = prior(0.6, MethodTag::LanesBeamsFloor, true);
        let resolution = resolve(
            &ctx,
            set,
            LoadedLanes::TwoPlus,
            Some(&interior),
            None,
            true,
        )
        .unwrap();
        assert_eq!(resolution.raw_factor, 0.6);
        assert!(resolution.skew_exempt);
        assert!(resolution.controlled_by(MethodTag::InteriorOverride));
    }

    #[test]
    fn test_out_of_range_shear_substitutes_moment() {
        let ctx = context(ForceEffect::Shear, false);
        let set = candidates(Some(0.58), None, None, 0.2);
        let moment = prior(0.77, MethodTag::Equation, false);
        let resolution = resolve(
            &ctx,
            set,
            LoadedLanes::TwoPlus,
            None,
            Some(&moment),
            false,
        )
        .unwrap();
        assert_eq!(resolution.raw_factor, 0.77);
        // The discarded shear equation no longer appears in the tags
        assert_eq!(
            resolution.controlling_methods,
            tags(&[MethodTag::MomentOverride])
        );
        // The substituted value is still subject to the shear skew correction
        assert!(!resolution.skew_exempt);
        // The discarded candidate stays in the set for reports
        assert!(resolution.candidates.equation.was_used);
    }

    #[test]
    fn test_substitution_replaces_the_whole_tag_set() {
        let ctx = context(ForceEffect::Shear, true);
        let set = candidates(Some(0.5), Some(0.42), None, 0.2);
        let interior = prior(0.9, MethodTag::Equation, false);
        let moment = prior(0.8, MethodTag::Equation, false);
        let resolution = resolve(
            &ctx,
            set,
            LoadedLanes::TwoPlus,
            Some(&interior),
            Some(&moment),
            false,
        )
        .unwrap();
        // The interior override fired first, then the substitution replaced
        // both its value and its tags
        assert_eq!(resolution.raw_factor, 0.8);
        assert_eq!(
            resolution.controlling_methods,
            tags(&[MethodTag::MomentOverride])
        );
    }

    #[test]
    fn test_out_of_range_shear_without_moment_is_a_defect() {
        let ctx = context(ForceEffect::Shear, false);
        let set = candidates(Some(0.58), None, None, 0.2);
        let err = resolve(&ctx, set, LoadedLanes::One, None, None, false).unwrap_err();
        assert_eq!(err.error_code(), "NO_CONTROLLING_CANDIDATE");
        assert!(err.is_logic_defect());
    }

    #[test]
    fn test_range_flag_only_affects_shear() {
        let ctx = context(ForceEffect::Reaction, false);
        let set = candidates(Some(0.58), None, None, 0.2);
        let resolution =
            resolve(&ctx, set, LoadedLanes::TwoPlus, None, None, false).unwrap();
        assert_eq!(resolution.raw_factor, 0.58);
        assert!(!resolution.controlled_by(MethodTag::MomentOverride));
    }

    #[test]
    fn test_floor_cannot_undercut_substituted_moment() {
        // The moment factor was itself floored at the same lanes/beams
        // value, so the substitution can tie the floor but never lose to it
        let ctx = context(ForceEffect::Shear, false);
        let set = candidates(Some(0.3), None, None, 0.6);
        let moment = prior(0.6, MethodTag::LanesBeamsFloor, true);
        let resolution = resolve(
            &ctx,
            set,
            LoadedLanes::TwoPlus,
            None,
            Some(&moment),
            false,
        )
        .unwrap();
        assert_eq!(resolution.raw_factor, 0.6);
        assert_eq!(
            resolution.controlling_methods,
            tags(&[MethodTag::MomentOverride])
        );
    }

    #[test]
    fn test_corrupt_candidates_are_a_defect() {
        let ctx = context(ForceEffect::Moment, false);
        let set = candidates(None, None, None, f64::NAN);
        let err = resolve(&ctx, set, LoadedLanes::One, None, None, true).unwrap_err();
        assert_eq!(err.error_code(), "NO_CONTROLLING_CANDIDATE");
    }

    #[test]
    fn test_resolution_serialization_roundtrip() {
        let ctx = context(ForceEffect::Moment, true);
        let set = candidates(Some(0.5), Some(0.42), None, 0.2);
        let interior = prior(0.62, MethodTag::Equation, false);
        let resolution = resolve(
            &ctx,
            set,
            LoadedLanes::TwoPlus,
            Some(&interior),
            None,
            true,
        )
        .unwrap();
        let json = serde_json::to_string(&resolution).unwrap();
        let roundtrip: Resolution = serde_json::from_str(&json).unwrap();
        assert_eq!(resolution, roundtrip);
    }
}
