//! # Skew Corrector
//!
//! Applies the skew correction to a resolved factor and assembles the final
//! per-(effect, lane case) result.
//!
//! ## Overview
//!
//! Supports that are not perpendicular to the girders shed load toward the
//! obtuse corners, so the code reduces moment factors and increases shear
//! factors on skewed bridges. The numeric factor comes from the provider;
//! this step decides whether it applies at all:
//!
//! - a value resolved from the lanes-over-beams floor is never corrected,
//! - an interior-override copy of a floored value keeps that exemption,
//! - the owner variant may waive the moment correction outright.
//!
//! The floor is a bound on the final factor as well: if a sub-unity
//! correction would take the corrected value below the lanes-over-beams
//! share, the floor governs instead and the result is reported as a floor
//! path with no correction.
//!
//! ## Reference
//!
//! LRFD Table 4.6.2.2.2e-1 (moment), LRFD Table 4.6.2.2.3c-1 (shear)

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::codes::lrfd_ref;
use crate::context::{DfContext, ForceEffect, LoadedLanes};
use crate::distribution::classify::StrategySelection;
use crate::distribution::evaluate::CandidateSet;
use crate::distribution::resolve::{MethodTag, Resolution};
use crate::provider::CodeEquations;

/// Final distribution factor for one (force effect, lane case) request,
/// with the full audit trail of candidates and controlling methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFactor {
    /// Force effect the factor applies to
    pub force_effect: ForceEffect,
    /// Lane case the factor applies to
    pub loaded_lanes: LoadedLanes,
    /// Every candidate that was evaluated, controlling or not
    pub candidates: CandidateSet,
    /// Winning strategy and the overrides that fired
    pub controlling_methods: BTreeSet<MethodTag>,
    /// Controlling factor before skew correction
    pub raw_factor: f64,
    /// Skew correction factor that was applied (1.0 on exempt and waived
    /// paths)
    pub skew_correction: f64,
    /// `raw_factor * skew_correction`, the factor to design with
    pub final_factor: f64,
}

impl ResolvedFactor {
    /// Whether the given method participated in the controlling value
    pub fn controlled_by(&self, tag: MethodTag) -> bool {
        self.controlling_methods.contains(&tag)
    }

    /// Code provisions consulted for this factor, in pipeline order, for
    /// report footnotes.
    ///
    /// Reactions are distributed with the shear provisions. The
    /// lanes-over-beams floor is a bound rather than a table entry, so a
    /// floored factor cites only the candidates that were evaluated
    /// against it.
    pub fn code_references(&self) -> Vec<&'static str> {
        let mut references = Vec::new();
        if self.candidates.equation.was_used {
            let exterior = self.candidates.equation.exterior_multiplier.is_some();
            references.push(match (self.force_effect, exterior) {
                (ForceEffect::Moment, false) => lrfd_ref::MOMENT_INTERIOR,
                (ForceEffect::Moment, true) => lrfd_ref::MOMENT_EXTERIOR,
                (ForceEffect::Shear | ForceEffect::Reaction, false) => lrfd_ref::SHEAR_INTERIOR,
                (ForceEffect::Shear | ForceEffect::Reaction, true) => lrfd_ref::SHEAR_EXTERIOR,
            });
        }
        if self.candidates.lever_rule.was_used {
            references.push(lrfd_ref::LEVER_RULE);
        }
        if self.candidates.rigid_method.was_used {
            references.push(lrfd_ref::RIGID_METHOD);
        }
        if self.skew_correction != 1.0 {
            references.push(match self.force_effect {
                ForceEffect::Moment => lrfd_ref::SKEW_MOMENT,
                ForceEffect::Shear | ForceEffect::Reaction => lrfd_ref::SKEW_SHEAR,
            });
        }
        references
    }
}

/// Skew correction factor for a resolution, honoring the floor exemption
/// and the owner moment waiver.
fn correction_factor<P: CodeEquations>(
    provider: &P,
    selection: &StrategySelection,
    ctx: &DfContext,
    resolution: &Resolution,
) -> f64 {
    if resolution.skew_exempt {
        return 1.0;
    }
    if ctx.force_effect == ForceEffect::Moment && selection.skip_skew_for_moment {
        return 1.0;
    }
    provider.skew_correction_factor(ctx, ctx.force_effect)
}

/// Apply the skew correction and assemble the final per-case result.
pub fn apply_skew_correction<P: CodeEquations>(
    provider: &P,
    selection: &StrategySelection,
    ctx: &DfContext,
    lanes: LoadedLanes,
    resolution: Resolution,
) -> ResolvedFactor {
    let skew_correction = correction_factor(provider, selection, ctx, &resolution);
    let corrected = resolution.raw_factor * skew_correction;

    // The lanes-over-beams share bounds the corrected value too: a
    // reducing correction must not leave the final factor below it
    let floor = resolution.candidates.lanes_over_beams.raw_factor;
    if floor.is_finite() && floor > 0.0 && corrected < floor {
        // The floor replaces the method tags; the designed-as-interior
        // marking describes the girder, not the method, and stays
        let mut controlling_methods = BTreeSet::from([MethodTag::LanesBeamsFloor]);
        if resolution.controlled_by(MethodTag::ExteriorAsInterior) {
            controlling_methods.insert(MethodTag::ExteriorAsInterior);
        }
        let mut candidates = resolution.candidates;
        candidates.lanes_over_beams.was_used = true;
        return ResolvedFactor {
            force_effect: ctx.force_effect,
            loaded_lanes: lanes,
            candidates,
            controlling_methods,
            raw_factor: floor,
            skew_correction: 1.0,
            final_factor: floor,
        };
    }

    ResolvedFactor {
        force_effect: ctx.force_effect,
        loaded_lanes: lanes,
        candidates: resolution.candidates,
        controlling_methods: resolution.controlling_methods,
        raw_factor: resolution.raw_factor,
        skew_correction,
        final_factor: corrected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{CodeVariant, DesignCode};
    use crate::context::DfLocation;
    use crate::distribution::classify::classify;
    use crate::model::{BeamArrangement, CrossSectionFamily, DeckType};
    use crate::provider::{CandidateResult, EquationFamily};

    /// Fixed factors: reduce moment, increase shear, leave reactions alone
    struct SkewedTables;

    impl CodeEquations for SkewedTables {
        fn evaluate_equation(
            &self,
            _family: EquationFamily,
            _ctx: &DfContext,
            _effect: ForceEffect,
            _lanes: LoadedLanes,
        ) -> CandidateResult {
            CandidateResult::applied(0.5)
        }

        fn evaluate_lever_rule(
            &self,
            _ctx: &DfContext,
            _effect: ForceEffect,
            _lanes: LoadedLanes,
        ) -> CandidateResult {
            CandidateResult::unused()
        }

        fn evaluate_rigid_method(
            &self,
            _ctx: &DfContext,
            _effect: ForceEffect,
            _lanes: LoadedLanes,
        ) -> CandidateResult {
            CandidateResult::unused()
        }

        fn in_range_of_applicability(&self, _ctx: &DfContext, _effect: ForceEffect) -> bool {
            true
        }

        fn skew_correction_factor(&self, _ctx: &DfContext, effect: ForceEffect) -> f64 {
            match effect {
                ForceEffect::Moment => 0.93,
                ForceEffect::Shear => 1.07,
                ForceEffect::Reaction => 1.0,
            }
        }
    }

    fn context(effect: ForceEffect) -> DfContext {
        DfContext {
            location: DfLocation::Span { span: 0 },
            girder_index: 2,
            force_effect: effect,
            girder_count: 5,
            lane_count: 3,
            lane_width_ft: 12.0,
            span_length_ft: 120.0,
            avg_spacing_ft: 6.0,
            spacing_ft: vec![6.0; 4],
            left_overhang_ft: 2.5,
            right_overhang_ft: 2.5,
            skew_start_deg: 30.0,
            skew_end_deg: 30.0,
            moment_of_inertia_in4: 260_730.0,
            area_in2: 789.0,
            eccentricity_in: 30.8,
            modular_ratio: 1.0,
            torsional_constant_in4: 16_000.0,
            stiffness_parameter_in4: 1_009_207.0,
            is_exterior: false,
            is_connected_as_unit: false,
            deck: DeckType::CastInPlace,
            arrangement: BeamArrangement::Spread,
            family: CrossSectionFamily::IBeam,
            code: DesignCode::default(),
        }
    }

    fn resolution(raw: f64, tag: MethodTag, skew_exempt: bool, floor: f64) -> Resolution {
        Resolution {
            candidates: CandidateSet {
                equation: CandidateResult::applied(raw),
                lever_rule: CandidateResult::unused(),
                rigid_method: CandidateResult::unused(),
                lanes_over_beams: CandidateResult {
                    was_used: tag == MethodTag::LanesBeamsFloor,
                    raw_factor: floor,
                    exterior_multiplier: None,
                    terms: Vec::new(),
                },
            },
            raw_factor: raw,
            controlling_methods: BTreeSet::from([tag]),
            skew_exempt,
        }
    }

    #[test]
    fn test_corrections_applied_per_effect() {
        let provider = SkewedTables;

        let moment_ctx = context(ForceEffect::Moment);
        let selection = classify(&moment_ctx).unwrap();
        let factor = apply_skew_correction(
            &provider,
            &selection,
            &moment_ctx,
            LoadedLanes::TwoPlus,
            resolution(0.64, MethodTag::Equation, false, 0.2),
        );
        assert_eq!(factor.skew_correction, 0.93);
        assert!((factor.final_factor - 0.64 * 0.93).abs() < 1.0e-12);
        assert_eq!(factor.raw_factor, 0.64);
        assert_eq!(factor.force_effect, ForceEffect::Moment);
        assert_eq!(factor.loaded_lanes, LoadedLanes::TwoPlus);

        let shear_ctx = context(ForceEffect::Shear);
        let selection = classify(&shear_ctx).unwrap();
        let factor = apply_skew_correction(
            &provider,
            &selection,
            &shear_ctx,
            LoadedLanes::One,
            resolution(0.58, MethodTag::Equation, false, 0.2),
        );
        assert_eq!(factor.skew_correction, 1.07);
        assert!((factor.final_factor - 0.58 * 1.07).abs() < 1.0e-12);
    }

    #[test]
    fn test_floor_path_is_never_corrected() {
        let provider = SkewedTables;
        let ctx = context(ForceEffect::Shear);
        let selection = classify(&ctx).unwrap();

        let factor = apply_skew_correction(
            &provider,
            &selection,
            &ctx,
            LoadedLanes::TwoPlus,
            resolution(0.6, MethodTag::LanesBeamsFloor, true, 0.6),
        );
        assert_eq!(factor.skew_correction, 1.0);
        assert_eq!(factor.final_factor, 0.6);
        assert!(factor.controlled_by(MethodTag::LanesBeamsFloor));
    }

    #[test]
    fn test_inherited_exemption_suppresses_correction() {
        let provider = SkewedTables;
        let ctx = context(ForceEffect::Moment);
        let selection = classify(&ctx).unwrap();

        // An interior-override copy of a floored value carries the exemption
        let mut overridden = resolution(0.6, MethodTag::Equation, true, 0.2);
        overridden
            .controlling_methods
            .insert(MethodTag::InteriorOverride);
        let factor =
            apply_skew_correction(&provider, &selection, &ctx, LoadedLanes::TwoPlus, overridden);
        assert_eq!(factor.skew_correction, 1.0);
        assert_eq!(factor.final_factor, 0.6);
        assert!(factor.controlled_by(MethodTag::InteriorOverride));
    }

    #[test]
    fn test_moment_waiver_leaves_shear_corrected() {
        let provider = SkewedTables;

        let mut moment_ctx = context(ForceEffect::Moment);
        moment_ctx.code = DesignCode::default().with_variant(CodeVariant::Txdot);
        let selection = classify(&moment_ctx).unwrap();
        let factor = apply_skew_correction(
            &provider,
            &selection,
            &moment_ctx,
            LoadedLanes::TwoPlus,
            resolution(0.64, MethodTag::Equation, false, 0.2),
        );
        assert_eq!(factor.skew_correction, 1.0);
        assert_eq!(factor.final_factor, 0.64);

        let mut shear_ctx = context(ForceEffect::Shear);
        shear_ctx.code = DesignCode::default().with_variant(CodeVariant::Txdot);
        let selection = classify(&shear_ctx).unwrap();
        let factor = apply_skew_correction(
            &provider,
            &selection,
            &shear_ctx,
            LoadedLanes::TwoPlus,
            resolution(0.58, MethodTag::Equation, false, 0.2),
        );
        assert_eq!(factor.skew_correction, 1.07);
    }

    #[test]
    fn test_reducing_correction_cannot_undercut_the_floor() {
        let provider = SkewedTables;
        let ctx = context(ForceEffect::Moment);
        let selection = classify(&ctx).unwrap();

        // 0.61 survives resolution above the 0.6 floor, but the moment
        // correction would drop it to 0.5673; the floor governs the final
        let factor = apply_skew_correction(
            &provider,
            &selection,
            &ctx,
            LoadedLanes::TwoPlus,
            resolution(0.61, MethodTag::Equation, false, 0.6),
        );
        assert_eq!(factor.final_factor, 0.6);
        assert_eq!(factor.skew_correction, 1.0);
        assert_eq!(
            factor.controlling_methods,
            BTreeSet::from([MethodTag::LanesBeamsFloor])
        );
        assert!(factor.candidates.lanes_over_beams.was_used);
    }

    #[test]
    fn test_floor_bound_keeps_the_interior_designation() {
        let provider = SkewedTables;
        let ctx = context(ForceEffect::Moment);
        let selection = classify(&ctx).unwrap();

        // A girder designed as interior under the narrow-overhang rule
        // drops below the floor only once the correction lands; the floor
        // result must still carry the girder marking
        let mut designed = resolution(0.61, MethodTag::Equation, false, 0.6);
        designed
            .controlling_methods
            .insert(MethodTag::ExteriorAsInterior);
        let factor =
            apply_skew_correction(&provider, &selection, &ctx, LoadedLanes::TwoPlus, designed);
        assert_eq!(factor.final_factor, 0.6);
        assert_eq!(factor.skew_correction, 1.0);
        assert_eq!(
            factor.controlling_methods,
            BTreeSet::from([MethodTag::LanesBeamsFloor, MethodTag::ExteriorAsInterior])
        );
    }

    #[test]
    fn test_code_references_follow_the_audit_trail() {
        let provider = SkewedTables;

        // Interior moment equation with a live correction
        let moment_ctx = context(ForceEffect::Moment);
        let selection = classify(&moment_ctx).unwrap();
        let factor = apply_skew_correction(
            &provider,
            &selection,
            &moment_ctx,
            LoadedLanes::TwoPlus,
            resolution(0.64, MethodTag::Equation, false, 0.2),
        );
        assert_eq!(
            factor.code_references(),
            vec!["LRFD Table 4.6.2.2.2b-1", "LRFD Table 4.6.2.2.2e-1"]
        );

        // Exterior shear row with the lever rule companion
        let shear_ctx = context(ForceEffect::Shear);
        let selection = classify(&shear_ctx).unwrap();
        let mut exterior = resolution(0.58, MethodTag::Equation, false, 0.2);
        exterior.candidates.equation =
            CandidateResult::applied(0.58).with_exterior_multiplier(1.08);
        exterior.candidates.lever_rule = CandidateResult::applied(0.52);
        let factor =
            apply_skew_correction(&provider, &selection, &shear_ctx, LoadedLanes::One, exterior);
        assert_eq!(
            factor.code_references(),
            vec![
                "LRFD Table 4.6.2.2.3b-1",
                "LRFD C4.6.2.2.1",
                "LRFD Table 4.6.2.2.3c-1",
            ]
        );

        // A floored value was never corrected, so no skew table is cited
        let floored = apply_skew_correction(
            &provider,
            &selection,
            &shear_ctx,
            LoadedLanes::TwoPlus,
            resolution(0.6, MethodTag::LanesBeamsFloor, true, 0.6),
        );
        assert_eq!(floored.code_references(), vec!["LRFD Table 4.6.2.2.3a-1"]);

        // Exterior moment row with the rigid method in play
        let selection = classify(&moment_ctx).unwrap();
        let mut rigid = resolution(0.66, MethodTag::RigidMethod, false, 0.2);
        rigid.candidates.equation = CandidateResult::applied(0.6).with_exterior_multiplier(1.1);
        rigid.candidates.rigid_method = CandidateResult::applied(0.66);
        let factor =
            apply_skew_correction(&provider, &selection, &moment_ctx, LoadedLanes::TwoPlus, rigid);
        assert_eq!(
            factor.code_references(),
            vec![
                "LRFD Table 4.6.2.2.2d-1",
                "LRFD C4.6.2.2.2d",
                "LRFD Table 4.6.2.2.2e-1",
            ]
        );
    }

    #[test]
    fn test_resolved_factor_serialization_roundtrip() {
        let provider = SkewedTables;
        let ctx = context(ForceEffect::Shear);
        let selection = classify(&ctx).unwrap();
        let factor = apply_skew_correction(
            &provider,
            &selection,
            &ctx,
            LoadedLanes::One,
            resolution(0.58, MethodTag::Equation, false, 0.2),
        );
        let json = serde_json::to_string(&factor).unwrap();
        let roundtrip: ResolvedFactor = serde_json::from_str(&json).unwrap();
        assert_eq!(factor, roundtrip);
    }
}
