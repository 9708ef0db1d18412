//! # Distribution Factor Engine
//!
//! End-to-end resolution for one (location, girder) request: assembly,
//! classification, candidate evaluation, controlling-value resolution, skew
//! correction, and the fatigue factor.
//!
//! ## Overview
//!
//! [`DistributionFactorEngine`] borrows a [`BridgeModel`] and a
//! [`CodeEquations`] provider and computes [`DistributionFactors`] per
//! request: for each force effect, both lane cases with their full audit
//! trail, the governing case, and the fatigue factor.
//!
//! Two orderings matter and are fixed here:
//!
//! - an exterior girder resolves its nearest interior companion first, so
//!   the exterior-not-below-interior override has a value to compare
//!   against;
//! - within a lane case, moment resolves before shear, so an out-of-range
//!   shear equation can fall back on the resolved moment factor.
//!
//! The engine holds no mutable state and every collaborator call is pure,
//! so identical requests produce identical results and callers can fan
//! requests out across threads with one shared engine reference. See the
//! crate-level quick start for an end-to-end example.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codes::{lrfd_ref, DesignCode, FATIGUE_SINGLE_LANE_MPF};
use crate::context::{DfContext, DfLocation, ForceEffect, LoadedLanes, PierFace};
use crate::distribution::assemble::assemble_context;
use crate::distribution::classify::{classify, StrategySelection};
use crate::distribution::evaluate::evaluate_candidates;
use crate::distribution::resolve::{resolve, MethodTag, Resolution};
use crate::distribution::skew::{apply_skew_correction, ResolvedFactor};
use crate::errors::LldfResult;
use crate::model::BridgeModel;
use crate::provider::CodeEquations;

/// Distribution factors for one force effect at one location: both lane
/// cases, the governing case, and the fatigue factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectFactors {
    /// Force effect these factors apply to
    pub force_effect: ForceEffect,
    /// Resolved factor for one loaded lane
    pub one_lane: ResolvedFactor,
    /// Resolved factor for two or more loaded lanes
    pub multi_lane: ResolvedFactor,
    /// Lane case with the larger final factor; ties go to the multi-lane
    /// case
    pub governing_lanes: LoadedLanes,
    /// Single-lane final factor with the multiple presence factor divided
    /// back out, for fatigue checks
    pub fatigue_factor: f64,
}

impl EffectFactors {
    /// The resolved factor of the governing lane case
    pub fn governing(&self) -> &ResolvedFactor {
        match self.governing_lanes {
            LoadedLanes::One => &self.one_lane,
            LoadedLanes::TwoPlus => &self.multi_lane,
        }
    }

    /// Governing distribution factor, the larger of the two lane cases
    pub fn governing_mg(&self) -> f64 {
        self.governing().final_factor
    }

    /// Format as a multi-line string for reports: one row per lane case
    /// plus the governing and fatigue rows, each with its code citations,
    /// followed by the governing equation's audit terms.
    pub fn format_report(&self) -> String {
        let governing = self.governing();
        let methods = governing
            .controlling_methods
            .iter()
            .map(|tag| tag.display_name())
            .collect::<Vec<_>>()
            .join(", ");
        let mut report = format!(
            "{} distribution factors\n\
             ------------------------------------------------\n\
             1 loaded lane    mg = {:.4}   {}\n\
             2+ loaded lanes  mg = {:.4}   {}\n\
             governing        mg = {:.4}   {} ({})\n\
             fatigue          mg = {:.4}   {}, {}",
            self.force_effect,
            self.one_lane.final_factor,
            self.one_lane.code_references().join(", "),
            self.multi_lane.final_factor,
            self.multi_lane.code_references().join(", "),
            self.governing_mg(),
            self.governing_lanes,
            methods,
            self.fatigue_factor,
            lrfd_ref::FATIGUE_LOAD,
            lrfd_ref::MULTIPLE_PRESENCE,
        );
        for term in &governing.candidates.equation.terms {
            report.push_str(&format!("\n  {} = {:.4}", term.symbol, term.value));
            if let Some(reference) = term.code_reference() {
                report.push_str(&format!("   {reference}"));
            }
        }
        report
    }
}

/// Distribution factors for one (location, girder) request, all three force
/// effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionFactors {
    /// Location the request referred to
    pub location: DfLocation,
    /// Zero-based girder line index
    pub girder_index: usize,
    /// Moment factors
    pub moment: EffectFactors,
    /// Shear factors
    pub shear: EffectFactors,
    /// Support reaction factors
    pub reaction: EffectFactors,
}

impl DistributionFactors {
    /// Factors for the given force effect
    pub fn effect(&self, effect: ForceEffect) -> &EffectFactors {
        match effect {
            ForceEffect::Moment => &self.moment,
            ForceEffect::Shear => &self.shear,
            ForceEffect::Reaction => &self.reaction,
        }
    }

    /// Format all three effects as a multi-line string for reports
    pub fn format_report(&self) -> String {
        format!(
            "distribution factors at {}, girder {}\n\
             ================================================\n\
             {}\n\n{}\n\n{}",
            self.location,
            self.girder_index,
            self.moment.format_report(),
            self.shear.format_report(),
            self.reaction.format_report(),
        )
    }
}

/// Assembled context and classification for one force effect of one girder
struct GirderSetup {
    ctx: DfContext,
    selection: StrategySelection,
    /// The variant designs this exterior girder with interior rules; the
    /// context has already been converted
    designed_as_interior: bool,
}

/// Per-effect setups for one girder line at one location
struct EffectSetups {
    moment: GirderSetup,
    shear: GirderSetup,
    reaction: GirderSetup,
}

/// Resolutions for the three effects of one lane case
struct LaneResolutions {
    moment: Resolution,
    shear: Resolution,
    reaction: Resolution,
}

/// Stateless resolution engine over a bridge model and an equation
/// provider.
pub struct DistributionFactorEngine<'a, M, P> {
    model: &'a M,
    provider: &'a P,
    code: DesignCode,
}

impl<'a, M: BridgeModel, P: CodeEquations> DistributionFactorEngine<'a, M, P> {
    /// Create an engine over the given model and provider
    pub fn new(model: &'a M, provider: &'a P, code: DesignCode) -> Self {
        DistributionFactorEngine {
            model,
            provider,
            code,
        }
    }

    /// Design code this engine resolves under
    pub fn design_code(&self) -> &DesignCode {
        &self.code
    }

    /// Compute the distribution factors for one girder at one location.
    ///
    /// Fails if the model cannot supply the geometry, the cross section is
    /// unclassifiable, or resolution discards every candidate; there are no
    /// partial results.
    pub fn compute_distribution_factors(
        &self,
        location: DfLocation,
        girder_index: usize,
    ) -> LldfResult<DistributionFactors> {
        let setups = self.prepare_effects(location, girder_index)?;

        // The interior companion resolves first so the exterior override
        // has a value to compare against
        let companion = match self.companion_index(&setups) {
            Some(companion) => Some(self.prepare_effects(location, companion)?),
            None => None,
        };
        let (interior_one, interior_multi) = match &companion {
            Some(companion) => (
                Some(self.resolve_lane_case(companion, LoadedLanes::One, None)?),
                Some(self.resolve_lane_case(companion, LoadedLanes::TwoPlus, None)?),
            ),
            None => (None, None),
        };

        let one = self.resolve_lane_case(&setups, LoadedLanes::One, interior_one.as_ref())?;
        let multi =
            self.resolve_lane_case(&setups, LoadedLanes::TwoPlus, interior_multi.as_ref())?;

        let factors = DistributionFactors {
            location,
            girder_index,
            moment: self.effect_factors(&setups.moment, one.moment, multi.moment),
            shear: self.effect_factors(&setups.shear, one.shear, multi.shear),
            reaction: self.effect_factors(&setups.reaction, one.reaction, multi.reaction),
        };
        debug!(
            location = %location,
            girder = girder_index,
            moment_mg = factors.moment.governing_mg(),
            shear_mg = factors.shear.governing_mg(),
            reaction_mg = factors.reaction.governing_mg(),
            "computed distribution factors"
        );
        Ok(factors)
    }

    /// Compute factors at every standard reporting location of one girder
    /// line, in order along the bridge.
    pub fn compute_girder_line(&self, girder_index: usize) -> LldfResult<Vec<DistributionFactors>> {
        girder_line_locations(self.model)
            .into_iter()
            .map(|location| self.compute_distribution_factors(location, girder_index))
            .collect()
    }

    fn prepare(
        &self,
        location: DfLocation,
        girder_index: usize,
        effect: ForceEffect,
    ) -> LldfResult<GirderSetup> {
        let ctx = assemble_context(self.model, location, girder_index, effect, &self.code)?;
        let selection = classify(&ctx)?;
        if selection.exterior_as_interior {
            Ok(GirderSetup {
                ctx: ctx.as_interior(),
                selection,
                designed_as_interior: true,
            })
        } else {
            Ok(GirderSetup {
                ctx,
                selection,
                designed_as_interior: false,
            })
        }
    }

    fn prepare_effects(
        &self,
        location: DfLocation,
        girder_index: usize,
    ) -> LldfResult<EffectSetups> {
        Ok(EffectSetups {
            moment: self.prepare(location, girder_index, ForceEffect::Moment)?,
            shear: self.prepare(location, girder_index, ForceEffect::Shear)?,
            reaction: self.prepare(location, girder_index, ForceEffect::Reaction)?,
        })
    }

    /// Nearest interior girder line, when the exterior override applies.
    ///
    /// None for interior girders, for sections without an interior line,
    /// and for exterior girders a variant already designs as interior.
    fn companion_index(&self, setups: &EffectSetups) -> Option<usize> {
        let any_exterior = [&setups.moment, &setups.shear, &setups.reaction]
            .iter()
            .any(|setup| setup.ctx.is_exterior);
        if !any_exterior {
            return None;
        }
        let count = self.model.girder_count();
        if count < 3 {
            return None;
        }
        if setups.moment.ctx.girder_index == 0 {
            Some(1)
        } else {
            Some(count - 2)
        }
    }

    fn resolve_lane_case(
        &self,
        setups: &EffectSetups,
        lanes: LoadedLanes,
        interior: Option<&LaneResolutions>,
    ) -> LldfResult<LaneResolutions> {
        // Moment first: an out-of-range shear equation substitutes it
        let moment =
            self.resolve_single(&setups.moment, lanes, interior.map(|i| &i.moment), None)?;
        let shear = self.resolve_single(
            &setups.shear,
            lanes,
            interior.map(|i| &i.shear),
            Some(&moment),
        )?;
        let reaction =
            self.resolve_single(&setups.reaction, lanes, interior.map(|i| &i.reaction), None)?;
        Ok(LaneResolutions {
            moment,
            shear,
            reaction,
        })
    }

    fn resolve_single(
        &self,
        setup: &GirderSetup,
        lanes: LoadedLanes,
        interior: Option<&Resolution>,
        resolved_moment: Option<&Resolution>,
    ) -> LldfResult<Resolution> {
        let candidates = evaluate_candidates(self.provider, &setup.selection, &setup.ctx, lanes);
        let shear_in_range = setup.ctx.force_effect != ForceEffect::Shear
            || self
                .provider
                .in_range_of_applicability(&setup.ctx, ForceEffect::Shear);
        let mut resolution = resolve(
            &setup.ctx,
            candidates,
            lanes,
            interior,
            resolved_moment,
            shear_in_range,
        )?;
        if setup.designed_as_interior {
            resolution
                .controlling_methods
                .insert(MethodTag::ExteriorAsInterior);
        }
        Ok(resolution)
    }

    fn effect_factors(
        &self,
        setup: &GirderSetup,
        one: Resolution,
        multi: Resolution,
    ) -> EffectFactors {
        let one = apply_skew_correction(
            self.provider,
            &setup.selection,
            &setup.ctx,
            LoadedLanes::One,
            one,
        );
        let multi = apply_skew_correction(
            self.provider,
            &setup.selection,
            &setup.ctx,
            LoadedLanes::TwoPlus,
            multi,
        );
        let governing_lanes = if one.final_factor > multi.final_factor {
            LoadedLanes::One
        } else {
            LoadedLanes::TwoPlus
        };
        // The fatigue load is a single truck; divide the multiple presence
        // factor back out of the single-lane result
        let fatigue_factor = one.final_factor / FATIGUE_SINGLE_LANE_MPF;
        EffectFactors {
            force_effect: setup.ctx.force_effect,
            one_lane: one,
            multi_lane: multi,
            governing_lanes,
            fatigue_factor,
        }
    }
}

/// Standard reporting locations for a girder line, in order along the
/// bridge: the start abutment reaction, then for each span the span point,
/// the faces of the pier that follows (interior piers only), and that
/// pier's reaction.
pub fn girder_line_locations<M: BridgeModel>(model: &M) -> Vec<DfLocation> {
    let span_count = model.span_count();
    let mut locations = Vec::new();
    locations.push(DfLocation::PierReaction { pier: 0 });
    for span in 0..span_count {
        locations.push(DfLocation::Span { span });
        let pier = span + 1;
        if pier < span_count {
            // Interior pier: shear is reported on both faces
            locations.push(DfLocation::PierFace {
                pier,
                face: PierFace::Back,
            });
            locations.push(DfLocation::PierFace {
                pier,
                face: PierFace::Ahead,
            });
        }
        locations.push(DfLocation::PierReaction { pier });
    }
    locations
}
