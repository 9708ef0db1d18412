//! # Parameter Assembler
//!
//! Builds one [`DfContext`] per (location, girder, force effect) request.
//!
//! ## Overview
//!
//! Assembly is the only step that talks to the [`BridgeModel`]. It resolves
//! the request location to a measurement station, gathers framing and section
//! data, derives the longitudinal stiffness parameter (and the torsional
//! constant for box sections without one), rounds lengths to the design code
//! tolerance, and validates the result. Any missing or malformed model data
//! surfaces as [`GeometryUnavailable`](crate::errors::LldfError) here, before
//! any strategy work starts.
//!
//! ## Reference
//!
//! LRFD Eq. 4.6.2.2.1-1 (Kg), LRFD Eq. C4.6.2.2.1-3 (box J).

use tracing::debug;

use crate::codes::DesignCode;
use crate::context::{round_to_tolerance, DfContext, DfLocation, ForceEffect};
use crate::errors::{LldfError, LldfResult};
use crate::model::{BridgeModel, Connectivity, CrossSectionFamily, SectionProperties};

/// Longitudinal stiffness parameter per LRFD Eq. 4.6.2.2.1-1:
///
/// ```text
/// Kg = n (I + A eg^2)
/// ```
///
/// with `I` in in^4, `A` in in^2, `eg` in inches, and `n` the modular ratio
/// between girder and deck materials.
pub fn longitudinal_stiffness_parameter(
    modular_ratio: f64,
    moment_of_inertia_in4: f64,
    area_in2: f64,
    eccentricity_in: f64,
) -> f64 {
    modular_ratio * (moment_of_inertia_in4 + area_in2 * eccentricity_in * eccentricity_in)
}

/// Torsional constant for the assembled context.
///
/// An explicit section value wins; box sections without one derive it from
/// their wall dimensions. Other families fall back to zero, which providers
/// treat as "not applicable".
fn resolve_torsional_constant(
    family: CrossSectionFamily,
    section: &SectionProperties,
    location: &DfLocation,
    girder_index: usize,
) -> LldfResult<f64> {
    if let Some(j) = section.torsional_constant_in4 {
        return Ok(j);
    }
    match family {
        CrossSectionFamily::Box => match &section.box_walls {
            Some(walls) if walls.is_well_formed() => Ok(walls.torsional_constant_in4()),
            Some(_) => Err(LldfError::geometry_unavailable(
                location.to_string(),
                girder_index,
                "box wall dimensions are malformed",
            )),
            None => Err(LldfError::geometry_unavailable(
                location.to_string(),
                girder_index,
                "box sections require a torsional constant or wall dimensions",
            )),
        },
        _ => Ok(0.0),
    }
}

/// Assemble the resolution context for one request.
///
/// Lengths are rounded to [`DesignCode::spacing_tolerance_ft`] before they
/// are stored, so every later comparison sees stable values.
pub fn assemble_context<M: BridgeModel>(
    model: &M,
    location: DfLocation,
    girder_index: usize,
    effect: ForceEffect,
    code: &DesignCode,
) -> LldfResult<DfContext> {
    let girder_count = model.girder_count();
    if girder_index >= girder_count {
        return Err(LldfError::geometry_unavailable(
            location.to_string(),
            girder_index,
            "girder index is out of range",
        ));
    }

    let stamp = |e: LldfError| e.for_girder(girder_index);
    let point = model
        .controlling_location(&location, effect)
        .map_err(stamp)?;
    let span_length = model.span_length_ft(point.span).map_err(stamp)?;
    let framing = model.spacing_and_overhangs(&point).map_err(stamp)?;
    let skews = model.skew_angles(&point).map_err(stamp)?;
    let section = model.section_properties(&point).map_err(stamp)?;

    let family = model.cross_section_family();
    let torsional_constant =
        resolve_torsional_constant(family, &section, &location, girder_index)?;
    let stiffness_parameter = longitudinal_stiffness_parameter(
        section.modular_ratio,
        section.moment_of_inertia_in4,
        section.area_in2,
        section.eccentricity_in,
    );

    let tolerance = code.spacing_tolerance_ft;
    let ctx = DfContext {
        location,
        girder_index,
        force_effect: effect,
        girder_count,
        lane_count: model.lane_count(),
        lane_width_ft: model.lane_width_ft(),
        span_length_ft: round_to_tolerance(span_length, tolerance),
        avg_spacing_ft: round_to_tolerance(framing.avg_spacing_ft, tolerance),
        spacing_ft: framing
            .spacing_ft
            .iter()
            .map(|s| round_to_tolerance(*s, tolerance))
            .collect(),
        left_overhang_ft: round_to_tolerance(framing.left_overhang_ft, tolerance),
        right_overhang_ft: round_to_tolerance(framing.right_overhang_ft, tolerance),
        skew_start_deg: skews.start_deg,
        skew_end_deg: skews.end_deg,
        moment_of_inertia_in4: section.moment_of_inertia_in4,
        area_in2: section.area_in2,
        eccentricity_in: section.eccentricity_in,
        modular_ratio: section.modular_ratio,
        torsional_constant_in4: torsional_constant,
        stiffness_parameter_in4: stiffness_parameter,
        is_exterior: girder_index == 0 || girder_index == girder_count - 1,
        is_connected_as_unit: model.connectivity() == Connectivity::ConnectedAsUnit,
        deck: model.deck_type(),
        arrangement: model.beam_arrangement(),
        family,
        code: *code,
    };
    ctx.validate()?;

    debug!(
        location = %ctx.location,
        girder = girder_index,
        effect = %effect,
        span = point.span,
        station_ft = point.distance_ft,
        "assembled distribution factor context"
    );
    Ok(ctx)
}
