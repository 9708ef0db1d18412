//! # Cross-Section Classifier
//!
//! Selects the equation family and the variant waivers for one context.
//!
//! ## Overview
//!
//! Classification is a pure function of the assembled context. It maps the
//! (family, arrangement, deck, connectivity) combination onto a type letter
//! of LRFD Table 4.6.2.2.1-1 and records which owner-agency waivers apply:
//!
//! | Family | Arrangement | Deck            | Connectivity | Selection |
//! |--------|-------------|-----------------|--------------|-----------|
//! | Box    | Adjacent    | any             | as unit      | type (g)  |
//! | Box    | Adjacent    | any             | vertical only| type (f)  |
//! | Box    | Spread      | cast-in-place   | any          | type (b)  |
//! | I-beam | Spread      | CIP or overlay  | any          | type (k)  |
//! | other combinations                                    | error     |
//!
//! TxDOT practice always promotes adjacent members to connected-as-unit, so
//! type (f) never survives classification under that variant. An
//! unrecognized combination is a contract violation and fails with
//! [`UnclassifiableCrossSection`](crate::errors::LldfError); there is no
//! fallback family.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::DfContext;
use crate::errors::{LldfError, LldfResult};
use crate::model::{BeamArrangement, Connectivity, CrossSectionFamily, DeckType};
use crate::provider::EquationFamily;

/// Classifier output: the equation family plus the waivers that shape the
/// rest of the pipeline for this context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySelection {
    /// Equation family to request from the code equation provider
    pub family: EquationFamily,
    /// Moment results skip skew correction (TxDOT practice)
    pub skip_skew_for_moment: bool,
    /// Connectivity was promoted to connected-as-unit by the variant
    pub force_connected_as_unit: bool,
    /// This exterior girder is designed with interior girder rules
    /// (WSDOT narrow-overhang practice)
    pub exterior_as_interior: bool,
}

impl StrategySelection {
    /// Effective connectivity after any variant promotion
    pub fn connected_as_unit(&self, ctx: &DfContext) -> bool {
        self.force_connected_as_unit || ctx.is_connected_as_unit
    }
}

/// Classify one context into a [`StrategySelection`].
///
/// Pure and side effect free; the only failure is an unrecognized
/// cross-section combination.
pub fn classify(ctx: &DfContext) -> LldfResult<StrategySelection> {
    let force_connected = ctx.code.forces_connected_as_unit();
    let connected = force_connected || ctx.is_connected_as_unit;

    let family = match (ctx.family, ctx.arrangement, ctx.deck) {
        (CrossSectionFamily::Box, BeamArrangement::Adjacent, _) => {
            if connected {
                EquationFamily::AdjacentBoxUnit
            } else {
                EquationFamily::AdjacentBoxKeyed
            }
        }
        (CrossSectionFamily::Box, BeamArrangement::Spread, DeckType::CastInPlace) => {
            EquationFamily::SpreadBox
        }
        (
            CrossSectionFamily::IBeam,
            BeamArrangement::Spread,
            DeckType::CastInPlace | DeckType::CompositeOverlay,
        ) => EquationFamily::IBeam,
        _ => {
            let declared = if ctx.is_connected_as_unit {
                Connectivity::ConnectedAsUnit
            } else {
                Connectivity::PreventVerticalDisplacement
            };
            return Err(LldfError::unclassifiable_cross_section(
                ctx.family.to_string(),
                ctx.deck.to_string(),
                ctx.arrangement.to_string(),
                declared.to_string(),
            ));
        }
    };

    // The overhang and spacing are pre-rounded, so this threshold compares
    // identically for geometrically equal inputs
    let exterior_as_interior = ctx.code.treats_narrow_overhang_as_interior()
        && ctx.is_exterior
        && ctx
            .exterior_overhang_ft()
            .is_some_and(|overhang| overhang <= ctx.avg_spacing_ft / 2.0);

    let selection = StrategySelection {
        family,
        skip_skew_for_moment: ctx.code.waives_moment_skew(),
        force_connected_as_unit: force_connected,
        exterior_as_interior,
    };
    debug!(
        family = %family,
        type_letter = %family.type_letter(),
        exterior_as_interior,
        "classified cross section"
    );
    Ok(selection)
}
