//! # Bridge Model
//!
//! Geometry and section queries the engine needs from a bridge description.
//!
//! ## Overview
//!
//! The engine never walks a full bridge product model. Everything it needs is
//! behind the [`BridgeModel`] trait: counts and cross-section classification
//! inputs, plus per-location queries for span length, spacing, skew, and
//! section properties. Host applications implement the trait over their own
//! model; [`BridgeDescription`] is the built-in implementation for prismatic
//! bridges with uniform girder spacing, which is also what the test suites
//! build their fixtures from.
//!
//! All lengths are in feet, all section properties in inches.
//!
//! ## Reference
//!
//! Cross-section families follow LRFD Table 4.6.2.2.1-1.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::{DfLocation, ForceEffect, PierFace};
use crate::errors::{LldfError, LldfResult};

// ============================================================================
// Cross-Section Vocabulary
// ============================================================================

/// Deck type over the girders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeckType {
    /// Composite cast-in-place concrete slab
    #[default]
    CastInPlace,
    /// Composite structural overlay on the girder tops
    CompositeOverlay,
    /// No composite deck (bare girders, possibly with a wearing surface)
    None,
}

impl DeckType {
    /// All deck types for UI selection
    pub const ALL: [DeckType; 3] = [DeckType::CastInPlace, DeckType::CompositeOverlay, DeckType::None];

    /// Display name for UI and error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            DeckType::CastInPlace => "cast-in-place",
            DeckType::CompositeOverlay => "composite overlay",
            DeckType::None => "none",
        }
    }
}

impl std::fmt::Display for DeckType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Declared transverse connectivity between adjacent members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Connectivity {
    /// Members are connected sufficiently to act as a unit
    ConnectedAsUnit,
    /// Members are connected only enough to prevent relative vertical
    /// displacement at the interface
    #[default]
    PreventVerticalDisplacement,
}

impl Connectivity {
    /// All connectivity declarations for UI selection
    pub const ALL: [Connectivity; 2] = [
        Connectivity::ConnectedAsUnit,
        Connectivity::PreventVerticalDisplacement,
    ];

    /// Display name for UI and error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Connectivity::ConnectedAsUnit => "connected to act as a unit",
            Connectivity::PreventVerticalDisplacement => {
                "connected to prevent relative vertical displacement"
            }
        }
    }
}

impl std::fmt::Display for Connectivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Transverse arrangement of the girders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BeamArrangement {
    /// Members placed side by side with only a joint between them
    Adjacent,
    /// Members placed at a spacing larger than their width
    #[default]
    Spread,
}

impl BeamArrangement {
    /// All arrangements for UI selection
    pub const ALL: [BeamArrangement; 2] = [BeamArrangement::Adjacent, BeamArrangement::Spread];

    /// Display name for UI and error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            BeamArrangement::Adjacent => "adjacent",
            BeamArrangement::Spread => "spread",
        }
    }
}

impl std::fmt::Display for BeamArrangement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Structural family of the girder cross section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CrossSectionFamily {
    /// Closed box sections (solid, voided, or cellular)
    Box,
    /// Open I-shaped or bulb-tee sections
    #[default]
    IBeam,
    /// Anything else; never classifiable by this engine
    Other,
}

impl CrossSectionFamily {
    /// All families for UI selection
    pub const ALL: [CrossSectionFamily; 3] = [
        CrossSectionFamily::Box,
        CrossSectionFamily::IBeam,
        CrossSectionFamily::Other,
    ];

    /// Display name for UI and error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            CrossSectionFamily::Box => "box",
            CrossSectionFamily::IBeam => "I-beam",
            CrossSectionFamily::Other => "other",
        }
    }
}

impl std::fmt::Display for CrossSectionFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Geometry Snapshots
// ============================================================================

/// A request location resolved to a concrete measurement station.
///
/// Keeps the originating [`DfLocation`] so downstream queries (skew, section)
/// can be answered for the same request without re-deriving it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurePoint {
    /// Location the request referred to
    pub location: DfLocation,
    /// Zero-based index of the span the station falls in
    pub span: usize,
    /// Distance from the start of that span, ft
    pub distance_ft: f64,
}

/// Transverse framing at one station: spacings and deck overhangs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingSnapshot {
    /// Average girder spacing, ft
    pub avg_spacing_ft: f64,
    /// Individual spacings left to right, ft (`girder_count - 1` entries)
    pub spacing_ft: Vec<f64>,
    /// Deck overhang beyond the left exterior girder, ft
    pub left_overhang_ft: f64,
    /// Deck overhang beyond the right exterior girder, ft
    pub right_overhang_ft: f64,
}

/// Skew angles at the two ends of the span a request resolves into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkewPair {
    /// Skew at the start of the span, degrees
    pub start_deg: f64,
    /// Skew at the end of the span, degrees
    pub end_deg: f64,
}

impl SkewPair {
    /// Mean of the two end skews, degrees
    pub fn avg_deg(&self) -> f64 {
        (self.start_deg + self.end_deg) / 2.0
    }
}

// ============================================================================
// Section Properties
// ============================================================================

/// Wall-centerline dimensions of a closed box cell.
///
/// `half_width_in` and `half_depth_in` are the half-width and half-depth of
/// the cell measured between wall centerlines; thicknesses are the local wall
/// thicknesses. Used to derive the torsional constant when the section data
/// does not carry one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxWalls {
    /// Half-width of the cell between web centerlines, in
    pub half_width_in: f64,
    /// Half-depth of the cell between flange centerlines, in
    pub half_depth_in: f64,
    /// Top flange thickness, in
    pub top_thickness_in: f64,
    /// Bottom flange thickness, in
    pub bottom_thickness_in: f64,
    /// Web (exterior wall) thickness, in
    pub web_thickness_in: f64,
}

impl BoxWalls {
    /// Whether every dimension is finite and positive
    pub fn is_well_formed(&self) -> bool {
        [
            self.half_width_in,
            self.half_depth_in,
            self.top_thickness_in,
            self.bottom_thickness_in,
            self.web_thickness_in,
        ]
        .iter()
        .all(|d| d.is_finite() && *d > 0.0)
    }

    /// St. Venant torsional constant for the closed thin-walled cell,
    /// per LRFD Eq. C4.6.2.2.1-3:
    ///
    /// ```text
    /// J = 4 Ao^2 / Σ(s/t)
    /// Ao = s_top · s_side
    /// Σ(s/t) = s_top/t_top + s_top/t_bot + 2 · s_side/t_web
    /// ```
    ///
    /// where `s_top` is the half-width and `s_side` the half-depth of the
    /// cell. The caller is responsible for checking [`Self::is_well_formed`]
    /// first; zero thicknesses would divide by zero here.
    pub fn torsional_constant_in4(&self) -> f64 {
        let enclosed_area = self.half_width_in * self.half_depth_in;
        let wall_sum = self.half_width_in / self.top_thickness_in
            + self.half_width_in / self.bottom_thickness_in
            + 2.0 * (self.half_depth_in / self.web_thickness_in);
        4.0 * enclosed_area * enclosed_area / wall_sum
    }
}

/// Stiffness properties of one girder section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    /// Moment of inertia, in^4
    pub moment_of_inertia_in4: f64,
    /// Cross-sectional area, in^2
    pub area_in2: f64,
    /// Distance between girder and deck centroids, in
    pub eccentricity_in: f64,
    /// Modular ratio between girder and deck materials
    pub modular_ratio: f64,
    /// St. Venant torsional constant, in^4. For box families this may be
    /// omitted and derived from `box_walls` instead
    pub torsional_constant_in4: Option<f64>,
    /// Closed-cell wall dimensions, required for box families when
    /// `torsional_constant_in4` is not given
    pub box_walls: Option<BoxWalls>,
}

// ============================================================================
// Bridge Model Trait
// ============================================================================

/// Read-only geometry and section queries against a bridge description.
///
/// The engine holds the model by reference and only ever reads from it, one
/// query at a time. Implementations are expected to tolerate concurrent read
/// access if the caller fans requests out across threads; any caching they do
/// internally is their own concern.
pub trait BridgeModel {
    /// Number of girder lines in the cross section
    fn girder_count(&self) -> usize;

    /// Number of spans
    fn span_count(&self) -> usize;

    /// Number of design lanes on the roadway
    fn lane_count(&self) -> usize;

    /// Design lane width, ft
    fn lane_width_ft(&self) -> f64;

    /// Deck type over the girders
    fn deck_type(&self) -> DeckType;

    /// Declared transverse connectivity between adjacent members
    fn connectivity(&self) -> Connectivity;

    /// Transverse arrangement of the girders
    fn beam_arrangement(&self) -> BeamArrangement;

    /// Structural family of the girder cross section
    fn cross_section_family(&self) -> CrossSectionFamily;

    /// Length of the given span, ft
    fn span_length_ft(&self, span: usize) -> LldfResult<f64>;

    /// Resolve a request location to the station where the given force
    /// effect is measured
    fn controlling_location(
        &self,
        location: &DfLocation,
        effect: ForceEffect,
    ) -> LldfResult<MeasurePoint>;

    /// Transverse framing at the given station
    fn spacing_and_overhangs(&self, at: &MeasurePoint) -> LldfResult<SpacingSnapshot>;

    /// Skew angles at the two ends of the span the station falls in
    fn skew_angles(&self, at: &MeasurePoint) -> LldfResult<SkewPair>;

    /// Stiffness properties of the girder section at the given station
    fn section_properties(&self, at: &MeasurePoint) -> LldfResult<SectionProperties>;
}

// ============================================================================
// Reference Implementation
// ============================================================================

/// Fraction of the span length where moment is measured
const MOMENT_MEASURE_FRACTION: f64 = 0.5;
/// Fraction of the span length where span shear is measured
const SHEAR_MEASURE_FRACTION: f64 = 0.15;

/// One span of a [`BridgeDescription`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanDescription {
    /// Unique span id
    pub id: Uuid,
    /// Optional label for reports ("Span 1", etc.)
    pub label: String,
    /// Span length, ft
    pub length_ft: f64,
    /// Skew angle at the start of the span, degrees
    pub skew_start_deg: f64,
    /// Skew angle at the end of the span, degrees
    pub skew_end_deg: f64,
}

impl SpanDescription {
    /// Create a square (zero skew) span
    pub fn new(length_ft: f64) -> Self {
        SpanDescription {
            id: Uuid::new_v4(),
            label: String::new(),
            length_ft,
            skew_start_deg: 0.0,
            skew_end_deg: 0.0,
        }
    }

    /// Set the label (builder pattern)
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the end skews in degrees (builder pattern)
    pub fn with_skews(mut self, start_deg: f64, end_deg: f64) -> Self {
        self.skew_start_deg = start_deg;
        self.skew_end_deg = end_deg;
        self
    }
}

/// Built-in [`BridgeModel`] for prismatic bridges with uniform girder
/// spacing and a single girder section throughout.
///
/// A bridge with `n` spans has `n + 1` piers, numbered from the start
/// abutment (pier 0) to the end abutment (pier `n`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeDescription {
    /// Name for reports
    pub label: String,
    /// Spans in order, start abutment to end abutment
    pub spans: Vec<SpanDescription>,
    /// Number of girder lines
    pub girder_count: usize,
    /// Uniform girder spacing, ft
    pub girder_spacing_ft: f64,
    /// Deck overhang beyond the left exterior girder, ft
    pub left_overhang_ft: f64,
    /// Deck overhang beyond the right exterior girder, ft
    pub right_overhang_ft: f64,
    /// Number of design lanes
    pub lane_count: usize,
    /// Design lane width, ft
    pub lane_width_ft: f64,
    /// Deck type
    pub deck: DeckType,
    /// Transverse connectivity between adjacent members
    pub connectivity: Connectivity,
    /// Adjacent or spread arrangement
    pub arrangement: BeamArrangement,
    /// Girder section family
    pub family: CrossSectionFamily,
    /// Girder section properties, uniform over the bridge
    pub section: SectionProperties,

    /// Cumulative pier stations, computed on first use
    #[serde(skip)]
    stations: OnceCell<Vec<f64>>,
}

impl BridgeDescription {
    /// Create a bridge description with two 12 ft design lanes, no
    /// overhangs, a cast-in-place deck, and a spread I-beam section.
    /// Use the `with_*` builders to adjust from there.
    pub fn new(
        label: impl Into<String>,
        spans: Vec<SpanDescription>,
        girder_count: usize,
        girder_spacing_ft: f64,
        section: SectionProperties,
    ) -> Self {
        BridgeDescription {
            label: label.into(),
            spans,
            girder_count,
            girder_spacing_ft,
            left_overhang_ft: 0.0,
            right_overhang_ft: 0.0,
            lane_count: 2,
            lane_width_ft: 12.0,
            deck: DeckType::CastInPlace,
            connectivity: Connectivity::PreventVerticalDisplacement,
            arrangement: BeamArrangement::Spread,
            family: CrossSectionFamily::IBeam,
            section,
            stations: OnceCell::new(),
        }
    }

    /// Set the deck overhangs in feet (builder pattern)
    pub fn with_overhangs(mut self, left_ft: f64, right_ft: f64) -> Self {
        self.left_overhang_ft = left_ft;
        self.right_overhang_ft = right_ft;
        self
    }

    /// Set the design lane count and width (builder pattern)
    pub fn with_lanes(mut self, count: usize, width_ft: f64) -> Self {
        self.lane_count = count;
        self.lane_width_ft = width_ft;
        self
    }

    /// Set the deck type (builder pattern)
    pub fn with_deck(mut self, deck: DeckType) -> Self {
        self.deck = deck;
        self
    }

    /// Set the transverse connectivity (builder pattern)
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Set the girder arrangement (builder pattern)
    pub fn with_arrangement(mut self, arrangement: BeamArrangement) -> Self {
        self.arrangement = arrangement;
        self
    }

    /// Set the section family (builder pattern)
    pub fn with_family(mut self, family: CrossSectionFamily) -> Self {
        self.family = family;
        self
    }

    /// Cumulative stations of the piers, start abutment first
    fn stations(&self) -> &[f64] {
        self.stations.get_or_init(|| {
            let mut stations = Vec::with_capacity(self.spans.len() + 1);
            let mut total = 0.0;
            stations.push(0.0);
            for span in &self.spans {
                total += span.length_ft;
                stations.push(total);
            }
            stations
        })
    }

    /// Number of piers, including both abutments
    pub fn pier_count(&self) -> usize {
        self.spans.len() + 1
    }

    /// Station of the given pier from the start abutment, ft
    pub fn pier_station_ft(&self, pier: usize) -> Option<f64> {
        self.stations().get(pier).copied()
    }

    /// Total bridge length, ft
    pub fn total_length_ft(&self) -> f64 {
        self.stations().last().copied().unwrap_or(0.0)
    }

    /// Validate the description before use.
    ///
    /// The engine revalidates the assembled context per request; this is a
    /// convenience for catching malformed descriptions early.
    pub fn validate(&self) -> LldfResult<()> {
        let fail =
            |reason: &str| Err(LldfError::geometry_unavailable("bridge model", 0, reason));

        if self.spans.is_empty() {
            return fail("at least one span is required");
        }
        if self.girder_count < 2 {
            return fail("at least two girder lines are required");
        }
        if !(self.girder_spacing_ft.is_finite() && self.girder_spacing_ft > 0.0) {
            return fail("girder spacing must be positive");
        }
        if !(self.left_overhang_ft.is_finite() && self.left_overhang_ft >= 0.0)
            || !(self.right_overhang_ft.is_finite() && self.right_overhang_ft >= 0.0)
        {
            return fail("deck overhangs must be non-negative");
        }
        if self.lane_count == 0 {
            return fail("at least one design lane is required");
        }
        if !(self.lane_width_ft.is_finite() && self.lane_width_ft > 0.0) {
            return fail("lane width must be positive");
        }
        for span in &self.spans {
            if !(span.length_ft.is_finite() && span.length_ft > 0.0) {
                return fail("every span length must be positive");
            }
            if span.skew_start_deg.abs() >= 90.0 || span.skew_end_deg.abs() >= 90.0 {
                return fail("skew angles must be less than 90 degrees");
            }
        }
        Ok(())
    }

    fn span_for_pier_face(&self, pier: usize, face: PierFace) -> LldfResult<usize> {
        let location = DfLocation::PierFace { pier, face };
        if pier >= self.pier_count() {
            return Err(LldfError::geometry_unavailable(
                location.to_string(),
                0,
                "pier index is out of range",
            ));
        }
        match face {
            PierFace::Back => {
                if pier == 0 {
                    Err(LldfError::geometry_unavailable(
                        location.to_string(),
                        0,
                        "the start abutment has no back face",
                    ))
                } else {
                    Ok(pier - 1)
                }
            }
            PierFace::Ahead => {
                if pier == self.spans.len() {
                    Err(LldfError::geometry_unavailable(
                        location.to_string(),
                        0,
                        "the end abutment has no ahead face",
                    ))
                } else {
                    Ok(pier)
                }
            }
        }
    }
}

impl BridgeModel for BridgeDescription {
    fn girder_count(&self) -> usize {
        self.girder_count
    }

    fn span_count(&self) -> usize {
        self.spans.len()
    }

    fn lane_count(&self) -> usize {
        self.lane_count
    }

    fn lane_width_ft(&self) -> f64 {
        self.lane_width_ft
    }

    fn deck_type(&self) -> DeckType {
        self.deck
    }

    fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    fn beam_arrangement(&self) -> BeamArrangement {
        self.arrangement
    }

    fn cross_section_family(&self) -> CrossSectionFamily {
        self.family
    }

    fn span_length_ft(&self, span: usize) -> LldfResult<f64> {
        self.spans.get(span).map(|s| s.length_ft).ok_or_else(|| {
            LldfError::geometry_unavailable(
                DfLocation::Span { span }.to_string(),
                0,
                "span index is out of range",
            )
        })
    }

    fn controlling_location(
        &self,
        location: &DfLocation,
        effect: ForceEffect,
    ) -> LldfResult<MeasurePoint> {
        match *location {
            DfLocation::Span { span } => {
                let length = self.span_length_ft(span)?;
                let fraction = match effect {
                    ForceEffect::Moment => MOMENT_MEASURE_FRACTION,
                    ForceEffect::Shear => SHEAR_MEASURE_FRACTION,
                    ForceEffect::Reaction => 0.0,
                };
                Ok(MeasurePoint {
                    location: *location,
                    span,
                    distance_ft: fraction * length,
                })
            }
            DfLocation::PierFace { pier, face } => {
                let span = self.span_for_pier_face(pier, face)?;
                let distance_ft = match face {
                    PierFace::Back => self.span_length_ft(span)?,
                    PierFace::Ahead => 0.0,
                };
                Ok(MeasurePoint {
                    location: *location,
                    span,
                    distance_ft,
                })
            }
            DfLocation::PierReaction { pier } => {
                if self.spans.is_empty() {
                    return Err(LldfError::geometry_unavailable(
                        location.to_string(),
                        0,
                        "the bridge has no spans",
                    ));
                }
                if pier >= self.pier_count() {
                    return Err(LldfError::geometry_unavailable(
                        location.to_string(),
                        0,
                        "pier index is out of range",
                    ));
                }
                // Measure in the span ahead of the pier, falling back to the
                // last span at the end abutment
                let (span, distance_ft) = if pier < self.spans.len() {
                    (pier, 0.0)
                } else {
                    (pier - 1, self.span_length_ft(pier - 1)?)
                };
                Ok(MeasurePoint {
                    location: *location,
                    span,
                    distance_ft,
                })
            }
        }
    }

    fn spacing_and_overhangs(&self, at: &MeasurePoint) -> LldfResult<SpacingSnapshot> {
        if at.span >= self.spans.len() {
            return Err(LldfError::geometry_unavailable(
                at.location.to_string(),
                0,
                "span index is out of range",
            ));
        }
        let spacing_count = self.girder_count.saturating_sub(1);
        Ok(SpacingSnapshot {
            avg_spacing_ft: self.girder_spacing_ft,
            spacing_ft: vec![self.girder_spacing_ft; spacing_count],
            left_overhang_ft: self.left_overhang_ft,
            right_overhang_ft: self.right_overhang_ft,
        })
    }

    fn skew_angles(&self, at: &MeasurePoint) -> LldfResult<SkewPair> {
        let span = self.spans.get(at.span).ok_or_else(|| {
            LldfError::geometry_unavailable(
                at.location.to_string(),
                0,
                "span index is out of range",
            )
        })?;
        Ok(SkewPair {
            start_deg: span.skew_start_deg,
            end_deg: span.skew_end_deg,
        })
    }

    fn section_properties(&self, at: &MeasurePoint) -> LldfResult<SectionProperties> {
        if at.span >= self.spans.len() {
            return Err(LldfError::geometry_unavailable(
                at.location.to_string(),
                0,
                "span index is out of range",
            ));
        }
        Ok(self.section)
    }
}
