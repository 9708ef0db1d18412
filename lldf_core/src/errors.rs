//! # Error Types
//!
//! Structured error types for lldf_core. Distribution factor resolution is
//! all-or-nothing: there are no partial results and no retries, so every
//! variant here is fatal for the request that raised it. Each one carries
//! enough context to identify the girder, location, and rule that failed.
//!
//! ## Example
//!
//! ```rust
//! use lldf_core::errors::{LldfError, LldfResult};
//!
//! fn require_span_length(span_length_ft: f64) -> LldfResult<()> {
//!     if span_length_ft <= 0.0 {
//!         return Err(LldfError::geometry_unavailable(
//!             "span 1 midspan",
//!             0,
//!             "span length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for lldf_core operations
pub type LldfResult<T> = Result<T, LldfError>;

/// Structured error type for distribution factor resolution.
///
/// Each variant provides specific context about what went wrong, enabling
/// programmatic error handling by callers and batch drivers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum LldfError {
    /// The bridge model could not supply the geometry or section data
    /// needed at the requested location (missing, malformed, or out of range)
    #[error("Geometry unavailable at {location} for girder {girder_index}: {reason}")]
    GeometryUnavailable {
        location: String,
        girder_index: usize,
        reason: String,
    },

    /// The cross section does not match any supported family/deck/arrangement
    /// combination, so no equation family can be selected
    #[error(
        "Unclassifiable cross section: {family} family, {deck} deck, {arrangement} arrangement, {connectivity}"
    )]
    UnclassifiableCrossSection {
        family: String,
        deck: String,
        arrangement: String,
        connectivity: String,
    },

    /// Candidate resolution discarded every candidate. The lanes-over-beams
    /// floor always qualifies, so reaching this indicates a logic defect
    /// rather than bad input
    #[error(
        "No controlling candidate at {location} for girder {girder_index}, {force_effect}, {loaded_lanes}"
    )]
    NoControllingCandidate {
        location: String,
        girder_index: usize,
        force_effect: String,
        loaded_lanes: String,
    },
}

impl LldfError {
    /// Create a GeometryUnavailable error
    pub fn geometry_unavailable(
        location: impl Into<String>,
        girder_index: usize,
        reason: impl Into<String>,
    ) -> Self {
        LldfError::GeometryUnavailable {
            location: location.into(),
            girder_index,
            reason: reason.into(),
        }
    }

    /// Create an UnclassifiableCrossSection error
    pub fn unclassifiable_cross_section(
        family: impl Into<String>,
        deck: impl Into<String>,
        arrangement: impl Into<String>,
        connectivity: impl Into<String>,
    ) -> Self {
        LldfError::UnclassifiableCrossSection {
            family: family.into(),
            deck: deck.into(),
            arrangement: arrangement.into(),
            connectivity: connectivity.into(),
        }
    }

    /// Create a NoControllingCandidate error
    pub fn no_controlling_candidate(
        location: impl Into<String>,
        girder_index: usize,
        force_effect: impl Into<String>,
        loaded_lanes: impl Into<String>,
    ) -> Self {
        LldfError::NoControllingCandidate {
            location: location.into(),
            girder_index,
            force_effect: force_effect.into(),
            loaded_lanes: loaded_lanes.into(),
        }
    }

    /// Check if this error indicates an engine logic defect rather than
    /// bad input (worth an assertion in test suites, a bug report in the field)
    pub fn is_logic_defect(&self) -> bool {
        matches!(self, LldfError::NoControllingCandidate { .. })
    }

    /// Rewrite the girder index on errors that carry one.
    ///
    /// Bridge models answer cross-section level queries without knowing which
    /// girder asked; the assembler uses this to stamp the requesting girder
    /// onto errors they raise.
    pub fn for_girder(mut self, girder: usize) -> Self {
        match &mut self {
            LldfError::GeometryUnavailable { girder_index, .. }
            | LldfError::NoControllingCandidate { girder_index, .. } => *girder_index = girder,
            LldfError::UnclassifiableCrossSection { .. } => {}
        }
        self
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LldfError::GeometryUnavailable { .. } => "GEOMETRY_UNAVAILABLE",
            LldfError::UnclassifiableCrossSection { .. } => "UNCLASSIFIABLE_CROSS_SECTION",
            LldfError::NoControllingCandidate { .. } => "NO_CONTROLLING_CANDIDATE",
        }
    }
}
