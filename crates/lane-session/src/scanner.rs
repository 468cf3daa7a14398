//! # Scan Debouncer
//!
//! Turns the camera worker's stream of barcode detections into a
//! rate-limited, deduplicated stream of accepted scans. A physical barcode
//! held in front of a camera decodes on nearly every frame; without the
//! cooldown a single can of tea rings up thirty times a second.
//!
//! ## Race Safety
//! Detection callbacks arrive concurrently. The cooldown check and the
//! timestamp update are a single compare-and-swap: the timestamp moves
//! forward *before* acceptance is reported, so two frames decoded inside the
//! same window can never both pass.
//!
//! ## Region Filter
//! An optional caller-supplied predicate over the detection's bounding box
//! runs before the cooldown check ("is this code inside the capture
//! frame?"). Whether to restrict scans to the visible capture region is a
//! configuration choice; a rejection there never consumes the cooldown.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::settings::Settings;

/// Sentinel for "no scan accepted yet".
const NEVER: i64 = i64::MIN;

/// Where a detection landed in the camera frame, in pixel coordinates.
/// The debouncer only hands it to the region predicate; it attaches no
/// meaning of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A decoded barcode candidate from the detection worker.
///
/// Decoding is upstream's problem; by the time a candidate reaches the
/// debouncer it is already a string.
#[derive(Debug, Clone)]
pub struct ScanCandidate {
    pub barcode: String,
    pub bounds: Option<DetectionBounds>,
}

impl ScanCandidate {
    pub fn new(barcode: impl Into<String>) -> Self {
        ScanCandidate {
            barcode: barcode.into(),
            bounds: None,
        }
    }

    pub fn with_bounds(barcode: impl Into<String>, bounds: DetectionBounds) -> Self {
        ScanCandidate {
            barcode: barcode.into(),
            bounds: Some(bounds),
        }
    }
}

/// Outcome of evaluating one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDecision {
    /// Emit this barcode to the cart pipeline.
    Accepted,
    /// Rejected by the region predicate; the cooldown was not consumed.
    OutOfRegion,
    /// A scan was already accepted within the cooldown window.
    InCooldown,
}

impl ScanDecision {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, ScanDecision::Accepted)
    }
}

/// Predicate deciding whether a detection's position is acceptable.
pub type RegionPredicate = Box<dyn Fn(&DetectionBounds) -> bool + Send + Sync>;

/// The debouncer itself. One instance per capture session, shared by all
/// detection callbacks.
pub struct ScanDebouncer {
    settings: Arc<Settings>,

    /// Millisecond timestamp of the last accepted scan, [`NEVER`] before the
    /// first. Only ever advanced through compare-and-swap.
    last_accepted_ms: AtomicI64,

    region_predicate: Option<RegionPredicate>,
}

impl ScanDebouncer {
    pub fn new(settings: Arc<Settings>) -> Self {
        ScanDebouncer {
            settings,
            last_accepted_ms: AtomicI64::new(NEVER),
            region_predicate: None,
        }
    }

    /// Adds a region predicate. Candidates without bounds are then rejected
    /// as out-of-region, matching a detector that reports no box for codes
    /// clipped by the frame edge.
    pub fn with_region_predicate(
        mut self,
        predicate: impl Fn(&DetectionBounds) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.region_predicate = Some(Box::new(predicate));
        self
    }

    /// Evaluates a candidate against the wall clock.
    pub fn evaluate(&self, candidate: &ScanCandidate) -> ScanDecision {
        self.evaluate_at(candidate, Utc::now().timestamp_millis())
    }

    /// Evaluates a candidate at an explicit timestamp.
    ///
    /// The region predicate runs first and never touches the timestamp. The
    /// cooldown gate then loops on compare-and-swap: whoever lands the swap
    /// owns the acceptance, every concurrent loser re-reads a fresh
    /// timestamp and falls into the cooldown branch.
    pub fn evaluate_at(&self, candidate: &ScanCandidate, now_ms: i64) -> ScanDecision {
        if let Some(predicate) = &self.region_predicate {
            let in_region = candidate.bounds.as_ref().map(predicate).unwrap_or(false);
            if !in_region {
                return ScanDecision::OutOfRegion;
            }
        }

        let cooldown_ms = self.settings.scan_cooldown_ms() as i64;

        loop {
            let last = self.last_accepted_ms.load(Ordering::Acquire);
            if last != NEVER && now_ms.saturating_sub(last) < cooldown_ms {
                return ScanDecision::InCooldown;
            }
            if self
                .last_accepted_ms
                .compare_exchange(last, now_ms, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return ScanDecision::Accepted;
            }
        }
    }
}
