//! Gesture classification: one snapshot in, exactly one [`GestureState`] out.
//!
//! Pinch wins over hover. A pinch is the index tip and thumb tip within the
//! threshold distance; otherwise the index tip is looked up in the control layout.

use crate::config::CanvasConfig;
use crate::landmarks::{CanvasMapping, Landmark, LandmarkSnapshot};
use crate::regions::{ControlLayout, Hit, RegionId};
use crate::types::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Pinching,
    Hovering(RegionId),
}

impl GestureState {
    pub fn is_pinching(self) -> bool {
        matches!(self, GestureState::Pinching)
    }

    pub fn hovered(self) -> Option<RegionId> {
        match self {
            GestureState::Hovering(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GestureState::Idle => "IDLE",
            GestureState::Pinching => "PINCH",
            GestureState::Hovering(_) => "HOVER",
        }
    }
}

/// Result of classifying one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub state: GestureState,
    /// Index tip on the canvas (clamped). `None` when the hand is lost.
    pub tip: Option<Point>,
    /// Set only when `state` is `Hovering`.
    pub hit: Option<Hit>,
}

impl Classification {
    pub fn hand_lost() -> Self {
        Self { state: GestureState::Idle, tip: None, hit: None }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GestureClassifier {
    mapping: CanvasMapping,
    threshold: f32,
}

impl GestureClassifier {
    pub fn new(config: &CanvasConfig) -> Self {
        Self { mapping: CanvasMapping::new(config), threshold: config.pinch_threshold_px() }
    }

    /// Pinch threshold in canvas pixels.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn classify(&self, snapshot: &LandmarkSnapshot, layout: &ControlLayout) -> Classification {
        let index = snapshot.get(Landmark::IndexTip).and_then(|p| self.mapping.map(p));
        let thumb = snapshot.get(Landmark::ThumbTip).and_then(|p| self.mapping.map(p));
        let (Some(index), Some(thumb)) = (index, thumb) else {
            return Classification::hand_lost();
        };

        // Distance on unclamped points: two tips off the same edge are not a pinch.
        let pinching = is_pinch(index, thumb, self.threshold);
        let tip = self.mapping.clamp(index);

        if pinching {
            return Classification { state: GestureState::Pinching, tip: Some(tip), hit: None };
        }
        match layout.resolve(tip) {
            Some(hit) => {
                Classification { state: GestureState::Hovering(hit.id), tip: Some(tip), hit: Some(hit) }
            }
            None => Classification { state: GestureState::Idle, tip: Some(tip), hit: None },
        }
    }
}

pub fn is_pinch(index_tip: Point, thumb_tip: Point, threshold: f32) -> bool {
    index_tip.distance(thumb_tip) <= threshold
}
