//! Per-frame entry point.
//!
//! [`Interpreter`] holds what never changes in a session (config, layout,
//! classifier). [`Session`] holds everything carried from one frame to the next
//! and is passed in explicitly, so a test can drive a session with nothing but a
//! list of synthetic snapshots.

use tracing::{debug, info, warn};

use crate::config::CanvasConfig;
use crate::drawing::{DrawInstruction, DrawingState, Stroke};
use crate::error::Result;
use crate::gesture::{GestureClassifier, GestureState};
use crate::landmarks::LandmarkSnapshot;
use crate::regions::{ControlLayout, RegionId};
use crate::types::Point;

pub struct Interpreter {
    config: CanvasConfig,
    layout: ControlLayout,
    classifier: GestureClassifier,
}

/// Mutable state of one drawing session.
pub struct Session {
    gesture: GestureState,
    last_tip: Option<Point>,
    drawing: DrawingState,
    frames: u64,
}

/// Everything the renderer needs to know about one processed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub gesture: GestureState,
    pub tip: Option<Point>,
    pub highlighted: Option<RegionId>,
    pub instructions: Vec<DrawInstruction>,
    pub finished: Option<Stroke>,
}

impl Interpreter {
    /// Validates the config; a bad layout or bounds never reaches the frame loop.
    pub fn new(config: CanvasConfig) -> Result<Self> {
        config.validate()?;
        let layout = ControlLayout::from_config(&config)?;
        let classifier = GestureClassifier::new(&config);
        info!(
            width = config.width,
            height = config.height,
            regions = layout.regions().len(),
            pinch_px = classifier.threshold(),
            "interpreter ready"
        );
        Ok(Self { config, layout, classifier })
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn layout(&self) -> &ControlLayout {
        &self.layout
    }

    pub fn pinch_threshold(&self) -> f32 {
        self.classifier.threshold()
    }

    /// A fresh session: idle, blank canvas, configured defaults.
    pub fn session(&self) -> Session {
        Session {
            gesture: GestureState::Idle,
            last_tip: None,
            drawing: DrawingState::new(&self.config),
            frames: 0,
        }
    }

    pub fn step(&self, session: &mut Session, snapshot: &LandmarkSnapshot) -> FrameOutput {
        let now = self.classifier.classify(snapshot, &self.layout);

        if now.tip.is_none() && session.gesture.is_pinching() {
            warn!(frame = session.frames, "hand lost mid-stroke, finishing stroke");
        }
        if now.state != session.gesture {
            debug!(from = session.gesture.as_str(), to = now.state.as_str(), "gesture changed");
        }

        let update = session.drawing.update(session.gesture, &now, session.last_tip);

        session.gesture = now.state;
        session.last_tip = now.tip;
        session.frames += 1;

        FrameOutput {
            gesture: now.state,
            tip: now.tip,
            highlighted: now.state.hovered(),
            instructions: update.instructions,
            finished: update.finished,
        }
    }
}

impl Session {
    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    pub fn last_tip(&self) -> Option<Point> {
        self.last_tip
    }

    pub fn drawing(&self) -> &DrawingState {
        &self.drawing
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn clear_canvas(&mut self) {
        self.drawing.clear_canvas();
    }

    pub fn toggle_background(&mut self) {
        self.drawing.toggle_background();
    }
}
