//! Pointer gestures on the board, reduced to click / drag-start / drag-end.

use std::sync::Arc;

use tracing::debug;

use super::controller::{Transition, TransitionController};
use crate::models::application::{Application, ApplicationStatus};

/// Pointer travel, in pixels, before a press turns into a drag.
pub const DEFAULT_ACTIVATION_DISTANCE: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    /// Press and release without enough travel: open the card.
    Click(String),
    DragStart(String),
    /// `target` is `None` when the card was released outside every column.
    DragEnd {
        application_id: String,
        target: Option<ApplicationStatus>,
    },
    Cancelled(String),
}

/// Resolves a raw drop-zone id to a stage. Anything else counts as a drop
/// outside the board.
pub fn resolve_drop_target(raw: Option<&str>) -> Option<ApplicationStatus> {
    let raw = raw?;
    match raw.parse::<ApplicationStatus>() {
        Ok(status) => Some(status),
        Err(_) => {
            debug!(target_id = raw, "drop target is not a stage");
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Idle,
    Pressed { application_id: String, origin: Point },
    Dragging { application_id: String },
}

#[derive(Debug)]
pub struct PointerTracker {
    activation_distance: f32,
    gesture: Gesture,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVATION_DISTANCE)
    }
}

impl PointerTracker {
    pub fn new(activation_distance: f32) -> Self {
        Self {
            activation_distance: activation_distance.max(0.0),
            gesture: Gesture::Idle,
        }
    }

    pub fn pointer_down(&mut self, application_id: &str, at: Point) {
        self.gesture = Gesture::Pressed {
            application_id: application_id.to_string(),
            origin: at,
        };
    }

    pub fn pointer_move(&mut self, at: Point) -> Option<DragEvent> {
        let Gesture::Pressed {
            application_id,
            origin,
        } = &self.gesture
        else {
            return None;
        };
        if origin.distance(&at) < self.activation_distance {
            return None;
        }
        let application_id = application_id.clone();
        self.gesture = Gesture::Dragging {
            application_id: application_id.clone(),
        };
        Some(DragEvent::DragStart(application_id))
    }

    /// `over` is the id of the drop zone under the pointer, if any.
    pub fn pointer_up(&mut self, over: Option<&str>) -> Option<DragEvent> {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => None,
            Gesture::Pressed { application_id, .. } => Some(DragEvent::Click(application_id)),
            Gesture::Dragging { application_id } => Some(DragEvent::DragEnd {
                application_id,
                target: resolve_drop_target(over),
            }),
        }
    }

    pub fn cancel(&mut self) -> Option<DragEvent> {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Dragging { application_id } => Some(DragEvent::Cancelled(application_id)),
            _ => None,
        }
    }

    /// Card currently being dragged.
    pub fn active(&self) -> Option<&str> {
        match &self.gesture {
            Gesture::Dragging { application_id } => Some(application_id),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum DndOutcome {
    /// Pointer activity with no board-level effect yet.
    None,
    /// Navigate to the application's detail view.
    Open(String),
    /// A drag began; render a floating preview of this card.
    Preview(String),
    Transition(Transition),
    /// Drop outside the board, cancelled drag, or unknown card.
    Ignored,
}

/// Wires pointer gestures to the transition controller.
pub struct BoardDnd {
    tracker: PointerTracker,
    controller: TransitionController,
    active: Option<String>,
}

impl BoardDnd {
    pub fn new(controller: TransitionController, activation_distance: f32) -> Self {
        Self {
            tracker: PointerTracker::new(activation_distance),
            controller,
            active: None,
        }
    }

    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    /// Record shown in the drag preview.
    pub fn active_card(&self) -> Option<Arc<Application>> {
        self.active
            .as_deref()
            .and_then(|id| self.controller.store().get(id))
    }

    pub fn drag_start(&mut self, application_id: &str) -> DndOutcome {
        if self.controller.store().get(application_id).is_none() {
            return DndOutcome::Ignored;
        }
        self.active = Some(application_id.to_string());
        DndOutcome::Preview(application_id.to_string())
    }

    /// Ends the drag. A drop onto a stage starts a status change; a drop
    /// anywhere else does nothing.
    pub fn drag_end(&mut self, application_id: &str, target: Option<&str>) -> DndOutcome {
        self.drop_on(application_id, resolve_drop_target(target))
    }

    fn drop_on(
        &mut self,
        application_id: &str,
        target: Option<ApplicationStatus>,
    ) -> DndOutcome {
        self.active = None;
        match target {
            Some(status) => {
                DndOutcome::Transition(self.controller.change_status(application_id, status))
            }
            None => DndOutcome::Ignored,
        }
    }

    pub fn pointer_down(&mut self, application_id: &str, at: Point) -> DndOutcome {
        self.tracker.pointer_down(application_id, at);
        DndOutcome::None
    }

    pub fn pointer_move(&mut self, at: Point) -> DndOutcome {
        match self.tracker.pointer_move(at) {
            Some(event) => self.handle(event),
            None => DndOutcome::None,
        }
    }

    pub fn pointer_up(&mut self, over: Option<&str>) -> DndOutcome {
        match self.tracker.pointer_up(over) {
            Some(event) => self.handle(event),
            None => DndOutcome::None,
        }
    }

    pub fn cancel(&mut self) -> DndOutcome {
        match self.tracker.cancel() {
            Some(event) => self.handle(event),
            None => DndOutcome::None,
        }
    }

    fn handle(&mut self, event: DragEvent) -> DndOutcome {
        match event {
            DragEvent::Click(id) => DndOutcome::Open(id),
            DragEvent::DragStart(id) => self.drag_start(&id),
            DragEvent::DragEnd {
                application_id,
                target,
            } => self.drop_on(&application_id, target),
            DragEvent::Cancelled(_) => {
                self.active = None;
                DndOutcome::Ignored
            }
        }
    }
}
