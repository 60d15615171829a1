//! Pointer picking, camera-follow selection and drag-to-reposition.
//!
//! Two selectors are kept apart: the follow target is only chosen while the simulation runs,
//! the drag target only while it is paused. Neither affects dynamics; a drag only writes a
//! body's position when it is committed.

use bevy::log::{debug, warn};

use crate::math::Vec2;
use crate::store::{BodyHandle, BodyStore};

/// Pointer state for one frame, already mapped to world space by the windowing layer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerInput {
    /// Primary button went down this frame.
    pub pressed: bool,
    /// Primary button went up this frame.
    pub released: bool,
    /// Current pointer position, if the pointer is over the view.
    pub position: Option<Vec2>,
}

/// A body being repositioned while paused.
///
/// `candidate` is only a preview until `commit`; the body itself is not moved before that.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    target: Option<BodyHandle>,
    candidate: Vec2,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<BodyHandle> {
        self.target
    }

    pub fn candidate(&self) -> Option<Vec2> {
        self.target.map(|_| self.candidate)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Interaction {
    follow: Option<BodyHandle>,
    drag: DragState,
}

impl Interaction {
    pub fn follow_target(&self) -> Option<BodyHandle> {
        self.follow
    }

    pub fn set_follow_target(&mut self, target: Option<BodyHandle>) {
        if self.follow != target {
            debug!("follow target changed to {:?}", target);
        }
        self.follow = target;
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Applies one frame of pointer input: press, then release, then candidate update.
    ///
    /// A release commits the candidate recorded on earlier frames, so a press and release in
    /// the same frame leaves the body where it was.
    pub fn handle_pointer(&mut self, store: &mut BodyStore, pointer: &PointerInput, paused: bool) {
        if pointer.pressed
            && let Some(point) = pointer.position
        {
            self.pointer_pressed(store, point, paused);
        }
        if pointer.released {
            self.commit_drag(store);
        }
        if let Some(point) = pointer.position {
            self.update_drag(point);
        }
    }

    /// Picks the body nearest to `point`: a follow target while running, a drag while paused.
    pub fn pointer_pressed(&mut self, store: &BodyStore, point: Vec2, paused: bool) {
        let found = store.nearest_to(point);
        if paused {
            match found {
                Some(handle) => {
                    self.begin_drag(store, handle);
                }
                None => self.cancel_drag(),
            }
        } else {
            self.set_follow_target(found);
            self.cancel_drag();
        }
    }

    /// Starts dragging `handle` with its current position as the candidate.
    pub fn begin_drag(&mut self, store: &BodyStore, handle: BodyHandle) -> bool {
        match store.get(handle) {
            Some(body) => {
                debug!("drag started on body {}", handle.index());
                self.drag = DragState {
                    target: Some(handle),
                    candidate: body.position(),
                };
                true
            }
            None => {
                self.drag = DragState::default();
                false
            }
        }
    }

    pub fn update_drag(&mut self, point: Vec2) {
        if self.drag.is_dragging() {
            self.drag.candidate = point;
        }
    }

    /// Writes the candidate into the target's position and ends the drag.
    ///
    /// Returns false when nothing was dragged or the handle no longer resolves.
    pub fn commit_drag(&mut self, store: &mut BodyStore) -> bool {
        let drag = std::mem::take(&mut self.drag);
        let Some(handle) = drag.target else {
            return false;
        };
        match store.get_mut(handle) {
            Some(body) => {
                body.state.position = drag.candidate;
                debug!(
                    "drag committed body {} to ({:.2}, {:.2})",
                    handle.index(),
                    drag.candidate.x,
                    drag.candidate.y
                );
                true
            }
            None => {
                warn!("drag target {:?} is stale, nothing committed", handle);
                false
            }
        }
    }

    /// Ends the drag without touching any body.
    pub fn cancel_drag(&mut self) {
        if self.drag.is_dragging() {
            debug!("drag cancelled");
        }
        self.drag = DragState::default();
    }

    /// Forgets every selection, e.g. after the store has been cleared.
    pub fn clear(&mut self) {
        self.follow = None;
        self.drag = DragState::default();
    }
}
