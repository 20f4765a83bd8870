use log::trace;

use crate::element::ObjectId;
use crate::event::{EventHandler, SceneEvent, Subscription};
use crate::scene::Canvas;

/// Invoked whenever the selection becomes empty
pub type ClearSelectionCallback = Box<dyn FnMut()>;

#[derive(Default)]
struct TrackerState {
    selection: Vec<ObjectId>,
    save_requested: bool,
    on_clear: Option<ClearSelectionCallback>,
}

impl EventHandler for TrackerState {
    fn handle_event(&mut self, event: &SceneEvent) {
        match event {
            SceneEvent::SelectionChanged(ids) => {
                self.selection = ids.clone();
                if ids.is_empty() {
                    if let Some(on_clear) = self.on_clear.as_mut() {
                        on_clear();
                    }
                }
            }
            _ if event.is_user_change() => {
                trace!("Save requested by {event:?}");
                self.save_requested = true;
            }
            _ => {}
        }
    }
}

/// Holds the scene's only event subscription and republishes the selection.
///
/// User-driven object churn raises a save request that the owner collects
/// with [`SelectionTracker::take_save_request`]. Churn caused by a restore is
/// ignored.
pub struct SelectionTracker {
    subscription: Subscription,
    state: TrackerState,
}

impl std::fmt::Debug for SelectionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionTracker")
            .field("selection", &self.state.selection)
            .field("save_requested", &self.state.save_requested)
            .finish()
    }
}

impl SelectionTracker {
    pub fn new(subscription: Subscription) -> Self {
        Self {
            subscription,
            state: TrackerState::default(),
        }
    }

    /// Subscribe to the canvas. Returns `None` if someone else already holds the subscription.
    pub fn attach(canvas: &mut Canvas) -> Option<Self> {
        let mut tracker = Self::new(canvas.subscribe()?);
        tracker.state.selection = canvas.active_ids().to_vec();
        Some(tracker)
    }

    pub fn set_clear_callback(&mut self, callback: Option<ClearSelectionCallback>) {
        self.state.on_clear = callback;
    }

    /// Drain pending scene events
    pub fn sync(&mut self, canvas: &mut Canvas) {
        canvas.dispatch_events(&self.subscription, &mut self.state);
    }

    /// The selection as of the last sync
    pub fn selection(&self) -> &[ObjectId] {
        &self.state.selection
    }

    pub fn take_save_request(&mut self) -> bool {
        std::mem::take(&mut self.state.save_requested)
    }
}
