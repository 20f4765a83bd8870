mod bus;
mod events;

pub use bus::{EventBus, Subscription};
pub use events::{EventOrigin, SceneEvent};

/// Receives scene events dispatched by the [`EventBus`]
pub trait EventHandler {
    fn handle_event(&mut self, event: &SceneEvent);
}
