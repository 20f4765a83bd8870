use crate::element::ObjectId;

/// Where an object-level change came from.
///
/// Restoring a snapshot re-creates every object; those changes must not be
/// recorded as new history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrigin {
    User,
    Restore,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// The active selection changed; carries the new selection, possibly empty.
    SelectionChanged(Vec<ObjectId>),
    ObjectAdded { id: ObjectId, origin: EventOrigin },
    ObjectRemoved { id: ObjectId, origin: EventOrigin },
    /// A committed edit of an existing object (end of a move, resize, text edit)
    ObjectModified { id: ObjectId },
}

impl SceneEvent {
    /// True for user-driven changes to the scene contents
    pub fn is_user_change(&self) -> bool {
        match self {
            SceneEvent::ObjectAdded { origin, .. } | SceneEvent::ObjectRemoved { origin, .. } => {
                *origin == EventOrigin::User
            }
            SceneEvent::ObjectModified { .. } => true,
            SceneEvent::SelectionChanged(_) => false,
        }
    }
}
