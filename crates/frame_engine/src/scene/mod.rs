//! Scene data read and written by the frame pipeline

pub mod context;
pub mod object;

pub use context::{SceneContext, DEFAULT_CLEAR_COLOR};
pub use object::{Bounds, ObjectFlags, ObjectId, ObjectSet, TrackedObject};
