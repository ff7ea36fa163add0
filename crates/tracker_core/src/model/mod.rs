mod event;
mod state;
mod task;

pub use event::{Event, EventShape, Notice, SubEvent};
pub use state::{CompletionRecord, TaskState};
pub use task::{AnnotatedTask, ConsolidatedTask, Priority, TaskOverrides, TaskSource, TaskTemplate};
