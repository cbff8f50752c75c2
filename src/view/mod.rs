mod frame;
mod state;
mod workspace;

pub use frame::{CellClass, Frame, FrameCell};
pub use state::{Command, DocumentView, Effect, SearchDirection, Viewport};
pub use workspace::{OpenDocument, Workspace};
