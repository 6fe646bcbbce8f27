//! Application layer: sessions and use cases
//!
//! This layer turns user input into model commands and derives presentation
//! data (canvas size, ASCII rendering) from model snapshots.

pub mod canvas;
pub mod command;
pub mod error;
pub mod render;
pub mod session;

pub use canvas::CanvasSize;
pub use command::Command;
pub use error::{ApplicationError, ApplicationResult};
pub use render::TreeRender;
pub use session::{EditorSession, Outcome};
