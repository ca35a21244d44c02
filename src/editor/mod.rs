pub mod interface;
pub mod buffer;
pub mod session;

pub use interface::{EditorError, EditorHost, Notification, Selection};
pub use buffer::TextBuffer;
pub use session::{CommandReport, Session};
