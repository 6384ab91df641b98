//! Editor windows, request/reply sessions with their pages, and window
//! layout persistence.
//!
//! Platform windows sit behind [`NativeWindow`]; [`HeadlessFactory`]
//! provides a display-less backend.

pub mod headless;
pub mod ipc;
pub mod native;
pub mod registry;
pub mod session;
pub mod window;

pub use headless::{HeadlessEvent, HeadlessFactory, HeadlessLog, HeadlessWindow};
pub use ipc::IpcMessage;
pub use native::{NativeWindow, WindowFactory, WindowOptions};
pub use registry::{CloseOutcome, WindowQuery, WindowRegistry, WINDOW_LAYOUT_PROFILE};
pub use session::{ReplyCallback, SessionTable};
pub use window::{EditorWindow, LayoutSnapshot};
