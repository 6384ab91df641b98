pub mod channels;
pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{ConfigError, EaselError, PackageError, PanelError, WindowError};
pub use events::{Notification, NotificationBus};
pub use id::{PanelId, SessionId, WindowId};
pub use types::{AppState, Rect, WindowKind};

pub type Result<T> = std::result::Result<T, EaselError>;
