//! Dockable panels: which window hosts which panel, and opening or closing
//! panels against the package and window registries.

pub mod dock;
mod geometry;
pub mod ops;


pub use dock::PanelDockTable;
pub use ops::{view_url, PanelEnv};
