//! Named JSON profiles in three storage scopes.
//!
//! Layout state (`layout.windows`, `layout.<panelID>`) and package
//! settings are persisted as one JSON object per profile file.

mod store;

#[cfg(test)]
mod tests;

pub use store::{Profile, ProfileScope, ProfileStore};
