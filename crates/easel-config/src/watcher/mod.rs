//! File watcher for package hot reload.
//!
//! Uses the `notify` crate to watch package roots, coalescing bursts of
//! change events per package within a debounce window.

mod package_watcher;


pub use package_watcher::PackageWatcher;
