//! The shell: owner of every registry, IPC entry point, and shutdown.

mod core;
mod ipc_args;
mod ipc_dispatch;
mod notifications;
mod packages;
mod shutdown;
mod windows;

#[cfg(test)]
mod tests;

pub use self::core::{Shell, HOST_NAME};
