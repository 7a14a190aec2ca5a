//! Host surface: command registration, user notices, and the cleanup plugin.

pub mod commands;
pub mod notifications;
pub mod plugin;
