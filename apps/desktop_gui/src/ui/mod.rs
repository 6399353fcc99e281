//! UI layer for the desktop client: the eframe application shell and its panels.

pub mod app;

pub use app::{AnimatorApp, PersistedGuiSettings, StartupConfig, SETTINGS_STORAGE_KEY};
