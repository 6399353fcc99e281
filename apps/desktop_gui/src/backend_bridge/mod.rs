//! Backend bridge: command queue from the UI thread and the worker that runs it.

pub mod commands;
pub mod runtime;
