//! Types shared between the animator client crates: URL newtypes, wire bodies
//! exchanged with the animation backend, and the backend's error body.

pub mod domain;
pub mod error;
pub mod protocol;
