//! Actors: long-lived tasks reached through cloneable handles.
//!
//! - `supervisor`: answers user messages and `/status`
//! - `wikipedia`: encyclopedia lookups over the MediaWiki API
//! - `messages`: message and error types shared by the actors
//! - `traits`: collaborator seams, mocked in tests

pub mod messages;
pub mod supervisor;
pub mod traits;
pub mod wikipedia;
