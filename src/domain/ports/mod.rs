//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the async trait interfaces that infrastructure adapters
//! must implement:
//! - RecordStore: append-only object storage for standup records
//! - IssueTracker: open tasks per member
//! - CodeReview: review (pull request) state per member
//! - TextGenerator: generative-text completion
//!
//! The services depend only on these traits, so every collaborator can be
//! replaced with a test double.

pub mod null_adapters;
pub mod record_store;
pub mod text_generator;
pub mod work_tracking;

pub use null_adapters::{NullCodeReview, NullIssueTracker, UnavailableTextGenerator};
pub use record_store::{ObjectMeta, RecordStore, StoreError};
pub use text_generator::{GenerationError, TextGenerator};
pub use work_tracking::{CodeReview, IssueTracker};
