//! Infrastructure layer - Technical implementations
//!
//! This layer contains:
//! - Session observers backed by in-memory storage and tracing

pub mod audit;
