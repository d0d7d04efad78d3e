//! Use-case services for the post-admin screens.
//!
//! # Responsibility
//! - Orchestrate store, blob and engine calls into screen-level APIs.
//! - Keep UI/FFI callers away from storage details.

pub mod browse;
pub mod category_service;
pub mod post_service;
