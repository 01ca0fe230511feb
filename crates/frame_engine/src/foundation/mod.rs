//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the pipeline:
//! - Math types and operations
//! - Colors
//! - Time management
//! - Logging utilities

pub mod color;
pub mod logging;
pub mod math;
pub mod time;
