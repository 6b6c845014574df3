//! Core engine types and utilities for Aetherdrift.
//!
//! This crate provides the foundational types used across all simulation
//! systems:
//! - Transform and spatial components for the 2D world plane
//! - Time management and numeric sanitization
//! - Common component types for the entity arena

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{DVec2, Vec2};
pub use hecs::{Entity, World};
