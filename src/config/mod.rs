//! # Configuration Module
//!
//! This module provides configuration structures and validation for enhancement runs.

pub mod config;

pub use config::EnhanceConfig;
