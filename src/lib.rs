//! Tagforged - MP4 tagging, branding and subtitle embedding
//!
//! This library crate exposes the front end around `tagforged-bmff` for
//! integration testing.

pub mod commands;
pub mod config;
pub mod subtitles;
