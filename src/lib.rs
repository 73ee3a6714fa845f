//! commitscope - commit history visualization
//!
//! Turns a line-level change log (one CSV row per line of code, attributed
//! to the commit that last touched it) into a commit timeline, summary
//! statistics and a scroll-driven visualization model.

pub mod changelog;
pub mod cli;
pub mod config;
pub mod git;
pub mod models;
pub mod narrative;
pub mod render;
pub mod reporters;
pub mod timeline;
