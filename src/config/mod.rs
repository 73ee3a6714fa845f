//! Configuration module for commitscope
//!
//! This module handles:
//! - Project-level configuration (commitscope.toml)
//! - Chart geometry and colour overrides
//! - CLI defaults

mod project_config;

pub use project_config::{
    load_project_config, ChartConfig, CliDefaults, CollectConfig, ColorConfig, MarginConfig,
    NarrativeConfig, ProjectConfig, CONFIG_FILE_NAMES, DEFAULT_EXTENSIONS,
};
