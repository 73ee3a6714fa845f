//! Project-level configuration support
//!
//! Loads per-project configuration from `commitscope.toml` or
//! `.commitscoperc.json` in the config directory (the working directory
//! unless `--config` says otherwise).
//!
//! # Configuration Format
//!
//! ```toml
//! # commitscope.toml
//! repository_url = "https://github.com/me/portfolio"
//!
//! [chart]
//! width = 1000
//! height = 600
//! radius = [2, 30]
//! margin = { top = 10, right = 10, bottom = 30, left = 20 }
//!
//! [colors]
//! dawn = "#1f3fff"
//! dusk = "#ff7d29"
//!
//! [narrative]
//! step_height = 100
//! anchor = 50
//!
//! [collect]
//! extensions = ["html", "css", "js", "svelte"]
//! exclude = ["vendor/**"]
//!
//! [defaults]
//! format = "html"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// File names searched, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["commitscope.toml", ".commitscoperc.json"];

/// Extensions blamed by `collect` when none are configured
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "html", "htm", "css", "scss", "js", "mjs", "cjs", "jsx", "ts", "tsx", "svelte", "vue", "json",
    "md", "py", "rs", "go", "java", "rb", "php", "c", "h", "cpp", "hpp", "sh",
];

/// Project-level configuration loaded from commitscope.toml or similar
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Base URL for commit permalinks
    #[serde(default = "default_repository_url")]
    pub repository_url: String,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub colors: ColorConfig,

    #[serde(default)]
    pub narrative: NarrativeConfig,

    #[serde(default)]
    pub collect: CollectConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            repository_url: default_repository_url(),
            chart: ChartConfig::default(),
            colors: ColorConfig::default(),
            narrative: NarrativeConfig::default(),
            collect: CollectConfig::default(),
            defaults: CliDefaults::default(),
        }
    }
}

fn default_repository_url() -> String {
    crate::timeline::DEFAULT_REPOSITORY_URL.to_string()
}

/// Scatter plot geometry
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub margin: MarginConfig,
    /// Smallest and largest point radius
    pub radius: [f64; 2],
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            margin: MarginConfig::default(),
            radius: [2.0, 30.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MarginConfig {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for MarginConfig {
    fn default() -> Self {
        Self {
            top: 10.0,
            right: 10.0,
            bottom: 30.0,
            left: 20.0,
        }
    }
}

/// Colour stops of the time-of-day scale, as `#rrggbb`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ColorConfig {
    pub dawn: String,
    pub dusk: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            dawn: "#1f3fff".to_string(),
            dusk: "#ff7d29".to_string(),
        }
    }
}

/// Scroll geometry of the step containers
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Height of one step box in pixels
    pub step_height: f64,
    /// Distance from the top of the viewport at which a step becomes active
    pub anchor: f64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            step_height: 100.0,
            anchor: 50.0,
        }
    }
}

/// Which files `collect` blames
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CollectConfig {
    /// File extensions to include, without the dot
    pub extensions: Vec<String>,
    /// Glob patterns excluded on top of .gitignore
    pub exclude: Vec<String>,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude: Vec::new(),
        }
    }
}

impl CollectConfig {
    /// Whether a path's extension is in the configured list (case-insensitive).
    pub fn includes_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CliDefaults {
    /// Default report format (text, json, html)
    #[serde(default)]
    pub format: Option<String>,
}

/// Load project configuration from a directory.
///
/// Searches for `commitscope.toml`, then `.commitscoperc.json`. A file that
/// fails to parse is reported and skipped. Falls back to defaults when
/// nothing usable is found.
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    // Try TOML first (preferred format)
    let toml_path = dir.join(CONFIG_FILE_NAMES[0]);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = dir.join(CONFIG_FILE_NAMES[1]);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded project config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Load configuration from a JSON file
fn load_json_config(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ProjectConfig = serde_json::from_str(&content)?;
    Ok(config)
}

impl ProjectConfig {
    /// The example file written by `commitscope init`.
    pub fn example_toml() -> &'static str {
        r##"# commitscope configuration

# Commit links point at <repository_url>/commit/<id>
repository_url = "https://github.com/YOUR_REPO"

[chart]
width = 1000
height = 600
radius = [2, 30]
margin = { top = 10, right = 10, bottom = 30, left = 20 }

[colors]
# Time-of-day scale: midnight starts at dawn, runs the long way round to dusk
dawn = "#1f3fff"
dusk = "#ff7d29"

[narrative]
step_height = 100
anchor = 50

[collect]
# extensions = ["html", "css", "js", "svelte"]
exclude = []

[defaults]
# Default report format (text, json, html)
format = "text"
"##
    }
}
