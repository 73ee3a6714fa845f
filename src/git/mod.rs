//! Git collection module
//!
//! Produces the change log from a repository: every line of every
//! matching file at HEAD, attributed via blame to the commit that last
//! touched it.
//!
//! # Example
//!
//! ```no_run
//! use commitscope::config::CollectConfig;
//! use commitscope::git::LogCollector;
//! use std::path::Path;
//!
//! let collector = LogCollector::open(Path::new("/path/to/repo"), CollectConfig::default()).unwrap();
//! let lines = collector.collect().unwrap();
//! commitscope::changelog::write(std::io::stdout(), &lines).unwrap();
//! ```

pub mod blame;

pub use blame::{blame_file_lines, LogCollector};
