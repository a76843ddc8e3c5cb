// Configuration loading

pub mod job;
pub mod paths;

pub use job::{JobConfig, OutputsConfig, PathsConfig};
pub use paths::ResolvedPaths;
