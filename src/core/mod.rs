// Public modules
pub mod descriptor;
pub mod error;
pub mod generator;
pub mod paths;
pub mod version;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use generator::{generate, GenerateOptions, GenerateOutput, NameSource, PackageInfo};
