use crate::error::CompileError;
use std::path::Path;

/// Interface for writing one generated source file into an output directory.
pub trait OutputWriter: Send + Sync {
    fn write_file(&self, dir: &Path, file_name: &str, contents: &str) -> Result<(), CompileError>;
}
