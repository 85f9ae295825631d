use crate::error::CompileError;
use std::path::Path;

/// Interface for reading the raw source text of a program.
pub trait SourceReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<String, CompileError>;
}
