use crate::error::CompileError;
use crate::ports::writer::OutputWriter;
use std::fs;
use std::path::Path;

/// Writes each generated file into the output directory, creating it if needed.
#[derive(Default)]
pub struct FsOutputWriter;

impl FsOutputWriter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputWriter for FsOutputWriter {
    fn write_file(&self, dir: &Path, file_name: &str, contents: &str) -> Result<(), CompileError> {
        fs::create_dir_all(dir)?;
        fs::write(dir.join(file_name), contents)?;
        Ok(())
    }
}
