use crate::error::CompileError;
use crate::ports::reader::SourceReader;
use std::fs;
use std::path::Path;

/// Reads the whole source file into memory up front; the scanner then walks it
/// one character at a time.
#[derive(Default)]
pub struct FsSourceReader;

impl FsSourceReader {
    pub fn new() -> Self {
        Self
    }
}

impl SourceReader for FsSourceReader {
    fn read(&self, path: &Path) -> Result<String, CompileError> {
        Ok(fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_read_source_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("program.decl");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "<root><cat Name=\"Whiskers\"/></root>").unwrap();

        let reader = FsSourceReader::new();
        let source = reader.read(&file_path).unwrap();
        assert!(source.contains("Whiskers"));
    }

    #[test]
    fn test_read_missing_file_errors() {
        let reader = FsSourceReader::new();
        let result = reader.read(Path::new("/nonexistent/program.decl"));
        assert!(result.is_err());
    }
}
