use tracing::{debug, info};

use crate::adapters::fs_reader::FsSourceReader;
use crate::adapters::fs_writer::FsOutputWriter;
use crate::core::config::{CompilerConfig, PipelineStage};
use crate::emitter;
use crate::error::CompileError;
use crate::intergen;
use crate::parser;
use crate::ports::reader::SourceReader;
use crate::ports::writer::OutputWriter;
use crate::scanner::Scanner;
use crate::semantic;

/// Runs the full pipeline against the real filesystem.
pub fn run(config: &CompilerConfig) -> Result<(), CompileError> {
    run_with(config, &FsSourceReader::new(), &FsOutputWriter::new())
}

/// Runs the pipeline against caller-supplied ports, stopping early if
/// `config.max_function` names a stage. Each stage logs its own entry so a
/// `-vv` run shows exactly where a malformed program failed.
pub fn run_with(
    config: &CompilerConfig,
    reader: &dyn SourceReader,
    writer: &dyn OutputWriter,
) -> Result<(), CompileError> {
    info!("Phase 1: Reading {:?}...", config.input_file);
    let source = reader.read(&config.input_file)?;
    if config.max_function == Some(PipelineStage::SourceReader) {
        return Ok(());
    }

    info!("Phase 2: Scanning...");
    let tokens = Scanner::scan_all(&source)?;
    debug!("Produced {} tokens.", tokens.len());
    if config.max_function == Some(PipelineStage::Scanner) {
        return Ok(());
    }

    info!("Phase 3: Parsing...");
    let tree = parser::parse(tokens)?;
    if config.max_function == Some(PipelineStage::Parser) {
        return Ok(());
    }

    info!("Phase 4: Running semantic analysis...");
    let (typed_root, types) = semantic::analyze(&tree)?;
    debug!("Inferred {} types.", types.len());
    if config.max_function == Some(PipelineStage::SemanticAnalyzer) {
        return Ok(());
    }

    info!("Phase 5: Generating intermediate code...");
    let intermediate = intergen::generate(&typed_root, &types)?;
    debug!("Emitted {} declarations.", intermediate.declarations.len());
    if config.max_function == Some(PipelineStage::InterCodeGen) {
        return Ok(());
    }

    info!("Phase 6: Emitting C# source...");
    let files = emitter::emit(&intermediate);
    if config.max_function == Some(PipelineStage::CodeGen) {
        return Ok(());
    }

    info!(
        "Phase 7: Writing {} files to {:?}...",
        files.len(),
        config.output_dir
    );
    for (name, contents) in &files {
        writer.write_file(&config.output_dir, name, contents)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    struct FakeReader(String);
    impl SourceReader for FakeReader {
        fn read(&self, _path: &Path) -> Result<String, CompileError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct FakeWriter(Mutex<Vec<(String, String)>>);
    impl OutputWriter for FakeWriter {
        fn write_file(&self, _dir: &Path, name: &str, contents: &str) -> Result<(), CompileError> {
            self.0.lock().unwrap().push((name.to_string(), contents.to_string()));
            Ok(())
        }
    }

    #[test]
    fn runs_full_pipeline_against_fakes() {
        let config = CompilerConfig::new(
            PathBuf::from("in.decl"),
            PathBuf::from("out"),
            None,
            0,
        );
        let reader = FakeReader(r#"<root><cat Name="Whiskers"/></root>"#.to_string());
        let writer = FakeWriter::default();
        run_with(&config, &reader, &writer).unwrap();
        let written = writer.0.lock().unwrap();
        assert!(written.iter().any(|(name, _)| name == "Main.cs"));
        assert!(written.iter().any(|(name, _)| name == "Class1.cs"));
    }

    #[test]
    fn stops_early_at_requested_stage() {
        let config = CompilerConfig::new(
            PathBuf::from("in.decl"),
            PathBuf::from("out"),
            Some(PipelineStage::Scanner),
            0,
        );
        let reader = FakeReader(r#"<root><cat Name="Whiskers"/></root>"#.to_string());
        let writer = FakeWriter::default();
        run_with(&config, &reader, &writer).unwrap();
        assert!(writer.0.lock().unwrap().is_empty());
    }
}
