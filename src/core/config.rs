use clap::ValueEnum;
use std::path::PathBuf;

/// The six stages of the pipeline, in execution order. Used by `--max-function`
/// to stop the pipeline early for debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum PipelineStage {
    SourceReader,
    Scanner,
    Parser,
    SemanticAnalyzer,
    InterCodeGen,
    CodeGen,
}

/// Configuration entity for a single compilation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    pub max_function: Option<PipelineStage>,
    pub verbose: u8,
}

impl CompilerConfig {
    pub fn new(
        input_file: PathBuf,
        output_dir: PathBuf,
        max_function: Option<PipelineStage>,
        verbose: u8,
    ) -> Self {
        Self {
            input_file,
            output_dir,
            max_function,
            verbose,
        }
    }
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::new(),
            output_dir: PathBuf::from("generated"),
            max_function: None,
            verbose: 0,
        }
    }
}
