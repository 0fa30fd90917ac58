//! Run configuration.
//!
//! Paths are resolved once, at start-up, into a [`PipelineConfig`]; nothing
//! downstream inspects the environment.

use std::path::{Path, PathBuf};

use crate::extract::ClassifierConfig;
use crate::parser::ParseOptions;
use crate::rank::{EmbedderKind, DEFAULT_DIMENSION};
use crate::render::JsonFormat;
use crate::select::SelectionConfig;

/// Input directory whose presence marks a container deployment.
pub const CONTAINER_INPUT_DIR: &str = "/app/input";

/// File name of the input record inside the input directory.
pub const INPUT_RECORD_FILE: &str = "input.json";

/// Directory holding the PDFs inside the input directory.
pub const PDF_DIR: &str = "PDFs";

/// File name of the report inside the output directory.
pub const OUTPUT_FILE: &str = "output.json";

/// Everything a pipeline run needs to know.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory containing `input.json` and `PDFs/`
    pub input_dir: PathBuf,
    /// Directory receiving `output.json`
    pub output_dir: PathBuf,
    /// Directory containing the embedding model files
    pub model_dir: PathBuf,
    /// Embedding backend
    pub embedder: EmbedderKind,
    /// Vector length for the hashing embedder
    pub dimension: usize,
    /// Report formatting
    pub format: JsonFormat,
    /// PDF parsing options
    pub parse: ParseOptions,
    /// Classification thresholds
    pub classifier: ClassifierConfig,
    /// Selection limits
    pub selection: SelectionConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::local()
    }
}

impl PipelineConfig {
    /// Pick container or local paths depending on whether
    /// [`CONTAINER_INPUT_DIR`] exists.
    pub fn resolve() -> Self {
        if Path::new(CONTAINER_INPUT_DIR).exists() {
            log::debug!("{} exists, using container paths", CONTAINER_INPUT_DIR);
            Self::container()
        } else {
            Self::local()
        }
    }

    /// Paths used inside the container image.
    pub fn container() -> Self {
        Self::with_dirs("/app/input", "/app/output", "/app/models")
    }

    /// Paths used for local runs, relative to the working directory.
    pub fn local() -> Self {
        Self::with_dirs("test_run/input", "test_run/output", "models")
    }

    /// Create a config with explicit directories and default settings.
    pub fn with_dirs(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        model_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            model_dir: model_dir.into(),
            embedder: EmbedderKind::default(),
            dimension: DEFAULT_DIMENSION,
            format: JsonFormat::Pretty,
            parse: ParseOptions::default(),
            classifier: ClassifierConfig::default(),
            selection: SelectionConfig::default(),
        }
    }

    /// Set the input directory.
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the model directory.
    pub fn with_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.model_dir = dir.into();
        self
    }

    /// Set the embedding backend.
    pub fn with_embedder(mut self, kind: EmbedderKind) -> Self {
        self.embedder = kind;
        self
    }

    /// Set the hashing embedder's vector length.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Set the report format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Set PDF parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set classification thresholds.
    pub fn with_classifier(mut self, config: ClassifierConfig) -> Self {
        self.classifier = config;
        self
    }

    /// Set selection limits.
    pub fn with_selection(mut self, config: SelectionConfig) -> Self {
        self.selection = config;
        self
    }

    /// Path of the input record.
    pub fn input_record_path(&self) -> PathBuf {
        self.input_dir.join(INPUT_RECORD_FILE)
    }

    /// Directory scanned for PDFs.
    pub fn pdf_dir(&self) -> PathBuf {
        self.input_dir.join(PDF_DIR)
    }

    /// Path of the report.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(OUTPUT_FILE)
    }
}
