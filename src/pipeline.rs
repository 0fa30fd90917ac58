//! The end-to-end run: read the input record, extract every PDF, rank the
//! paragraphs, select sections and write the report.
//!
//! A document that cannot be parsed is logged and contributes nothing, but
//! it is still listed in the report metadata. Ranking failures abort the
//! run before anything is written.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::PipelineConfig;
use crate::detect::{discover_pdfs, document_name};
use crate::error::Result;
use crate::extract::{Corpus, PageBlockClassifier};
use crate::model::{InputRecord, PageRecord, Report};
use crate::parser::parse_path;
use crate::rank::{load_embedder, Embedder, RelevanceRanker, ScoredParagraph};
use crate::render::write_json;
use crate::select::SectionSelector;

/// Runs the extraction, ranking and selection steps.
///
/// The steps are public so that front ends can report progress between
/// them; [`Pipeline::run`] chains them all.
pub struct Pipeline {
    config: PipelineConfig,
    classifier: PageBlockClassifier,
    selector: SectionSelector,
}

impl Pipeline {
    /// Create a pipeline for a configuration.
    pub fn new(config: PipelineConfig) -> Self {
        let classifier = PageBlockClassifier::with_config(config.classifier.clone());
        let selector = SectionSelector::with_config(config.selection.clone());
        Self {
            config,
            classifier,
            selector,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read the input record.
    pub fn read_input(&self) -> Result<InputRecord> {
        InputRecord::from_path(self.config.input_record_path())
    }

    /// List the PDFs to process, sorted by file name.
    ///
    /// A missing PDF directory yields an empty list.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let dir = self.config.pdf_dir();
        if !dir.is_dir() {
            log::warn!("PDF directory {} not found, no documents to process", dir.display());
            return Ok(Vec::new());
        }
        let files = discover_pdfs(&dir)?;
        log::info!("Found {} PDF documents in {}", files.len(), dir.display());
        Ok(files)
    }

    /// Parse and classify one document.
    pub fn extract_document(&self, path: &Path) -> Result<Vec<PageRecord>> {
        let document = parse_path(path, self.config.parse.clone())?;
        Ok(self.classifier.classify_document(&document))
    }

    /// Extract one document into the corpus, logging and skipping it on
    /// failure. Returns the number of paragraphs added.
    pub fn extract_into(&self, path: &Path, corpus: &mut Corpus) -> usize {
        let name = document_name(path);
        match self.extract_document(path) {
            Ok(records) => {
                let before = corpus.len();
                for record in records {
                    corpus.push(record);
                }
                let added = corpus.len() - before;
                log::info!("Processed {}: {} paragraphs", name, added);
                added
            }
            Err(e) => {
                log::error!("Failed to process {}: {}", name, e);
                0
            }
        }
    }

    /// Extract every document into a corpus, in the given order.
    pub fn extract_all(&self, paths: &[PathBuf]) -> Corpus {
        self.extract_all_with(paths, |_, _| {})
    }

    /// Like [`Pipeline::extract_all`], calling `on_document` with each path
    /// and the number of paragraphs it added, once it has been processed.
    pub fn extract_all_with<F>(&self, paths: &[PathBuf], mut on_document: F) -> Corpus
    where
        F: FnMut(&Path, usize),
    {
        let mut corpus = Corpus::new();
        for path in paths {
            let added = self.extract_into(path, &mut corpus);
            on_document(path, added);
        }
        log::info!("Total paragraphs extracted for ranking: {}", corpus.len());
        corpus
    }

    /// Rank the corpus against the input record.
    pub fn rank<'c, E: Embedder>(
        &self,
        corpus: &'c Corpus,
        input: &InputRecord,
        embedder: E,
    ) -> Result<Vec<ScoredParagraph<'c>>> {
        RelevanceRanker::new(embedder).rank(
            corpus.paragraphs(),
            &input.persona,
            &input.job_to_be_done,
        )
    }

    /// Assemble the report from ranked paragraphs.
    pub fn build_report(
        &self,
        documents: &[PathBuf],
        input: &InputRecord,
        ranked: &[ScoredParagraph<'_>],
        corpus: &Corpus,
    ) -> Report {
        let names = documents.iter().map(document_name).collect();
        Report::empty(
            names,
            input.persona.clone(),
            input.job_to_be_done.clone(),
            Utc::now(),
        )
        .with_selection(
            self.selector.sections(ranked, corpus),
            self.selector.sub_sections(ranked),
        )
    }

    /// Write the report to the configured output path.
    pub fn write_report(&self, report: &Report) -> Result<PathBuf> {
        let path = self.config.output_path();
        write_json(&path, report, self.config.format)?;
        log::info!("Wrote report to {}", path.display());
        Ok(path)
    }

    /// Run every step with the configured embedder and write the report.
    pub fn run(&self) -> Result<Report> {
        self.run_with(|config| load_embedder(config.embedder, &config.model_dir, config.dimension))
    }

    /// Run every step, obtaining the embedder from `load`, and write the
    /// report.
    pub fn run_with<F, E>(&self, load: F) -> Result<Report>
    where
        F: FnOnce(&PipelineConfig) -> Result<E>,
        E: Embedder,
    {
        let input = self.read_input()?;
        let documents = self.discover()?;
        let corpus = self.extract_all(&documents);
        self.finish(&documents, &input, &corpus, load)
    }

    /// Rank an extracted corpus, select sections and write the report.
    ///
    /// `load` is only called when the corpus has at least one paragraph.
    pub fn finish<F, E>(
        &self,
        documents: &[PathBuf],
        input: &InputRecord,
        corpus: &Corpus,
        load: F,
    ) -> Result<Report>
    where
        F: FnOnce(&PipelineConfig) -> Result<E>,
        E: Embedder,
    {
        let report = if corpus.is_empty() {
            log::warn!("No content extracted, writing an empty report");
            self.build_report(documents, input, &[], corpus)
        } else {
            let embedder = load(&self.config)?;
            let ranked = self.rank(corpus, input, embedder)?;
            self.build_report(documents, input, &ranked, corpus)
        };

        self.write_report(&report)?;
        Ok(report)
    }
}
