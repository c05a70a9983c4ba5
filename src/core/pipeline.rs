use crate::core::repository::CurrencyRepository;
use crate::domain::currency_set::CurrencySet;
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::Result;
use chrono::Local;
use std::path::Path;

/// `exrates-YYYYMMDD.csv` for today's local date.
pub fn default_export_filename() -> String {
    format!("exrates-{}.csv", Local::now().format("%Y%m%d"))
}

/// Fetches the table, parses it, and writes the converted export in one pass.
pub struct ExportPipeline<S: Storage, C: ConfigProvider> {
    repository: CurrencyRepository<S>,
    config: C,
    original_amount: f64,
    filename: String,
    preview: bool,
}

impl<S: Storage, C: ConfigProvider> ExportPipeline<S, C> {
    pub fn new(repository: CurrencyRepository<S>, config: C, original_amount: f64) -> Self {
        Self {
            repository,
            config,
            original_amount,
            filename: default_export_filename(),
            preview: false,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Print the exported lines to stdout before writing them.
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ExportPipeline<S, C> {
    async fn extract(&self) -> Result<String> {
        let text = match self.config.source_file() {
            Some(path) => self.repository.load_source_file(path).await,
            None => self.repository.fetch_source_text(self.config.source_url()).await,
        };

        if text.is_empty() {
            tracing::warn!("Source document is empty, export will contain no rows");
        }
        Ok(text)
    }

    async fn transform(&self, source_text: String) -> Result<CurrencySet> {
        CurrencySet::parse_all(&source_text)
    }

    async fn load(&self, rates: CurrencySet) -> Result<String> {
        if self.preview {
            println!("Here is the information stored in your CSV file :");
            println!("{}", rates.format_all_with_conversion(self.original_amount));
        }

        self.repository
            .write_export(&rates.snapshot(), self.original_amount, &self.filename)?;

        let output_path = Path::new(self.config.output_path()).join(&self.filename);
        Ok(output_path.to_string_lossy().into_owned())
    }
}
