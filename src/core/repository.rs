use crate::domain::currency::Currency;
use crate::domain::currency_set::LINE_SEPARATOR;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use reqwest::Client;
use std::io::Write;
use std::time::Duration;

pub const DEFAULT_SOURCE_URL: &str = "https://www.gov.uk/government/uploads/system/uploads/attachment_data/file/937009/exrates-monthly-1220.csv";

const FETCH_FAILURE_MESSAGE: &str = "The exchange-rate table could not be loaded, sorry :(";

/// Moves exchange-rate data between the in-memory set and text: the remote
/// or local source document on the way in, the export file on the way out.
pub struct CurrencyRepository<S: Storage> {
    storage: S,
    client: Client,
}

impl<S: Storage> CurrencyRepository<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            client: Client::new(),
        }
    }

    pub fn with_timeout(storage: S, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { storage, client })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Same layout as [`Currency::format_with_conversion`]; kept separate so
    /// the file format can move on its own.
    pub fn to_export_line(currency: &Currency, original_amount: f64) -> String {
        format!(
            "{},{},{:.6},{:.6},{},{}",
            currency.currency_code(),
            currency.country_name(),
            currency.converted_amount(original_amount),
            currency.units_per_euro(),
            currency.start_date(),
            currency.end_date()
        )
    }

    /// Writes one export line per record. Stops at the first failed write;
    /// lines already written stay in `out`.
    pub fn export_to<W: Write>(
        records: &[Currency],
        original_amount: f64,
        out: &mut W,
    ) -> Result<usize> {
        for (written, currency) in records.iter().enumerate() {
            let line = Self::to_export_line(currency, original_amount) + LINE_SEPARATOR;
            if let Err(e) = out.write_all(line.as_bytes()) {
                tracing::debug!("Export stopped after {} lines", written);
                return Err(e.into());
            }
        }
        out.flush()?;
        Ok(records.len())
    }

    /// Writes the export file and returns the number of lines written. The
    /// file is not rolled back on failure.
    pub fn write_export(
        &self,
        records: &[Currency],
        original_amount: f64,
        filename: &str,
    ) -> Result<usize> {
        tracing::debug!("Exporting {} records to {}", records.len(), filename);

        let result = self
            .storage
            .create_file(filename)
            .and_then(|mut out| Self::export_to(records, original_amount, &mut out));

        match &result {
            Ok(count) => tracing::info!("Wrote {} lines to {}", count, filename),
            Err(e) => tracing::error!("Export to {} failed: {}", filename, e),
        }
        result
    }

    /// Downloads the source document. Any failure is logged and reported on
    /// stderr, and yields an empty document.
    pub async fn fetch_source_text(&self, url: &str) -> String {
        match self.try_fetch(url).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Fetching {} failed: {}", url, e);
                eprintln!("{}", FETCH_FAILURE_MESSAGE);
                String::new()
            }
        }
    }

    /// Reads the source document from storage with the same empty-on-failure
    /// policy as [`fetch_source_text`](Self::fetch_source_text).
    pub async fn load_source_file(&self, path: &str) -> String {
        match self.storage.read_file(path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::error!("Reading {} failed: {}", path, e);
                eprintln!("{}", FETCH_FAILURE_MESSAGE);
                String::new()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("Making request to: {}", url);
        let response = self.client.get(url).send().await?;
        tracing::debug!("Response status: {}", response.status());

        let text = response.error_for_status()?.text().await?;
        tracing::info!("Fetched {} bytes of exchange-rate data", text.len());
        Ok(text)
    }
}
