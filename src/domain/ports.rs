use crate::domain::currency_set::CurrencySet;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::io::Write;

pub trait Storage: Send + Sync {
    type Writer: Write;

    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;

    /// Opens `path` for writing, truncating anything already there. The file
    /// is closed when the writer is dropped.
    fn create_file(&self, path: &str) -> Result<Self::Writer>;
}

pub trait ConfigProvider: Send + Sync {
    fn source_url(&self) -> &str;
    fn source_file(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
    fn base_currency(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<String>;
    async fn transform(&self, source_text: String) -> Result<CurrencySet>;
    async fn load(&self, rates: CurrencySet) -> Result<String>;
}
