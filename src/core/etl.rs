use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Loading exchange-rate table...");
        let source_text = self.pipeline.extract().await?;
        tracing::debug!("Source document is {} bytes", source_text.len());

        let rates = self.pipeline.transform(source_text).await?;
        tracing::info!("Parsed {} currencies", rates.len());

        let output_path = self.pipeline.load(rates).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
