pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::LocalStorage;
pub use config::TomlConfig;
pub use crate::core::{
    etl::EtlEngine, pipeline::ExportPipeline, repository::CurrencyRepository,
    session::ConversionSession,
};
pub use domain::{currency::Currency, currency_set::CurrencySet};
pub use utils::error::{FxError, Result};
