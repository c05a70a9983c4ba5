use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "exrates")]
#[command(about = "Look up exchange rates and convert an amount into any listed currency")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// URL of the exchange-rate CSV
    #[arg(long, global = true)]
    pub source_url: Option<String>,

    /// Read the exchange-rate CSV from a local file instead of the URL
    #[arg(long, global = true)]
    pub source_file: Option<String>,

    /// Directory export files are written to
    #[arg(long, global = true)]
    pub output_dir: Option<String>,

    /// Download timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Label for the amount being converted
    #[arg(long, global = true)]
    pub base_currency: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Interactive convert/export menu (the default)
    Shell,
    /// Convert an amount for one country and print the result
    Convert {
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,
        #[arg(long)]
        country: String,
    },
    /// Write every currency with the converted amount to a CSV file
    Export {
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,
        /// File name, relative to the output directory
        #[arg(short, long)]
        output: Option<String>,
        /// Print the exported lines before writing them
        #[arg(long)]
        preview: bool,
    },
    /// Print the loaded table
    List,
}

impl CliConfig {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Shell)
    }

    /// Loads the file named by `--config` (or defaults) and applies the
    /// command-line overrides on top.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(url) = &self.source_url {
            config.source.url = url.clone();
            tracing::debug!("Source URL overridden to: {}", url);
        }
        if let Some(file) = &self.source_file {
            config.source.file = Some(file.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.export.output_path = dir.clone();
        }
        if let Some(timeout) = self.timeout {
            config.source.timeout_seconds = timeout;
        }
        if let Some(base) = &self.base_currency {
            config.conversion.base_currency = base.clone();
        }
        if self.log_json {
            config.logging.format = "json".to_string();
        }
    }

    pub fn log_format(&self, config: &TomlConfig) -> LogFormat {
        if self.log_json {
            LogFormat::Json
        } else {
            config.log_format()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;

    #[test]
    fn no_subcommand_means_shell() {
        let cli = CliConfig::parse_from(["exrates"]);
        assert_eq!(cli.command(), Command::Shell);
    }

    #[test]
    fn parses_convert_with_negative_amount() {
        let cli = CliConfig::parse_from(["exrates", "convert", "--amount", "-2.5", "--country", "UK"]);
        assert_eq!(
            cli.command(),
            Command::Convert {
                amount: -2.5,
                country: "UK".to_string()
            }
        );
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = CliConfig::parse_from([
            "exrates",
            "export",
            "--amount",
            "10",
            "--preview",
            "--output-dir",
            "/tmp/out",
            "--verbose",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.output_dir.as_deref(), Some("/tmp/out"));
        assert!(matches!(cli.command(), Command::Export { preview: true, output: None, .. }));
    }

    #[test]
    fn overrides_win_over_file_values() {
        let cli = CliConfig::parse_from([
            "exrates",
            "--source-url",
            "https://mirror.example.com/rates.csv",
            "--timeout",
            "3",
            "--base-currency",
            "Euros",
            "--log-json",
            "list",
        ]);
        let mut config = TomlConfig::from_toml_str("[source]\ntimeout_seconds = 60\n").unwrap();
        cli.apply_overrides(&mut config);

        assert_eq!(config.source_url(), "https://mirror.example.com/rates.csv");
        assert_eq!(config.request_timeout_secs(), 3);
        assert_eq!(config.base_currency(), "Euros");
        assert_eq!(cli.log_format(&config), LogFormat::Json);
    }

    #[test]
    fn resolve_without_config_file_uses_defaults() {
        let cli = CliConfig::parse_from(["exrates", "--source-file", "rates.csv"]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.source_file(), Some("rates.csv"));
        assert_eq!(config.output_path(), ".");
    }
}
