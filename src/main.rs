use clap::Parser;
use exrates::core::session::conversion_report;
use exrates::domain::ports::{ConfigProvider, Storage};
use exrates::utils::error::ErrorSeverity;
use exrates::utils::validation::{validate_amount, Validate};
use exrates::utils::logger;
use exrates::{
    CliConfig, Command, ConversionSession, CurrencyRepository, CurrencySet, EtlEngine,
    ExportPipeline, LocalStorage, TomlConfig,
};
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(cli.verbose, cli.log_format(&config));

    tracing::info!("Starting exrates");
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command(), config).await {
        tracing::error!(
            "exrates failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code);
        }
    }
}

async fn run(command: Command, config: TomlConfig) -> exrates::Result<()> {
    let storage = LocalStorage::new(config.output_path().to_string());
    let timeout = Duration::from_secs(config.request_timeout_secs());
    let repository = CurrencyRepository::with_timeout(storage, timeout)?;

    match command {
        Command::Export {
            amount,
            output,
            preview,
        } => {
            validate_amount("amount", amount)?;
            let mut pipeline = ExportPipeline::new(repository, config, amount).with_preview(preview);
            if let Some(output) = output {
                pipeline = pipeline.with_filename(output);
            }

            let output_path = EtlEngine::new(pipeline).run().await?;
            println!("📁 Output saved to: {}", output_path);
        }
        Command::Convert { amount, country } => {
            validate_amount("amount", amount)?;
            let rates = load_rates(&repository, &config).await?;
            let currency = rates.require_country(&country)?;
            print!("{}", conversion_report(currency, amount, config.base_currency()));
        }
        Command::List => {
            let rates = load_rates(&repository, &config).await?;
            print!("{}", rates);
        }
        Command::Shell => {
            let rates = load_rates(&repository, &config).await?;
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            ConversionSession::new(&rates, &repository, stdin.lock(), stdout.lock())
                .with_base_currency(config.base_currency())
                .run()?;
        }
    }

    Ok(())
}

async fn load_rates<S: Storage>(
    repository: &CurrencyRepository<S>,
    config: &TomlConfig,
) -> exrates::Result<CurrencySet> {
    let text = match config.source_file() {
        Some(path) => repository.load_source_file(path).await,
        None => repository.fetch_source_text(config.source_url()).await,
    };

    let rates = CurrencySet::parse_all(&text)?;
    tracing::info!("Loaded {} currencies", rates.len());
    Ok(rates)
}
