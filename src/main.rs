use clap::Parser;
use proof_desk::adapters::open_store;
use proof_desk::api;
use proof_desk::core::ConfigProvider;
use proof_desk::utils::error::ErrorSeverity;
use proof_desk::utils::{logger, validation::Validate};
use proof_desk::{ProofError, ServeArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServeArgs::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting proof-desk proxy");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let config = match args.resolve().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    let store = match open_store(&config.storage).await {
        Ok(store) => store,
        Err(e) => exit_with(e),
    };
    let app = match api::create_router(store, &config) {
        Ok(app) => app,
        Err(e) => exit_with(e),
    };

    let listener = tokio::net::TcpListener::bind((config.host(), config.port())).await?;
    tracing::info!(
        "Listening on {} ({:?} backend)",
        listener.local_addr()?,
        config.storage.backend
    );

    api::serve(listener, app).await?;
    Ok(())
}

fn exit_with(e: ProofError) -> ! {
    tracing::error!(
        "Startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("Suggestion: {}", e.recovery_suggestion());
    eprintln!("{}", e);

    let exit_code = match e.severity() {
        ErrorSeverity::Critical => 3,
        _ => 1,
    };
    std::process::exit(exit_code);
}
