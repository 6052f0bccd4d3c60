use anyhow::Context;
use clap::Parser;
use service_orchestrator::config::cli::CliArgs;
use service_orchestrator::core::orchestrator::validate_request;
use service_orchestrator::utils::{logger, validation::Validate};
use service_orchestrator::{
    http_collaborators, OrchestrationEngine, Orchestrator, OrchestratorConfig, ServiceRequest,
};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = OrchestratorConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config.display()))?;

    if args.json_logs || config.json_logs() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(args.verbose, config.log_level());
    }

    tracing::info!("🚀 Starting service orchestrator");
    tracing::debug!("CLI args: {:?}", args);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let raw_request = std::fs::read_to_string(&args.request)
        .with_context(|| format!("failed to read request file '{}'", args.request.display()))?;
    let request = match ServiceRequest::from_json(&raw_request) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("❌ '{}' is not a valid service request: {}", args.request.display(), e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    if args.dry_run {
        let service = validate_request(&request)?;
        tracing::info!("🔍 DRY RUN - configuration and request are valid");
        println!(
            "Would orchestrate {} for {} (inter-cloud: {}, external: {})",
            service,
            request.requester,
            request.flags.trigger_inter_cloud(),
            request.flags.external_service_request()
        );
        return Ok(());
    }

    let collaborators = http_collaborators(&config)?;
    let orchestrator =
        Orchestrator::new(collaborators, config.settings()).with_selection(config.selection().build());
    let engine = OrchestrationEngine::new(orchestrator);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling orchestration");
            on_signal.cancel();
        }
    });

    match engine.orchestrate_cancellable(&request, &cancel).await {
        Ok(result) => {
            tracing::info!("✅ Orchestration finished with {} binding(s)", result.len());
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Err(e) => {
            tracing::error!(
                "❌ Orchestration failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
