//! Subcommand handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use briefing_agents::AgentRoster;
use briefing_models::RunId;
use briefing_narrative::OpenRouterNarrator;
use briefing_orchestrator::{BriefingConfig, BriefingRequest, BriefingService, StaticLocations};
use briefing_persistence::{AgentResultStore, RunStore};
use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::{Cli, Commands, OutputFormat};
use crate::config;
use crate::error::Result;
use crate::render;

/// Options that shape the service for one invocation.
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub data_dir: PathBuf,
    pub feed_dir: PathBuf,
    pub phase_timeout: Duration,
    pub narrative: bool,
}

impl ServiceOptions {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            feed_dir: config::feeds_dir(&data_dir),
            data_dir,
            phase_timeout: BriefingConfig::default().phase_timeout,
            narrative: false,
        }
    }
}

/// Dispatches a parsed command line.
pub async fn execute(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir();
    match cli.command {
        Commands::Run {
            location,
            week_start,
            run_id,
            triggered_by,
            feed_dir,
            phase_timeout,
            no_narrative,
            format,
        } => {
            let mut options = ServiceOptions::new(&data_dir);
            if let Some(dir) = feed_dir {
                options.feed_dir = dir;
            }
            options.phase_timeout = Duration::from_secs(phase_timeout);
            options.narrative = !no_narrative;

            let service = build_service(&options)?;
            run(&service, &location, week_start, run_id, triggered_by, format).await
        }
        Commands::Show { run_id, format } => {
            let service = build_service(&ServiceOptions::new(&data_dir))?;
            show(&service, &RunId::from(run_id), format)
        }
        Commands::Results { run_id, format } => {
            let service = build_service(&ServiceOptions::new(&data_dir))?;
            results(&service, &RunId::from(run_id), format)
        }
        Commands::List { format } => {
            let service = build_service(&ServiceOptions::new(&data_dir))?;
            list(&service, format)
        }
    }
}

/// Wires stores, locations, feeds and the optional narrator.
pub fn build_service(options: &ServiceOptions) -> Result<BriefingService> {
    let locations = load_locations(&config::locations_file(&options.data_dir))?;
    let config = BriefingConfig::new().with_phase_timeout(options.phase_timeout);

    let service = BriefingService::new(
        AgentRoster::from_feeds(&options.feed_dir),
        Arc::new(RunStore::new(&options.data_dir)),
        Arc::new(AgentResultStore::new(&options.data_dir)),
        Arc::new(locations),
        config,
    );

    if !options.narrative {
        return Ok(service);
    }
    match OpenRouterNarrator::from_env()? {
        Some(narrator) => {
            info!(model = %narrator.model(), "narrative enabled");
            Ok(service.with_narrative(Arc::new(narrator)))
        }
        None => {
            info!("OPENROUTER_API_KEY not set, narrative disabled");
            Ok(service)
        }
    }
}

fn load_locations(path: &Path) -> Result<StaticLocations> {
    if !path.exists() {
        warn!(path = %path.display(), "locations file not found");
        return Ok(StaticLocations::default());
    }
    Ok(StaticLocations::load(path)?)
}

/// Runs one briefing, streaming progress to stderr.
pub async fn run(
    service: &BriefingService,
    location: &str,
    week_start: NaiveDate,
    run_id: Option<String>,
    triggered_by: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let run_id = match run_id {
        Some(id) => RunId::from(id),
        None => service.open_run(location, week_start, triggered_by.clone())?,
    };

    let (subscription, mut events) = service.subscribe_channel(&run_id);
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            eprintln!("{}", render::event_line(&event));
        }
    });

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Interrupted, cancelling briefing...");
                cancel.cancel();
            }
        })
    };

    let mut request = BriefingRequest::new(location, week_start).with_run_id(run_id.clone());
    if let Some(who) = triggered_by {
        request = request.with_triggered_by(who);
    }
    let outcome = service.run_briefing_with_cancel(request, cancel).await;

    interrupt.abort();
    // Dropping the subscription closes the channel if the run ended early.
    service.unsubscribe(&run_id, &subscription);
    let _ = printer.await;

    let briefing = outcome?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&briefing)?),
        OutputFormat::Text => print!("{}", render::briefing(&briefing)),
    }
    Ok(())
}

/// Prints a stored run.
pub fn show(service: &BriefingService, run_id: &RunId, format: OutputFormat) -> Result<()> {
    let run = service.load_run(run_id)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&run)?),
        OutputFormat::Text => print!("{}", render::run(&run)),
    }
    Ok(())
}

/// Prints the audit trail of a run.
pub fn results(service: &BriefingService, run_id: &RunId, format: OutputFormat) -> Result<()> {
    // Surface an unknown id rather than an empty list.
    service.load_run(run_id)?;
    let records = service.list_agent_results(run_id)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Text => print!("{}", render::results(&records)),
    }
    Ok(())
}

/// Prints every stored run.
pub fn list(service: &BriefingService, format: OutputFormat) -> Result<()> {
    let runs = service.list_runs()?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&runs)?),
        OutputFormat::Text => print!("{}", render::run_list(&runs)),
    }
    Ok(())
}
