//! `warmup run`: load every asset of a manifest with a live progress bar.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use warmup::config::ConfigFile;
use warmup::estimator::{Estimator, ProgressAnimator};
use warmup::loader::{AssetLoader, DecodedCache, ProbeChain, ReqwestFetcher, ResourceTimings};
use warmup::logging::init_logging;
use warmup::pipeline::progress_channel;
use warmup::{StaticCatalog, WarmupPlan, WarmupReport, WarmupSession};

use super::load_config;
use crate::error::CliError;
use crate::ui::{print_summary, LoadingBar};

/// Longest wait for the bar to finish filling after loading completes.
const ANIMATION_GRACE: Duration = Duration::from_secs(5);

/// Arguments for `warmup run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// JSON manifest mapping sections to tiered asset lists
    pub manifest: PathBuf,

    /// Only warm up these sections (repeatable; default: all)
    #[arg(long = "section", short = 's')]
    pub sections: Vec<String>,

    /// Assets loaded concurrently per chunk (overrides config)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Pause between chunks in milliseconds (overrides config)
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

/// Run the warm-up described by `args`.
pub fn run(args: RunArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, &args)?;

    let _logging_guard = init_logging(&config.logging.directory, &config.logging.file)
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    let catalog = StaticCatalog::load(&args.manifest)?;
    let plan = if args.sections.is_empty() {
        WarmupPlan::for_all(&catalog)
    } else {
        WarmupPlan::for_sections(&catalog, args.sections.as_slice())?
    };

    info!(
        manifest = %args.manifest.display(),
        assets = plan.total(),
        chunk_size = config.loader.chunk_size,
        "warm-up requested"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let report = runtime.block_on(warm_up(&config, &plan))?;
    print_summary(&report);
    Ok(())
}

fn apply_overrides(config: &mut ConfigFile, args: &RunArgs) -> Result<(), CliError> {
    if let Some(chunk_size) = args.chunk_size {
        if chunk_size == 0 {
            return Err(CliError::Config("--chunk-size must be at least 1".to_string()));
        }
        config.loader.chunk_size = chunk_size;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.loader.inter_chunk_delay_ms = delay_ms;
    }
    Ok(())
}

async fn warm_up(config: &ConfigFile, plan: &WarmupPlan) -> Result<WarmupReport, CliError> {
    let settings = &config.loader;

    let timings = Arc::new(ResourceTimings::new());
    let fetcher = Arc::new(
        ReqwestFetcher::with_timeout(settings.timeout())?.with_timings(Arc::clone(&timings)),
    );
    let probes = ProbeChain::standard(
        timings,
        Arc::clone(&fetcher),
        settings.size_probe_delay(),
        settings.head_probe,
    );
    let loader = AssetLoader::new(fetcher, Arc::new(DecodedCache::new()), probes);
    let session = WarmupSession::from_settings(Arc::new(loader), settings);

    let (publisher, watcher) = progress_channel();
    let animation = ProgressAnimator::new(Estimator::new(config.estimator.to_estimator_config()))
        .with_frame_interval(config.estimator.frame_interval())
        .spawn(watcher);

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    let bar = LoadingBar::new();
    let frames = animation.frames();
    let (report, ()) = tokio::join!(
        async {
            let report = session.run(plan, &publisher, &cancel).await;
            if report.cancelled {
                animation.begin_fade();
            }
            report
        },
        bar.follow(frames),
    );

    // `follow` returns once the animator stops, which it does on its own
    // after reaching done or settling for the fade.
    match tokio::time::timeout(ANIMATION_GRACE, animation.finished()).await {
        Ok(Some(state)) if state.is_done() => bar.finish(),
        Ok(_) => bar.abandon("Stopped"),
        Err(_) => {
            warn!("progress animation did not finish in time");
            bar.abandon("Stopped");
        }
    }

    Ok(report)
}
