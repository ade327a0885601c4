// src/lib.rs

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod job;
pub mod locale;
pub mod logging;
pub mod storage;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{Settings, default_settings_path, load_and_validate, load_module_configuration};
use crate::exec::TokioProcessRunner;
use crate::fs::{FileSystem, RealFileSystem};
use crate::job::{
    ChannelObserver, Configuration, HostContext, JobDescriptor, JobEvent, JobResult, ScriptJob,
};
use crate::storage::GlobalStorage;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings and module configuration loading
/// - the shared store (optionally seeded)
/// - the process runner and progress channel
/// - one script job, run on a blocking thread
///
/// A dry run reports `Success` without running anything.
pub async fn run(args: CliArgs) -> Result<JobResult> {
    let settings = load_settings(args.settings.as_deref())?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let configuration = match &args.module_config {
        Some(path) => load_module_configuration(fs.as_ref(), path)
            .with_context(|| format!("loading module configuration {:?}", path))?,
        None => Configuration::new(),
    };
    let script = args
        .script
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.job.script));
    let descriptor =
        JobDescriptor::new(script, &args.working_dir).with_configuration(configuration);
    let pre_script_path = args
        .pre_script
        .clone()
        .or_else(|| settings.job.pre_script.clone());

    if args.dry_run {
        print_dry_run(&settings, &descriptor, pre_script_path.as_deref());
        return Ok(JobResult::Success);
    }

    let storage = GlobalStorage::new();
    if let Some(seed) = &args.storage {
        storage
            .load_yaml(fs.as_ref(), seed)
            .with_context(|| format!("seeding shared store from {:?}", seed))?;
    }

    let runner = TokioProcessRunner::from_current(settings.target.clone())?;
    let (observer, mut events) = ChannelObserver::new();
    let mut context = HostContext::new(storage.clone(), Arc::new(runner), fs.clone())
        .with_settings(&settings)
        .with_observer(Arc::new(observer));
    if let Some(path) = &pre_script_path {
        let source = fs
            .read_to_string(path)
            .with_context(|| format!("reading pre-script {:?}", path))?;
        context = context.with_pre_script(source);
    }

    // Progress reporter: ends once the job (and with it the sender) is gone.
    let reporter = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                JobEvent::Progress { job, value } => info!(job = %job, progress = value, "job progress"),
                JobEvent::StageEntered { job, stage } => debug!(job = %job, %stage, "job stage"),
            }
        }
    });

    let mut job = ScriptJob::new(descriptor, context);
    let (job, outcome) = tokio::task::spawn_blocking(move || {
        let outcome = job.exec();
        (job, outcome)
    })
    .await
    .context("job thread panicked")?;
    let result = outcome?;

    info!(status = %job.pretty_status_message(), result = %result, "job done");
    drop(job);
    if let Err(e) = reporter.await {
        warn!(error = %e, "progress reporter task failed");
    }

    if let Some(path) = &args.dump_storage {
        storage
            .save_json(fs.as_ref(), path)
            .with_context(|| format!("writing shared store to {:?}", path))?;
    }

    Ok(result)
}

/// Explicit settings file, else `scriptjob.toml` if present, else defaults.
fn load_settings(path: Option<&Path>) -> Result<Settings> {
    if let Some(path) = path {
        return load_and_validate(path).with_context(|| format!("loading settings {:?}", path));
    }
    let default_path = default_settings_path();
    if default_path.is_file() {
        return load_and_validate(&default_path)
            .with_context(|| format!("loading settings {:?}", default_path));
    }
    debug!("no settings file; using defaults");
    Ok(Settings::default())
}

/// Simple dry-run output: print the job and the settings it would use.
fn print_dry_run(settings: &Settings, descriptor: &JobDescriptor, pre_script: Option<&Path>) {
    println!("scriptjob dry-run");
    println!("  working_dir = {}", descriptor.working_path.display());
    println!("  script = {}", descriptor.script_path().display());
    if let Some(pre_script) = pre_script {
        println!("  pre_script = {}", pre_script.display());
    }
    println!("  target.root = {}", settings.target.root.display());
    if let Some(limit) = settings.job.memory_limit {
        println!("  memory_limit = {limit} bytes");
    }
    println!(
        "  branding = {} {} ({})",
        settings.branding.application_name,
        settings.branding.version,
        settings.branding.organization_name
    );
    println!();

    println!("configuration ({} keys):", descriptor.configuration.len());
    for (key, value) in descriptor.configuration.iter() {
        println!("  - {key} = {value}");
    }

    debug!("dry-run complete (no execution)");
}
