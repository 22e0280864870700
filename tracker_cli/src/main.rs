#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod cli;
mod device;
mod error_fmt;
mod logging;
mod setting;
mod watch;

use clap::Parser;
use cli::{Cli, Commands, JSON_MODE, SettingAction};
use device::AnyDevice;
use error_fmt::{exit_code_for_error, format_error_json, humanize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracker_core::{Dashboard, DeviceSyncClient, RetryPolicy, SessionCfg, TrackerError};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    if let Err(e) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        tracing::error!(error = %e, "command failed");
        std::process::exit(exit_code_for_error(&e));
    }
}

fn run(cli: Cli) -> eyre::Result<()> {
    let cfg = tracker_config::load_file(&cli.config)
        .map_err(|e| TrackerError::Config(format!("{e}")))?;
    logging::init(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "configuration loaded");

    let device = AnyDevice::from_config(&cfg);
    let policy: RetryPolicy = (&cfg.retry).into();

    match cli.cmd {
        Commands::Watch { ticks, duration_ms } => {
            let shutdown = Arc::new(AtomicBool::new(false));
            {
                let flag = shutdown.clone();
                if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
                    tracing::warn!(error = %e, "could not install Ctrl-C handler");
                }
            }
            let stop = watch::StopAfter {
                ticks,
                duration: duration_ms.map(Duration::from_millis),
            };
            let outcome = watch::run_watch(&cfg, device, stop, shutdown)?;
            if cli.json {
                println!("{}", watch::outcome_json(&outcome)?);
            } else {
                watch::print_outcome(&outcome);
            }
        }
        Commands::Setting { action } => {
            let mut dash = Dashboard::new(&SessionCfg::from(&cfg));
            let mut client = DeviceSyncClient::new(device, policy);
            match action {
                SettingAction::Get => {
                    let config = setting::get(&mut dash, &mut client)?;
                    let wire = config.to_wire()?;
                    if cli.json {
                        println!("{wire}");
                    } else {
                        println!("{}", serde_json::to_string_pretty(&wire)?);
                    }
                }
                SettingAction::Set { file, mode } => {
                    let ack = match (file, mode) {
                        (Some(path), _) => setting::set_from_file(&mut dash, &mut client, &path)?,
                        (None, Some(mode)) => setting::set_mode(&mut dash, &mut client, &mode)?,
                        (None, None) => eyre::bail!("either --file or --mode is required"),
                    };
                    if cli.json {
                        println!("{}", serde_json::json!({ "ack": ack, "revision": dash.control().revision() }));
                    } else {
                        println!("Device acknowledged: {ack}");
                    }
                }
            }
        }
        Commands::Brightness { data } => {
            let mut client = DeviceSyncClient::new(device, policy);
            let resp = setting::brightness(&mut client, &data)?;
            println!("{resp}");
        }
        Commands::SelfCheck => {
            let backend = device.backend_name();
            let mut dash = Dashboard::new(&SessionCfg::from(&cfg));
            let mut client = DeviceSyncClient::new(device, policy);
            let report = dash.ingest(client.fetch_telemetry()?);
            let mode = dash.sync_config(&mut client)?.mode;
            let mode = mode.map_or("unset", |m| m.as_str());
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "status": "ok",
                        "backend": backend,
                        "acc": report.acc,
                        "angle": report.angle,
                        "realtime_keys": report.merged_keys.len(),
                        "mode": mode,
                    })
                );
            } else {
                println!(
                    "self-check ok: backend={backend} acc={} angle={} realtime_keys={} mode={mode}",
                    report.acc,
                    report.angle,
                    report.merged_keys.len()
                );
            }
        }
        Commands::Health => {
            let summary = serde_json::json!({
                "status": "ok",
                "backend": device.backend_name(),
                "base_url": cfg.device.base_url,
                "interval_ms": cfg.poll.interval_ms,
                "history": cfg.history.capacity,
                "retry_attempts": cfg.retry.max_attempts,
            });
            if cli.json {
                println!("{summary}");
            } else {
                println!(
                    "ok backend={} base_url={} interval_ms={} history={} retry_attempts={}",
                    device.backend_name(),
                    cfg.device.base_url,
                    cfg.poll.interval_ms,
                    cfg.history.capacity,
                    cfg.retry.max_attempts
                );
            }
        }
    }
    Ok(())
}
