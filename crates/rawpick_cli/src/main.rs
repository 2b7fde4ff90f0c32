use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::sync::atomic::Ordering;

use anyhow::Context;
use clap::Parser;
use rawpick_fs::{
    EnumPickOutcome, ReportPick, SpecPickItem, parse_requested_names, spawn_pick_copy,
};

mod cli;

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    rawpick_log::init_logger(&cli.log_options());

    let names = collect_names(&cli)?;
    log::info!("Source folder: {}", cli.source.display());
    log::info!("Destination folder: {}", cli.destination.display());

    let handle = spawn_pick_copy(
        names,
        cli.source.clone(),
        cli.destination.clone(),
        cli.pick_options(),
    )?;
    let flag_cancel = handle.cancel_flag();
    if let Err(e) = ctrlc::set_handler(move || {
        flag_cancel.store(true, Ordering::Relaxed);
        log::info!("Cancellation requested (Ctrl+C).");
    }) {
        log::warn!("Ctrl+C handler unavailable ({e}); cancellation disabled.");
    }

    let report = handle
        .wait(print_item)
        .context("copy aborted")?;
    print_summary(&report);

    if report.errors.is_empty() && !report.if_cancelled {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn collect_names(cli: &cli::Cli) -> anyhow::Result<Vec<String>> {
    let mut names: Vec<String> = cli
        .names
        .iter()
        .flat_map(|arg| parse_requested_names(arg))
        .collect();

    let txt = match cli.from_file.as_deref() {
        Some(path) if path == Path::new("-") => Some(read_stdin()?),
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read names from {}", path.display()))?,
        ),
        None if names.is_empty() => Some(read_stdin()?),
        None => None,
    };
    if let Some(txt) = txt {
        names.extend(parse_requested_names(&txt));
    }
    Ok(names)
}

fn read_stdin() -> anyhow::Result<String> {
    let mut txt = String::new();
    std::io::stdin()
        .read_to_string(&mut txt)
        .context("failed to read names from stdin")?;
    Ok(txt)
}

fn print_item(item: &SpecPickItem) {
    match &item.outcome {
        EnumPickOutcome::Copied(path_file_dst) => {
            let name = path_file_dst
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| item.name.clone());
            println!("Copied: {name}");
        }
        EnumPickOutcome::Skipped(reason) => println!("Skipped {}: {reason}", item.name),
        EnumPickOutcome::CopyError(reason) => println!("Error copying {}: {reason}", item.name),
        EnumPickOutcome::NotFound => println!("Not found: {}", item.name),
    }
}

fn print_summary(report: &ReportPick) {
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    if report.cnt_copied > 0 {
        println!("{} file(s) copied successfully.", report.cnt_copied);
    }
    if !report.not_found.is_empty() {
        println!("Could not find the following files:");
        for name in &report.not_found {
            println!("  {name}");
        }
    }
    println!("{report}");
}
