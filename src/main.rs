// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;

use anyhow::{Context, Result};
use tracing::{info, Level};

use melodist::export::ExportTrack;
use melodist::music::ScaleType;
use melodist::SettingsFile;

fn print_usage() {
    println!("melodist - Procedural melody generator");
    println!();
    println!("Usage: melodist [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --generate <FILE> [--seed N]  Generate a melody and print it as YAML");
    println!("  --export <FILE> [--seed N]    Print the melody as timed MIDI notes");
    println!("  --init <FILE>                 Write a default settings file");
    println!("  --list-scales                 List available scale types");
    println!("  --verbose                     Log generation details to stderr");
    println!("  --help                        Show this help message");
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Value following `flag`, if present
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn load_settings(args: &[String], option: &str) -> Result<SettingsFile> {
    let Some(path) = args.get(2).filter(|a| !a.starts_with("--")) else {
        eprintln!("Error: {} requires a settings file", option);
        print_usage();
        std::process::exit(1);
    };

    let mut settings = SettingsFile::load(path)?;
    if let Some(seed) = flag_value(args, "--seed") {
        let seed: u64 = seed
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid seed: {}", seed))?;
        settings.melody.seed = Some(seed);
    }
    info!(
        path = %path,
        key = %settings.melody.key,
        scale = %settings.melody.scale,
        bars = settings.melody.bars,
        "Settings loaded"
    );
    Ok(settings)
}

fn generate(args: &[String]) -> Result<()> {
    let settings = load_settings(args, "--generate")?;
    let melody = settings.generate().context("Melody generation failed")?;
    info!(notes = melody.len(), "Melody generated");
    print!("{}", serde_yaml::to_string(&melody).context("Failed to serialize melody")?);
    Ok(())
}

fn export(args: &[String]) -> Result<()> {
    let settings = load_settings(args, "--export")?;
    let melody = settings.generate().context("Melody generation failed")?;
    let name = settings
        .scale()
        .map(|s| s.name().to_string())
        .unwrap_or_else(|| "melody".to_string());
    let track = ExportTrack::from_melody(name, &melody);
    info!(notes = track.notes.len(), end_tick = track.end_tick(), "Melody exported");
    print!("{}", serde_yaml::to_string(&track).context("Failed to serialize export")?);
    Ok(())
}

fn init(args: &[String]) -> Result<()> {
    let Some(path) = args.get(2) else {
        eprintln!("Error: --init requires a file path");
        std::process::exit(1);
    };
    SettingsFile::default().save(path)?;
    println!("Wrote default settings to {}", path);
    Ok(())
}

fn list_scales() {
    println!("Available scales:");
    for scale_type in ScaleType::ALL {
        println!("  {:<18} {:?}", scale_type.name(), scale_type.intervals());
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("melodist - Procedural melody generator");
        println!("Run with --help for usage information");
        return Ok(());
    }

    init_logging(args.iter().any(|a| a == "--verbose" || a == "-v"));

    match args[1].as_str() {
        "--generate" => generate(&args)?,
        "--export" => export(&args)?,
        "--init" => init(&args)?,
        "--list-scales" => list_scales(),
        "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
