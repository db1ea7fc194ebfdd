//! LoopRoom - three-section DJ-style remixes from the command line
//!
//! ## Commands
//!
//! - `looproom remix <INPUT> -o <OUT>`: decode, remix, write WAV
//! - `looproom presets`: list built-in presets
//! - `looproom params`: print the resolved remix parameters as YAML
//!
//! Set `RUST_LOG=debug` for per-stage logging.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Command, ParamsArgs, RemixArgs};
use looproom_core::config::{default_config_path, load_config, RemixConfig};
use looproom_core::export::write_wav;
use looproom_core::{AudioSource, Preset, Remixer};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut config: RemixConfig = load_config(&config_path);
    config.validate();

    match cli.command {
        Command::Remix(args) => run_remix(args, config),
        Command::Presets => {
            list_presets();
            Ok(())
        }
        Command::Params(args) => print_params(args),
    }
}

fn run_remix(args: RemixArgs, mut config: RemixConfig) -> Result<()> {
    args.apply_to_config(&mut config);
    let request = args.build_request(&config)?;

    let mut remixer = Remixer::new(config);
    let waveform = remixer
        .remix(AudioSource::Path(args.input.clone()), &request)
        .with_context(|| format!("Failed to remix {:?}", args.input))?;

    if waveform.is_empty() {
        log::warn!("Remix produced no audio, writing an empty file");
    }

    write_wav(&args.output, &waveform, remixer.config().output_format)
        .with_context(|| format!("Failed to write {:?}", args.output))?;
    Ok(())
}

fn list_presets() {
    for preset in Preset::all() {
        let params = preset.params();
        println!(
            "{:<14} speed {:.2}  pitch {:+}",
            preset.name(),
            params.speed,
            params.pitch
        );
    }
}

fn print_params(args: ParamsArgs) -> Result<()> {
    let request = args.request.build_request()?;
    let yaml = serde_yaml::to_string(&request).context("Failed to serialize parameters")?;
    print!("{}", yaml);
    Ok(())
}
