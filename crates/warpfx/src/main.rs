mod cli;
mod export;
mod paths;
mod run;

use std::path::Path;

use anyhow::Result;
use cli::{Command, ExportArgs, ValidateArgs};
use paths::AppPaths;
use run::ConfigOrigin;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    let explicit = cli.config.as_deref();
    match cli.command {
        Some(Command::Validate(args)) => run_validate(explicit, args),
        Some(Command::Export(args)) => run_export(explicit, &args),
        Some(Command::Paths) => run_paths(),
        None => run::run(explicit, cli.run),
    }
}

fn run_validate(explicit: Option<&Path>, args: ValidateArgs) -> Result<()> {
    let (config, origin) = match args.path.as_deref().or(explicit) {
        Some(path) => (run::read_config(path)?, ConfigOrigin::File(path.to_path_buf())),
        None => run::resolve_config(None)?,
    };

    println!("Configuration OK: {origin}");
    println!(
        "Window: {}x{} vsync={} step_hz={}",
        config.window.width, config.window.height, config.window.vsync, config.simulation.step_hz
    );
    println!("Panels:");
    for (index, panel) in config.panels.iter().enumerate() {
        println!(
            "  {index:<3} {:<7} seed={:<4} {}",
            panel.effect.as_str(),
            config.panel_seed(index),
            panel.image
        );
    }
    Ok(())
}

fn run_export(explicit: Option<&Path>, args: &ExportArgs) -> Result<()> {
    let (config, origin) = run::resolve_config(explicit)?;
    tracing::debug!(config = %origin, "export tuning");
    export::export(args, &config.tuning, &run::fetch_options(&config))?;
    println!("Wrote {}", args.out.display());
    Ok(())
}

fn run_paths() -> Result<()> {
    let paths = AppPaths::discover()?;
    let file = paths.config_file();
    println!("Config directory: {}", paths.config_dir().display());
    println!(
        "Config file:      {} ({})",
        file.display(),
        if file.is_file() { "present" } else { "missing" }
    );
    Ok(())
}
