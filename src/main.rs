#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::io::prelude::*;

use anyhow::{Context, Result};
use env_logger::Builder;
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;

mod cli;

fn color_level(level: Level) -> String {
    match level {
        Level::Error => level.red().to_string(),
        Level::Warn => level.yellow().to_string(),
        Level::Info => level.green().to_string(),
        Level::Debug => level.blue().to_string(),
        Level::Trace => level.purple().to_string(),
    }
}

const fn level_filter(verbose: bool) -> LevelFilter {
    if verbose { LevelFilter::Trace } else { LevelFilter::Info }
}

fn main() -> Result<()> {
    let args: cli::Args = argp::parse_args_or_exit(argp::DEFAULT);

    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} {}",
                picoboot_core::time::current_time(),
                color_level(record.level()),
                record.args()
            )
        })
        .filter(None, level_filter(args.verbose))
        .init();

    log::info!("reading base firmware image from {}", args.base);
    let base = std::fs::read(&args.base)
        .with_context(|| format!("failed to read base firmware image {}", args.base))?;

    log::info!("reading DOL executable from {}", args.dol);
    let dol =
        std::fs::read(&args.dol).with_context(|| format!("failed to read DOL {}", args.dol))?;

    let output = picoboot_fw::build(&base, &dol, args.family.0)?;

    log::info!("writing merged image to {}", args.output);
    std::fs::write(&args.output, output)
        .with_context(|| format!("failed to write output image {}", args.output))?;

    Ok(())
}
