mod audio;
mod output;
mod progress;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use spectro_core::listener::{DebugListener, NoOpListener};
use spectro_core::{
    compute_spectrogram, EdgePolicy, HeatPalette, SpectrogramConfig, DEFAULT_NUM_CHUNKS,
    DEFAULT_NUM_LEVELS,
};

use crate::progress::CliListener;

#[derive(Parser)]
#[command(name = "spectro", about = "Render a spectrogram image from a FLAC file")]
struct Cli {
    /// Input audio file (FLAC or WAV, any channel count)
    input: PathBuf,

    /// Output image. `.ppm` writes a plain-text pixmap, `.png` a PNG.
    #[arg(short, long, default_value = "output.ppm")]
    output: PathBuf,

    /// Number of analysis windows (image width)
    #[arg(short, long, default_value_t = DEFAULT_NUM_CHUNKS)]
    chunks: usize,

    /// Number of frequency bands (image height)
    #[arg(short, long, default_value_t = DEFAULT_NUM_LEVELS)]
    levels: usize,

    /// How bands resolve bins past either end of the spectrum: wrap, clamp or skip
    #[arg(long, default_value_t = EdgePolicy::Wrap)]
    edge_policy: EdgePolicy,

    /// Log every window instead of drawing a progress bar
    #[arg(long)]
    debug: bool,

    /// No progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Logging; RUST_LOG wins over the flag
    let default_filter = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    // 2. Configuration is checked before any decoding work
    let config = SpectrogramConfig::new(cli.chunks, cli.levels).with_edge_policy(cli.edge_policy);
    config.validate()?;

    // 3. Decode
    log::info!("Reading {}", cli.input.display());
    let stream = audio::read_pcm(&cli.input)?;
    log::info!(
        "  {} frames, {:.1}s, {} Hz, {} channel(s)",
        stream.frames(),
        stream.duration_seconds(),
        stream.sample_rate(),
        stream.channels(),
    );

    // 4. Analyze
    let spectrogram = if cli.debug {
        compute_spectrogram(&stream, &config, &mut DebugListener)?
    } else if cli.quiet {
        compute_spectrogram(&stream, &config, &mut NoOpListener)?
    } else {
        compute_spectrogram(&stream, &config, &mut CliListener::new())?
    };

    // 5. Diagnostics
    let d = &spectrogram.diagnostics;
    log::info!(
        "Frequency resolution: {:.3} Hz per bin, {:.3} Hz per band",
        d.bin_hz(),
        d.band_hz()
    );
    log::info!(
        "Chunk size: {} samples (transform length {})",
        d.layout.chunk_size,
        d.layout.transform_len
    );
    if d.layout.dropped_samples > 0 {
        log::info!("Trailing samples not analyzed: {}", d.layout.dropped_samples);
    }
    log::info!(
        "Samples: raw [{}, {}], normalized [{:.6}, {:.6}]",
        d.samples.min_raw,
        d.samples.max_raw,
        d.samples.min_normalized,
        d.samples.max_normalized
    );
    log::info!(
        "Blocks: {}, levels: {} (level size {})",
        d.layout.num_chunks,
        d.layout.num_levels,
        d.layout.level_size
    );
    log::debug!("Peak band magnitude: {}", spectrogram.grid.max());

    // 6. Render and write
    let image = spectrogram.render(&HeatPalette);
    output::write_image(&cli.output, &image)
        .with_context(|| format!("Failed to save spectrogram to {}", cli.output.display()))?;
    log::info!(
        "Wrote {} ({}x{})",
        cli.output.display(),
        image.width(),
        image.height()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["spectro", "song.flac"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("song.flac"));
        assert_eq!(cli.output, PathBuf::from("output.ppm"));
        assert_eq!(cli.chunks, 1400);
        assert_eq!(cli.levels, 800);
        assert_eq!(cli.edge_policy, EdgePolicy::Wrap);
        assert!(!cli.debug);
        assert!(!cli.quiet);
    }

    #[test]
    fn all_flags() {
        let cli = Cli::try_parse_from([
            "spectro",
            "in.flac",
            "-o",
            "out.png",
            "-c",
            "64",
            "-l",
            "32",
            "--edge-policy",
            "Clamp",
            "--debug",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.output, PathBuf::from("out.png"));
        assert_eq!(cli.chunks, 64);
        assert_eq!(cli.levels, 32);
        assert_eq!(cli.edge_policy, EdgePolicy::Clamp);
        assert!(cli.debug);
        assert!(cli.quiet);
    }

    #[test]
    fn rejects_unknown_edge_policy() {
        assert!(Cli::try_parse_from(["spectro", "in.flac", "--edge-policy", "mirror"]).is_err());
    }

    #[test]
    fn requires_input() {
        assert!(Cli::try_parse_from(["spectro"]).is_err());
    }
}
