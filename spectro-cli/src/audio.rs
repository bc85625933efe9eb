use anyhow::{bail, Context, Result};
use spectro_core::{PcmStream, SpectroError};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode an audio file into interleaved 32-bit PCM.
///
/// Supports FLAC and WAV (plus whatever else Symphonia's default registry
/// knows). Every source bit depth is scaled to full-scale `i32`, so a 16-bit
/// sample `s` comes back as `s << 16`.
pub fn read_pcm(path: &Path) -> Result<PcmStream<i32>> {
    let file = std::fs::File::open(path).map_err(|e| {
        SpectroError::InputUnavailable(format!("{}: {}", path.display(), e))
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .with_context(|| format!("Unsupported audio format: {}", path.display()))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .context("No audio track found")?
        .clone();

    let sample_rate = track
        .codec_params
        .sample_rate
        .context("Could not determine sample rate")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    // Some containers only reveal the channel layout once a packet decodes.
    let mut channels: Option<usize> = track.codec_params.channels.map(|c| c.count());
    let mut samples: Vec<i32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e).context("Error reading audio packet"),
        };

        if packet.track_id() != track.id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(msg)) => {
                log::warn!("skipping undecodable packet: {}", msg);
                continue;
            }
            Err(e) => return Err(e).context("Error decoding audio"),
        };

        let spec = *decoded.spec();
        let ch = spec.channels.count();
        match channels {
            None => channels = Some(ch),
            Some(known) if known != ch => {
                bail!("Channel count changed mid-stream ({} -> {})", known, ch)
            }
            Some(_) => {}
        }

        let mut sample_buf = SampleBuffer::<i32>::new(decoded.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(sample_buf.samples());
    }

    let channels = channels.context("Could not determine channel count")?;
    if samples.is_empty() {
        bail!("No audio samples decoded from: {}", path.display());
    }
    let channels = u16::try_from(channels)
        .with_context(|| format!("Unsupported channel count: {}", channels))?;

    let frames = samples.len() / channels as usize;
    samples.truncate(frames * channels as usize);

    log::debug!(
        "decoded {}: {} frames × {} ch at {} Hz",
        path.display(),
        frames,
        channels,
        sample_rate
    );

    Ok(PcmStream::new(samples, channels, frames, sample_rate)?)
}
