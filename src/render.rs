//! Offline rendering of WAV files through the engine.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::core::{EngineConfig, Error, Result};
use crate::engine::AbyssEngine;
use crate::params::ParameterSet;

/// Summary of a finished render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    /// Frames read from the input file
    pub input_frames: usize,
    /// Frames written, input plus tail
    pub output_frames: usize,
    /// Largest absolute sample written
    pub peak: f32,
}

/// Runs `input` through a fresh engine and writes a 32-bit float stereo file.
///
/// Mono inputs are fed to both channels. The engine runs at the file's own
/// sample rate (the one in `config` is replaced) and the output is extended by
/// the engine's tail length so the reverb can ring out.
///
/// # Arguments
///
/// * `input` - Mono or stereo WAV file, integer or float
/// * `output` - Destination path, overwritten if present
/// * `params` - Parameter values held for the whole render
/// * `config` - Block size to process with
pub fn render_wav(
    input: &Path,
    output: &Path,
    params: &ParameterSet,
    config: EngineConfig,
) -> Result<RenderStats> {
    let mut reader = WavReader::open(input)?;
    let spec = reader.spec();
    let channels = spec.channels;
    if channels != 1 && channels != 2 {
        return Err(Error::UnsupportedChannelCount(channels));
    }

    let samples = read_samples(&mut reader)?;
    let config = config.with_sample_rate(spec.sample_rate as f64);
    let mut engine = AbyssEngine::new(config)?;

    let input_frames = samples.len() / channels as usize;
    let tail_frames = (engine.tail_length_seconds() * config.sample_rate) as usize;
    let output_frames = input_frames + tail_frames;

    log::info!(
        "rendering {} ({} ch, {} Hz, {} frames) to {}",
        input.display(),
        channels,
        spec.sample_rate,
        input_frames,
        output.display()
    );

    let mut left = vec![0.0f32; output_frames];
    let mut right = vec![0.0f32; output_frames];
    for (frame, chunk) in samples.chunks_exact(channels as usize).enumerate() {
        left[frame] = chunk[0];
        right[frame] = chunk[chunk.len() - 1];
    }

    let raw = params.to_array();
    for (l, r) in left
        .chunks_mut(config.max_block_size)
        .zip(right.chunks_mut(config.max_block_size))
    {
        engine.process_block(l, r, &raw)?;
    }

    let out_spec = WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(output, out_spec)?;
    let mut peak = 0.0f32;
    for (l, r) in left.iter().zip(&right) {
        peak = peak.max(l.abs()).max(r.abs());
        writer.write_sample(*l)?;
        writer.write_sample(*r)?;
    }
    writer.finalize()?;

    log::info!("wrote {} frames, peak {:.3}", output_frames, peak);

    Ok(RenderStats {
        input_frames,
        output_frames,
        peak,
    })
}

fn read_samples<R: std::io::Read>(reader: &mut WavReader<R>) -> Result<Vec<f32>> {
    let spec = reader.spec();
    let samples = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };
    Ok(samples)
}
