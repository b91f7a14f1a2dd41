//! Renders a synthetic bowed phrase through the effect to `abyss_render.wav`.
//!
//! Parameters can be overridden on the command line by host id:
//!
//! ```text
//! cargo run --example render_abyss -- reverbDecay=20 vanishRate=0.6
//! ```

#[path = "common/bowed.rs"]
mod bowed;

use abyssverb::{AbyssEngine, EngineConfig, ParamId, ParameterSet};
use anyhow::{Context, Result, bail};
use bowed::BowedPhrase;
use hound::{SampleFormat, WavSpec, WavWriter};

const SAMPLE_RATE: u32 = 48000;
const BLOCK_SIZE: usize = 256;
const OUTPUT: &str = "abyss_render.wav";

fn parse_overrides(args: impl Iterator<Item = String>) -> Result<ParameterSet> {
    let mut params = ParameterSet::default();
    for arg in args {
        let (name, value) = arg
            .split_once('=')
            .with_context(|| format!("expected name=value, got '{arg}'"))?;
        let Some(id) = ParamId::from_name(name) else {
            bail!("unknown parameter '{name}'");
        };
        let value: f32 = value
            .parse()
            .with_context(|| format!("bad value for {name}: '{value}'"))?;
        params.set(id, value);
    }
    Ok(params.clamped())
}

fn main() -> Result<()> {
    env_logger::init();

    let params = parse_overrides(std::env::args().skip(1))?;
    let config = EngineConfig::new(SAMPLE_RATE as f64, BLOCK_SIZE);
    let mut engine = AbyssEngine::new(config)?;
    let mut source = BowedPhrase::new(config.sample_rate);

    let phrase_frames = (BowedPhrase::phrase_seconds() * SAMPLE_RATE as f32) as usize;
    let tail_frames = (engine.tail_length_seconds() * config.sample_rate) as usize;
    let total_frames = phrase_frames + tail_frames;

    let spec = WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(OUTPUT, spec)?;

    let raw = params.to_array();
    let mut left = vec![0.0f32; BLOCK_SIZE];
    let mut right = vec![0.0f32; BLOCK_SIZE];
    let mut written = 0;
    let mut peak = 0.0f32;
    while written < total_frames {
        let frames = BLOCK_SIZE.min(total_frames - written);
        let (l, r) = (&mut left[..frames], &mut right[..frames]);
        for (i, (l, r)) in l.iter_mut().zip(r.iter_mut()).enumerate() {
            let sample = if written + i < phrase_frames {
                source.next_sample()
            } else {
                0.0
            };
            *l = sample;
            *r = sample;
        }
        engine.process_block(l, r, &raw)?;
        for (l, r) in l.iter().zip(r.iter()) {
            peak = peak.max(l.abs()).max(r.abs());
            writer.write_sample(*l)?;
            writer.write_sample(*r)?;
        }
        written += frames;
    }
    writer.finalize()?;

    println!(
        "Wrote {} ({:.1} s, peak {:.3})",
        OUTPUT,
        total_frames as f32 / SAMPLE_RATE as f32,
        peak
    );
    Ok(())
}
