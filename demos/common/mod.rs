//! Common utilities for the audio demos.

pub mod bowed;

use anyhow::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, StreamConfig};
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::io::stdout;
use std::panic;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Audio state that renders stereo blocks.
/// Types implementing this trait can be played by [`run_interactive_demo`].
pub trait StereoAudioState: Send + 'static {
    fn render(&mut self, left: &mut [f32], right: &mut [f32]);
}

/// Key handling result that controls the event loop
pub enum KeyAction {
    /// Continue the event loop
    Continue,
    /// Exit the event loop
    Exit,
}

/// Runs an interactive stereo demo with terminal UI.
///
/// This function handles the boilerplate:
/// - Audio device setup and stream creation
/// - Terminal raw mode and alternate screen
/// - Panic hook for terminal cleanup
///
/// # Arguments
///
/// * `make_state` - Builds the audio state for the device's sample rate and buffer size
/// * `initial_ui` - Closure to draw the initial UI
/// * `key_handler` - Closure that handles key presses and returns whether to continue or exit
pub fn run_interactive_demo<S, M, F, K>(make_state: M, initial_ui: F, key_handler: K) -> Result<()>
where
    S: StereoAudioState,
    M: FnOnce(f64, usize) -> Result<S>,
    F: FnOnce(&Arc<Mutex<S>>) -> Result<()>,
    K: Fn(&Arc<Mutex<S>>, &KeyEvent) -> Result<KeyAction>,
{
    // Setup audio
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("No output device available"))?;

    let config = device.default_output_config()?;
    let sample_rate = config.sample_rate().0 as f64;
    let block_size = match config.buffer_size() {
        cpal::SupportedBufferSize::Range { max, .. } => (*max as usize).min(4096),
        cpal::SupportedBufferSize::Unknown => 1024,
    };
    let state = Arc::new(Mutex::new(make_state(sample_rate, block_size)?));
    log::info!("output device at {} Hz", sample_rate);

    // Start audio stream
    let _stream = match config.sample_format() {
        SampleFormat::F32 => {
            create_audio_stream::<f32, S>(&device, &config.into(), state.clone(), block_size)?
        }
        SampleFormat::I16 => {
            create_audio_stream::<i16, S>(&device, &config.into(), state.clone(), block_size)?
        }
        SampleFormat::U16 => {
            create_audio_stream::<u16, S>(&device, &config.into(), state.clone(), block_size)?
        }
        sample_format => {
            return Err(anyhow::anyhow!(
                "Unsupported sample format: {}",
                sample_format
            ));
        }
    };

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(crossterm::cursor::Hide)?;

    // Set up panic hook to restore terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        cleanup_terminal();
        original_hook(panic_info);
    }));

    initial_ui(&state)?;

    loop {
        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key_event) = event::read()?
            && key_event.kind == KeyEventKind::Press
        {
            match key_handler(&state, &key_event)? {
                KeyAction::Continue => {}
                KeyAction::Exit => break,
            }
        }
    }

    cleanup_terminal();

    Ok(())
}

/// Creates an audio stream that pulls stereo blocks from the audio state.
fn create_audio_stream<T, S>(
    device: &cpal::Device,
    config: &StreamConfig,
    state: Arc<Mutex<S>>,
    block_size: usize,
) -> Result<cpal::Stream>
where
    T: Sample + FromSample<f32> + cpal::SizedSample,
    S: StereoAudioState,
{
    let channels = config.channels as usize;
    let mut left = vec![0.0f32; block_size];
    let mut right = vec![0.0f32; block_size];

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let Ok(mut state) = state.lock() else {
                return;
            };
            for chunk in data.chunks_mut(block_size * channels) {
                let frames = chunk.len() / channels;
                let (l, r) = (&mut left[..frames], &mut right[..frames]);
                state.render(l, r);
                for (frame, (l, r)) in chunk.chunks_mut(channels).zip(l.iter().zip(r.iter())) {
                    for (ch, s) in frame.iter_mut().enumerate() {
                        let value = if ch % 2 == 0 { *l } else { *r };
                        *s = T::from_sample(value);
                    }
                }
            }
        },
        |err| eprintln!("Audio stream error: {}", err),
        None,
    )?;

    stream.play()?;
    Ok(stream)
}

/// Cleans up terminal state (cursor, alternate screen, raw mode).
fn cleanup_terminal() {
    let _ = stdout().execute(crossterm::cursor::Show);
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Helper to check if a key code is a quit key (Q, ESC).
pub fn is_quit_key(code: KeyCode) -> bool {
    matches!(code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
}
