//! Interactive playback of a synthetic bowed phrase through the effect.
//!
//! Up/Down pick a parameter, Left/Right move it, +/- change the input level,
//! Space toggles bypass (master mix 0), R clears the tails, Q quits.

mod common;

use abyssverb::{AbyssEngine, EngineConfig, PARAM_COUNT, ParamId, SharedParameters};
use anyhow::Result;
use common::bowed::BowedPhrase;
use common::{KeyAction, StereoAudioState, is_quit_key, run_interactive_demo};
use crossterm::event::KeyCode;
use std::cell::Cell;
use std::io::{Write, stdout};
use std::sync::Arc;

struct AbyssState {
    engine: AbyssEngine,
    source: BowedPhrase,
    shared: Arc<SharedParameters>,
}

impl StereoAudioState for AbyssState {
    fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let sample = self.source.next_sample();
            *l = sample;
            *r = sample;
        }
        if let Err(err) = self.engine.process_block_shared(left, right, &self.shared) {
            log::error!("processing failed: {err}");
        }
    }
}

fn draw_ui(shared: &SharedParameters, selected: usize, level: f32) -> Result<()> {
    let mut out = stdout();
    write!(out, "\x1b[2J\x1b[H")?;
    write!(out, "Abyssverb\r\n\r\n")?;
    for (i, id) in ParamId::ALL.iter().enumerate() {
        let marker = if i == selected { '>' } else { ' ' };
        write!(out, "{marker} {:<16} {:>8.3}\r\n", id.name(), shared.load(*id))?;
    }
    write!(out, "\r\n  input level      {level:>8.2}\r\n\r\n")?;
    write!(
        out,
        "Up/Down select  Left/Right adjust  +/- level  Space bypass  R clear  Q quit\r\n"
    )?;
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let shared = Arc::new(SharedParameters::default());
    let selected = Cell::new(0usize);
    let bypass_restore = Cell::new(None::<f32>);

    let audio_shared = Arc::clone(&shared);
    run_interactive_demo(
        move |sample_rate, block_size| {
            Ok(AbyssState {
                engine: AbyssEngine::new(EngineConfig::new(sample_rate, block_size))?,
                source: BowedPhrase::new(sample_rate),
                shared: audio_shared,
            })
        },
        |state| {
            let level = state.lock().map(|s| s.source.level()).unwrap_or(0.0);
            draw_ui(&shared, selected.get(), level)
        },
        |state, key_event| {
            if is_quit_key(key_event.code) {
                return Ok(KeyAction::Exit);
            }

            let id = ParamId::ALL[selected.get()];
            let range = id.range();
            let step = (range.end() - range.start()) * 0.05;
            match key_event.code {
                KeyCode::Up => selected.set((selected.get() + PARAM_COUNT - 1) % PARAM_COUNT),
                KeyCode::Down => selected.set((selected.get() + 1) % PARAM_COUNT),
                KeyCode::Left => shared.store(id, shared.load(id) - step),
                KeyCode::Right => shared.store(id, shared.load(id) + step),
                KeyCode::Char(' ') => match bypass_restore.take() {
                    Some(mix) => shared.store(ParamId::MasterMix, mix),
                    None => {
                        bypass_restore.set(Some(shared.load(ParamId::MasterMix)));
                        shared.store(ParamId::MasterMix, 0.0);
                    }
                },
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    if let Ok(mut state) = state.lock() {
                        state.engine.reset();
                    }
                }
                KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('-') => {
                    if let Ok(mut state) = state.lock() {
                        let delta = if key_event.code == KeyCode::Char('-') {
                            -0.05
                        } else {
                            0.05
                        };
                        let level = state.source.level() + delta;
                        state.source.set_level(level);
                    }
                }
                _ => {}
            }

            let level = state.lock().map(|s| s.source.level()).unwrap_or(0.0);
            draw_ui(&shared, selected.get(), level)?;
            Ok(KeyAction::Continue)
        },
    )
}
