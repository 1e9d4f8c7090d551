//! Audio and terminal setup

use std::{fs::File, sync::Mutex};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{PushError, RingBuffer};
use tracing_subscriber::{filter::LevelFilter, util::SubscriberInitExt};

use chordbox::{engine, ControllerConfig, EngineConfig};

use crate::ui::{state::VoiceSnapshot, UiApp, VIS_BUFFER_SIZE};

/// Frames rendered per inner loop of the audio callback.
const RENDER_BLOCK: usize = 256;
/// Capacity in blocks for the audio -> UI scope ring.
const SCOPE_RING_BLOCKS: usize = 8;
const LOG_FILE: &str = "chordbox.log";

/// Route `log` records to a file; the terminal belongs to the UI.
pub fn init_logging() -> EyreResult<()> {
    let file = File::create(LOG_FILE).wrap_err_with(|| format!("failed to create {LOG_FILE}"))?;

    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .finish()
        .try_init()
        .map_err(|err| eyre!("failed to install log subscriber: {err}"))
}

pub fn run() -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;
    log::info!("output device: {sample_rate} Hz, {channels} channels");

    let engine_config = EngineConfig::default().with_sample_rate(sample_rate);
    let controller_config = ControllerConfig::default();
    let (controller, mut audio) = engine::build(&engine_config, &controller_config)?;

    // --- Cross-thread rings back to the UI ---
    let (mut scope_tx, scope_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * SCOPE_RING_BLOCKS);
    let (mut voice_tx, voice_rx) = RingBuffer::<VoiceSnapshot>::new(16);

    let mut render_buf = [0.0f32; RENDER_BLOCK];

    // The engine moves into the callback; nothing is shared. The callback
    // never logs, its counters ride back with the voice snapshots.
    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;
                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(RENDER_BLOCK);
                    let block = &mut render_buf[..frames_to_render];
                    audio.render_f32(block);

                    // Duplicate mono to all channels
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    for &s in block.iter() {
                        if let Err(PushError::Full(_)) = scope_tx.push(s) {
                            break;
                        }
                    }

                    frames_written += frames_to_render;
                }

                let _ = voice_tx.push(VoiceSnapshot::capture(audio.voices(), audio.stats()));
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;

    let mut terminal = ratatui::init();
    let mut app = UiApp::new(controller, scope_rx, voice_rx, sample_rate);
    let res = app.run(&mut terminal);
    ratatui::restore();

    drop(stream);
    res
}
