//! oscbank - play a short chord progression through the default output device
//!
//! Run with: RUST_LOG=debug cargo run

use std::{f32::consts::TAU, thread, time::Duration};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info};

use oscbank::{oscillator_bank, BankConfig, BankController};

const TABLE_SIZE: usize = 512;
const VELOCITY: u8 = 90;

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    env_logger::init();

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(eyre!(
            "unsupported sample format {:?}, expected f32",
            config.sample_format()
        ));
    }

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    info!("output: {sample_rate} Hz, {channels} channels");

    let bank_config = BankConfig::default()
        .with_sample_rate(sample_rate)
        .with_polyphony(8)
        .with_attack(0.01)
        .with_release(0.4);
    let (mut controller, mut renderer) = oscillator_bank(bank_config)?;
    load_waveform(&mut controller)?;

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                renderer.render_interleaved(data, channels);
            },
            |err| error!("output stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;
    stream.play().wrap_err("failed to start output stream")?;

    // C major, A minor, F major, G major
    let progression: [&[u16]; 4] = [&[60, 64, 67], &[57, 60, 64], &[53, 57, 60], &[55, 59, 62]];

    for chord in progression {
        for &note in chord {
            controller.note_on(note, VELOCITY)?;
        }
        thread::sleep(Duration::from_millis(800));
        for &note in chord {
            controller.note_off(note)?;
        }
        thread::sleep(Duration::from_millis(200));
    }

    // A just-intoned fifth above A3, bypassing equal temperament.
    controller.note_on(57, VELOCITY)?;
    controller.note_on_with_frequency(64, VELOCITY, 220.0 * 1.5)?;
    thread::sleep(Duration::from_millis(1200));
    controller.release_all()?;
    thread::sleep(Duration::from_millis(600));

    controller.reset_all();
    Ok(())
}

/// A sine with a little third harmonic for some edge.
fn load_waveform(controller: &mut BankController) -> EyreResult<()> {
    controller.configure_waveform(TABLE_SIZE)?;
    for index in 0..TABLE_SIZE {
        let phase = index as f32 / TABLE_SIZE as f32;
        let value = 0.8 * (TAU * phase).sin() + 0.2 * (3.0 * TAU * phase).sin();
        controller.set_waveform_sample(value, index)?;
    }
    Ok(())
}
