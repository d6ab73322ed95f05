//! Audio output.
//!
//! [`PlaybackSink`] is the seam between chime scheduling and the sound
//! device. [`OutputDevice`] owns the cpal stream, which is not `Send` on every
//! platform, so it stays on the thread that opened it while cloneable
//! [`RodioSink`] handles travel to the playback tasks. Strikes are summed by
//! a rodio mixer that the stream drains, so overlapping chimes just mix.

use std::sync::{Arc, Weak};
use std::time::Duration;

use rodio::cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rodio::cpal::{
    self, BufferSize, FromSample, SampleFormat, SizedSample, StreamConfig, SupportedBufferSize,
    SupportedStreamConfig,
};
use rodio::Source;
use rodio::dynamic_mixer::{self, DynamicMixer, DynamicMixerController};

use crate::AudioError;
use crate::audio::{AudioBuffer, PlaybackCursor};

/// Accepts strikes for playback.
///
/// Implementations must accept concurrent submissions from independent
/// tasks without caller-side locking.
pub trait PlaybackSink: Send + Sync + 'static {
    /// Starts playing `cursor`; returns as soon as it is queued.
    fn play(&self, cursor: PlaybackCursor) -> Result<(), AudioError>;
}

/// The opened output stream. Dropping it closes every [`RodioSink`].
pub struct OutputDevice {
    _stream: cpal::Stream,
    mixer: Arc<DynamicMixerController<f32>>,
}

impl OutputDevice {
    /// Opens the default output device for `buffer`'s format with a device
    /// buffer holding `buffer_period` of audio.
    ///
    /// Prefers a device configuration matching the buffer's channel count
    /// and sample rate, falling back to the device default (the mixer
    /// resamples).
    pub fn open(buffer: &AudioBuffer, buffer_period: Duration) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let supported = match matching_config(&device, buffer) {
            Some(config) => config,
            None => {
                tracing::debug!(
                    rate = buffer.sample_rate(),
                    "no matching device config, using default"
                );
                device.default_output_config()?
            }
        };

        let frames = frames_in(supported.sample_rate().0, buffer_period);
        let config = StreamConfig {
            channels: supported.channels(),
            sample_rate: supported.sample_rate(),
            buffer_size: fixed_buffer_size(frames, supported.buffer_size()),
        };

        let (controller, mixer) = dynamic_mixer::mixer::<f32>(config.channels, config.sample_rate.0);
        let stream = match supported.sample_format() {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, mixer)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, mixer)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, mixer)?,
            other => return Err(AudioError::UnsupportedSampleFormat(format!("{other:?}"))),
        };
        stream.play()?;

        tracing::info!(
            device = %device.name().unwrap_or_else(|_| "unknown".into()),
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            buffer = ?config.buffer_size,
            "audio output opened"
        );

        Ok(Self {
            _stream: stream,
            mixer: controller,
        })
    }

    /// Returns a sink that plays through this device.
    pub fn sink(&self) -> RodioSink {
        RodioSink::new(&self.mixer)
    }
}

fn matching_config(device: &cpal::Device, buffer: &AudioBuffer) -> Option<SupportedStreamConfig> {
    let rate = buffer.sample_rate();
    let mut configs = device.supported_output_configs().ok()?;
    configs
        .find(|c| {
            c.channels() == buffer.channels()
                && c.min_sample_rate().0 <= rate
                && rate <= c.max_sample_rate().0
        })
        .map(|c| c.with_sample_rate(cpal::SampleRate(rate)))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut mixer: DynamicMixer<f32>,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample + FromSample<f32>,
{
    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for sample in data.iter_mut() {
                *sample = mixer.next().map(T::from_sample).unwrap_or(T::EQUILIBRIUM);
            }
        },
        |err| tracing::error!("audio output error: {err}"),
        None,
    )?;
    Ok(stream)
}

/// Frames of audio in `period` at `sample_rate`.
fn frames_in(sample_rate: u32, period: Duration) -> u32 {
    (sample_rate as u128 * period.as_millis() / 1000) as u32
}

/// Requests `frames` per device buffer, clamped to what the device reports.
fn fixed_buffer_size(frames: u32, supported: &SupportedBufferSize) -> BufferSize {
    match *supported {
        SupportedBufferSize::Range { min, max } => BufferSize::Fixed(frames.clamp(min, max)),
        SupportedBufferSize::Unknown => BufferSize::Fixed(frames),
    }
}

/// Sendable handle onto an [`OutputDevice`]'s mixer.
#[derive(Clone)]
pub struct RodioSink {
    mixer: Weak<DynamicMixerController<f32>>,
}

impl RodioSink {
    fn new(mixer: &Arc<DynamicMixerController<f32>>) -> Self {
        Self {
            mixer: Arc::downgrade(mixer),
        }
    }
}

impl PlaybackSink for RodioSink {
    fn play(&self, cursor: PlaybackCursor) -> Result<(), AudioError> {
        let mixer = self.mixer.upgrade().ok_or(AudioError::DeviceClosed)?;
        mixer.add(cursor.convert_samples::<f32>());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenth_of_a_second_in_frames() {
        assert_eq!(frames_in(44_100, Duration::from_millis(100)), 4410);
        assert_eq!(frames_in(48_000, Duration::from_millis(100)), 4800);
    }

    #[test]
    fn buffer_size_clamped_to_device_range() {
        let range = SupportedBufferSize::Range { min: 64, max: 4096 };
        assert_eq!(fixed_buffer_size(4410, &range), BufferSize::Fixed(4096));
        assert_eq!(fixed_buffer_size(800, &range), BufferSize::Fixed(800));
        assert_eq!(fixed_buffer_size(10, &range), BufferSize::Fixed(64));
        assert_eq!(
            fixed_buffer_size(4410, &SupportedBufferSize::Unknown),
            BufferSize::Fixed(4410)
        );
    }

    #[test]
    fn sink_feeds_mixer() {
        let (controller, mut mixer) = dynamic_mixer::mixer::<f32>(1, 8000);
        let sink = RodioSink::new(&controller);
        let buffer = AudioBuffer::new(1, 8000, vec![16_384; 4]).unwrap();

        sink.play(buffer.cursor()).unwrap();
        sink.play(buffer.cursor()).unwrap();

        // Both strikes are summed by the mixer.
        let peak = mixer.by_ref().take(4).fold(0.0f32, f32::max);
        assert!(peak > 0.9 && peak < 1.1, "got {peak}");
    }

    #[test]
    fn sink_fails_once_device_is_gone() {
        let (controller, mixer) = dynamic_mixer::mixer::<f32>(1, 8000);
        let sink = RodioSink::new(&controller);
        drop(mixer);
        drop(controller);

        let buffer = AudioBuffer::new(1, 8000, vec![0; 4]).unwrap();
        assert!(matches!(
            sink.play(buffer.cursor()),
            Err(AudioError::DeviceClosed)
        ));
    }
}
