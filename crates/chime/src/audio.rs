//! Decoded chime sound and playback cursors.
//!
//! The sound is decoded once into an [`AudioBuffer`] of interleaved `i16`
//! samples. The buffer is immutable and shares its samples through an `Arc`,
//! so every strike gets its own [`PlaybackCursor`] without copying.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, Source};

use crate::AudioError;

/// Immutable decoded sound, shared by every playback task.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    samples: Arc<[i16]>,
    channels: u16,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Wraps already-decoded interleaved samples.
    pub fn new(channels: u16, sample_rate: u32, samples: Vec<i16>) -> Result<Self, AudioError> {
        if channels == 0 || sample_rate == 0 {
            return Err(AudioError::InvalidFormat {
                channels,
                sample_rate,
            });
        }
        if samples.len() < channels as usize {
            return Err(AudioError::Empty);
        }
        Ok(Self {
            samples: samples.into(),
            channels,
            sample_rate,
        })
    }

    /// Opens and decodes a sound file (MP3, WAV, FLAC or Vorbis).
    pub fn open(path: &Path) -> Result<Self, AudioError> {
        let file = File::open(path).map_err(|source| AudioError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let buffer = Self::decode(BufReader::new(file))?;
        tracing::debug!(
            path = %path.display(),
            frames = buffer.frames(),
            duration_ms = buffer.duration().as_millis() as u64,
            sample_rate = buffer.sample_rate,
            channels = buffer.channels,
            "chime sound decoded"
        );
        Ok(buffer)
    }

    /// Decodes a complete stream into memory.
    pub fn decode<R>(reader: R) -> Result<Self, AudioError>
    where
        R: Read + Seek + Send + Sync + 'static,
    {
        let decoder = Decoder::new(reader)?;
        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<i16> = decoder.collect();
        Self::new(channels, sample_rate, samples)
    }

    /// Length in frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Natural playback time of the whole buffer: frames ÷ sample rate.
    pub fn duration(&self) -> Duration {
        frames_duration(self.frames(), self.sample_rate)
    }

    /// Creates a fresh read position at the start of the buffer.
    pub fn cursor(&self) -> PlaybackCursor {
        PlaybackCursor {
            samples: Arc::clone(&self.samples),
            position: 0,
            channels: self.channels,
            sample_rate: self.sample_rate,
        }
    }
}

fn frames_duration(frames: usize, sample_rate: u32) -> Duration {
    let nanos = frames as u128 * 1_000_000_000 / sample_rate as u128;
    Duration::from_nanos(nanos as u64)
}

/// One strike's read position over a shared [`AudioBuffer`].
#[derive(Debug, Clone)]
pub struct PlaybackCursor {
    samples: Arc<[i16]>,
    position: usize,
    channels: u16,
    sample_rate: u32,
}

impl PlaybackCursor {
    /// Time needed to play from the start to the end of the buffer.
    pub fn natural_duration(&self) -> Duration {
        frames_duration(self.samples.len() / self.channels as usize, self.sample_rate)
    }

    fn remaining(&self) -> usize {
        self.samples.len().saturating_sub(self.position)
    }
}

impl Iterator for PlaybackCursor {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        let sample = self.samples.get(self.position).copied()?;
        self.position += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl Source for PlaybackCursor {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.remaining())
    }

    fn channels(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.natural_duration())
    }
}
