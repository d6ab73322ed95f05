//! Quarter-hour chimes for the City Hall Clock.
//!
//! - [`schedule`] decides which minutes strike and how many times
//! - [`audio`] holds the decoded chime sound and per-strike cursors
//! - [`sink`] plays cursors on the output device
//! - [`scheduler`] runs the minute ticker and spawns chime tasks

pub mod audio;
pub mod schedule;
pub mod scheduler;
pub mod sink;

use std::path::PathBuf;

// Re-export primary types.
pub use audio::{AudioBuffer, PlaybackCursor};
pub use schedule::{ChimeEvent, ClockTick, QUARTER_HOURS, chime_count, evaluate};
pub use scheduler::{
    Clock, LocalClock, STRIKE_PAUSE, Scheduler, SchedulerConfig, TICK_SETTLE, play_chime,
};
pub use sink::{OutputDevice, PlaybackSink, RodioSink};

/// Errors loading or playing the chime sound.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot decode audio: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),

    #[error("audio contains no samples")]
    Empty,

    #[error("unsupported audio format: {channels} channels at {sample_rate} Hz")]
    InvalidFormat { channels: u16, sample_rate: u32 },

    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("cannot query audio output: {0}")]
    DeviceConfig(#[from] rodio::cpal::DefaultStreamConfigError),

    #[error("unsupported output sample format {0}")]
    UnsupportedSampleFormat(String),

    #[error("cannot open audio output: {0}")]
    BuildStream(#[from] rodio::cpal::BuildStreamError),

    #[error("cannot start audio output: {0}")]
    PlayStream(#[from] rodio::cpal::PlayStreamError),

    #[error("audio output closed")]
    DeviceClosed,
}

/// Errors from chime scheduling.
#[derive(Debug, thiserror::Error)]
pub enum ChimeError {
    #[error("invalid time {hour:02}:{minute:02}")]
    InvalidTime { hour: u8, minute: u8 },

    #[error("strike {strike} failed: {source}")]
    Playback { strike: u8, source: AudioError },
}
