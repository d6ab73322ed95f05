//! Quarter-hour chime decisions.
//!
//! Pure functions over `(hour, minute)`: whether a minute strikes and how
//! many times. Nothing here touches the clock or the audio device.

use chrono::Timelike;

use crate::ChimeError;

/// Minutes of the hour on which the clock strikes.
pub const QUARTER_HOURS: [u8; 4] = [0, 15, 30, 45];

/// A wall-clock sample with minute granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTick {
    hour: u8,
    minute: u8,
}

impl ClockTick {
    /// Creates a tick, rejecting hours outside 0–23 and minutes outside 0–59.
    pub fn new(hour: u8, minute: u8) -> Result<Self, ChimeError> {
        if hour > 23 || minute > 59 {
            return Err(ChimeError::InvalidTime { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    /// Samples hour and minute from any chrono time value.
    pub fn from_time<T: Timelike>(time: &T) -> Self {
        // chrono guarantees hour < 24 and minute < 60.
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns `true` on 0, 15, 30 and 45 past the hour.
    pub fn is_quarter_hour(&self) -> bool {
        QUARTER_HOURS.contains(&self.minute)
    }
}

impl std::fmt::Display for ClockTick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A decision to strike the bell `count` times in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChimeEvent {
    pub tick: ClockTick,
    pub count: u8,
}

/// Number of strikes for a quarter-hour minute.
///
/// On the hour the clock strikes the 12-hour count (midnight and noon strike
/// twelve); every other quarter strikes once. Callers only pass minutes from
/// [`QUARTER_HOURS`].
pub fn chime_count(hour: u8, minute: u8) -> u8 {
    if minute == 0 {
        match hour % 12 {
            0 => 12,
            h => h,
        }
    } else {
        1
    }
}

/// Decides whether `tick` strikes, and how many times.
pub fn evaluate(tick: ClockTick) -> Option<ChimeEvent> {
    if !tick.is_quarter_hour() {
        return None;
    }
    Some(ChimeEvent {
        tick,
        count: chime_count(tick.hour, tick.minute),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(h: u8, m: u8) -> ClockTick {
        ClockTick::new(h, m).unwrap()
    }

    fn count_at(h: u8, m: u8) -> Option<u8> {
        evaluate(tick(h, m)).map(|e| e.count)
    }

    #[test]
    fn hour_strikes_twelve_hour_count() {
        for h in 0..24u8 {
            let expected = if h % 12 == 0 { 12 } else { h % 12 };
            assert_eq!(count_at(h, 0), Some(expected), "hour {h}");
        }
    }

    #[test]
    fn midnight_and_noon_strike_twelve() {
        assert_eq!(count_at(0, 0), Some(12));
        assert_eq!(count_at(12, 0), Some(12));
        assert_eq!(count_at(13, 0), Some(1));
        assert_eq!(count_at(23, 0), Some(11));
    }

    #[test]
    fn quarters_strike_once() {
        for h in 0..24u8 {
            for m in [15, 30, 45] {
                assert_eq!(count_at(h, m), Some(1), "{h:02}:{m:02}");
            }
        }
    }

    #[test]
    fn other_minutes_are_silent() {
        for h in 0..24u8 {
            let silent = (0..60u8).filter(|m| count_at(h, *m).is_none()).count();
            assert_eq!(silent, 56);
        }
        assert_eq!(count_at(9, 7), None);
        assert_eq!(count_at(9, 59), None);
    }

    #[test]
    fn eligible_minutes_never_strike_zero() {
        for h in 0..24u8 {
            for m in QUARTER_HOURS {
                assert!(count_at(h, m).unwrap() >= 1);
            }
        }
    }

    #[test]
    fn scenarios() {
        assert_eq!(count_at(0, 0), Some(12));
        assert_eq!(count_at(9, 0), Some(9));
        assert_eq!(count_at(9, 15), Some(1));
        assert_eq!(count_at(12, 30), Some(1));
        assert_eq!(count_at(12, 0), Some(12));
        assert_eq!(count_at(23, 45), Some(1));
        assert_eq!(count_at(9, 7), None);
    }

    #[test]
    fn evaluation_is_repeatable() {
        let t = tick(17, 0);
        assert_eq!(evaluate(t), evaluate(t));
        assert_eq!(evaluate(t).unwrap().tick, t);
    }

    #[test]
    fn invalid_ticks_rejected() {
        assert!(ClockTick::new(24, 0).is_err());
        assert!(ClockTick::new(0, 60).is_err());
        assert!(ClockTick::new(23, 59).is_ok());
    }

    #[test]
    fn from_chrono_time() {
        let time = chrono::NaiveTime::from_hms_opt(21, 45, 12).unwrap();
        let t = ClockTick::from_time(&time);
        assert_eq!((t.hour(), t.minute()), (21, 45));
        assert_eq!(t.to_string(), "21:45");
    }
}
