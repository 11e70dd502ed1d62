use std::{fmt, str::FromStr};

use crate::{
    data::{Minute, MINUTES_PER_DAY},
    error::FilterError,
    window::Window,
};

const LAST_MINUTE: Minute = (MINUTES_PER_DAY - 1) as Minute;

/// Position of the time-of-day slider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimeFilter {
    /// Slider value -1: every trip counts.
    #[default]
    AnyTime,
    /// Only trips within the window centred on this minute count.
    Around(Minute),
}

impl TimeFilter {
    /// Slider values outside `[-1, 1439]` are clamped into range.
    pub fn from_slider(value: i32) -> Self {
        if value < 0 {
            Self::AnyTime
        } else {
            Self::Around(value.min(LAST_MINUTE as i32) as Minute)
        }
    }

    pub fn slider_value(self) -> i32 {
        match self {
            Self::AnyTime => -1,
            Self::Around(minute) => minute as i32,
        }
    }

    pub fn window(self) -> Option<Window> {
        match self {
            Self::AnyTime => None,
            Self::Around(minute) => Some(Window::around(minute)),
        }
    }

    pub fn is_windowed(self) -> bool {
        matches!(self, Self::Around(_))
    }

    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::AnyTime => write!(f, "any time"),
            Self::Around(minute) => {
                let (hour, minute) = (minute / 60, minute % 60);
                let suffix = if hour < 12 { "AM" } else { "PM" };
                let hour = match hour % 12 {
                    0 => 12,
                    h => h,
                };
                write!(f, "{hour}:{minute:02} {suffix}")
            }
        }
    }
}

impl FromStr for TimeFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("any") || s == "-1" {
            return Ok(Self::AnyTime);
        }

        let minute = match s.split_once(':') {
            Some((hour, minute)) => {
                let (hour, minute) = hour
                    .parse::<u32>()
                    .ok()
                    .zip(minute.parse::<u32>().ok())
                    .ok_or_else(|| FilterError::Unrecognized(s.to_owned()))?;
                if hour > 23 || minute > 59 {
                    return Err(FilterError::OutOfDay(s.to_owned()));
                }
                hour * 60 + minute
            }
            None => s
                .parse::<u32>()
                .map_err(|_| FilterError::Unrecognized(s.to_owned()))?,
        };

        if minute > LAST_MINUTE as u32 {
            return Err(FilterError::OutOfDay(s.to_owned()));
        }

        Ok(Self::Around(minute as Minute))
    }
}
