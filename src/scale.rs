use serde::Serialize;

use crate::filter::TimeFilter;

/// Radius range for the all-day view.
pub const ALL_DAY_RANGE: (f64, f64) = (0.0, 25.0);
/// Radius range while the slider selects a window. Windowed totals are much
/// smaller, and the floor keeps idle stations visible.
pub const WINDOWED_RANGE: (f64, f64) = (3.0, 50.0);

/// Square-root scale from traffic to marker radius, so marker area grows
/// linearly with traffic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    domain_max: u32,
    range: (f64, f64),
}

impl RadiusScale {
    pub fn new(domain_max: u32, range: (f64, f64)) -> Self {
        Self { domain_max, range }
    }

    pub fn for_filter(domain_max: u32, filter: TimeFilter) -> Self {
        let range = match filter {
            TimeFilter::AnyTime => ALL_DAY_RANGE,
            TimeFilter::Around(_) => WINDOWED_RANGE,
        };
        Self::new(domain_max, range)
    }

    pub fn domain_max(&self) -> u32 {
        self.domain_max
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// An empty domain maps everything to the bottom of the range.
    pub fn radius(&self, traffic: u32) -> f64 {
        let (low, high) = self.range;
        if self.domain_max == 0 {
            return low;
        }

        let t = (traffic as f64).sqrt() / (self.domain_max as f64).sqrt();
        low + (high - low) * t
    }
}

/// Direction of a station's traffic, quantized for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "f64")]
pub enum FlowLevel {
    Arrivals,
    Balanced,
    Departures,
}

impl FlowLevel {
    /// Splits `[0, 1]` into three equal bands. Ratios outside the domain are
    /// clamped.
    pub fn from_ratio(ratio: f64) -> Self {
        let ratio = if ratio.is_nan() { 0.5 } else { ratio.clamp(0.0, 1.0) };
        match (ratio * 3.0).floor() as u8 {
            0 => Self::Arrivals,
            1 => Self::Balanced,
            _ => Self::Departures,
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Self::Arrivals => 0.0,
            Self::Balanced => 0.5,
            Self::Departures => 1.0,
        }
    }
}

impl From<FlowLevel> for f64 {
    fn from(level: FlowLevel) -> Self {
        level.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn all_day_scale_is_square_root_shaped() {
        let scale = RadiusScale::new(4, ALL_DAY_RANGE);
        assert_eq!(scale.radius(0), 0.0);
        assert_relative_eq!(scale.radius(4), 25.0);
        assert_relative_eq!(scale.radius(2), 17.677_669_529_663_69, epsilon = 1e-9);
        assert_relative_eq!(scale.radius(1), 12.5);
    }

    #[test]
    fn windowed_scale_keeps_a_floor() {
        let scale = RadiusScale::for_filter(100, TimeFilter::Around(570));
        assert_eq!(scale.range(), WINDOWED_RANGE);
        assert_eq!(scale.radius(0), 3.0);
        assert_relative_eq!(scale.radius(100), 50.0);
        assert_relative_eq!(scale.radius(25), 3.0 + 47.0 * 0.5);
    }

    #[test]
    fn empty_domain_returns_range_minimum() {
        for (filter, low) in [(TimeFilter::AnyTime, 0.0), (TimeFilter::Around(0), 3.0)] {
            let scale = RadiusScale::for_filter(0, filter);
            for traffic in [0, 1, 1000] {
                let radius = scale.radius(traffic);
                assert!(radius.is_finite());
                assert_eq!(radius, low);
            }
        }
    }

    #[test]
    fn flow_levels_split_ratio_in_thirds() {
        assert_eq!(FlowLevel::from_ratio(0.0), FlowLevel::Arrivals);
        assert_eq!(FlowLevel::from_ratio(0.33), FlowLevel::Arrivals);
        assert_eq!(FlowLevel::from_ratio(1.0 / 3.0), FlowLevel::Balanced);
        assert_eq!(FlowLevel::from_ratio(0.5), FlowLevel::Balanced);
        assert_eq!(FlowLevel::from_ratio(0.66), FlowLevel::Balanced);
        assert_eq!(FlowLevel::from_ratio(2.0 / 3.0), FlowLevel::Departures);
        assert_eq!(FlowLevel::from_ratio(1.0), FlowLevel::Departures);
    }

    #[test]
    fn flow_levels_clamp_out_of_domain_ratios() {
        assert_eq!(FlowLevel::from_ratio(-0.2), FlowLevel::Arrivals);
        assert_eq!(FlowLevel::from_ratio(7.0), FlowLevel::Departures);
        assert_eq!(FlowLevel::from_ratio(f64::NAN), FlowLevel::Balanced);
        assert_eq!(FlowLevel::Balanced.value(), 0.5);
        assert_eq!(serde_json::to_string(&FlowLevel::Departures).unwrap(), "1.0");
    }
}
