//! Weather reading model.
//!
//! Both fields are optional and independent: a reading can carry a
//! temperature without an icon code or the other way round. An absent field
//! means "no data", never zero.

use core::fmt::Write;

use heapless::String;

/// Longest temperature label, e.g. "-12°C".
pub const LABEL_LENGTH: usize = 16;

/// Current conditions at the configured location.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeatherReading {
    /// Air temperature in degrees Celsius.
    pub degrees: Option<f64>,
    /// Symbolic condition code, e.g. `partly-cloudy-day`.
    pub icon: Option<std::string::String>,
}

impl WeatherReading {
    /// True when neither field carries data.
    #[inline]
    pub const fn is_empty(&self) -> bool { self.degrees.is_none() && self.icon.is_none() }

    /// Rounded temperature label, e.g. "12°C". `None` without a usable
    /// temperature.
    pub fn temperature_label(&self) -> Option<String<LABEL_LENGTH>> {
        let degrees = self.degrees?;
        if !degrees.is_finite() {
            return None;
        }
        // heapless::String avoids a heap allocation for a tiny label
        let mut label: String<LABEL_LENGTH> = String::new();
        let rounded = degrees.round();
        // Avoid printing "-0°C"
        let rounded = if rounded == 0.0 { 0.0 } else { rounded };
        // Readings too large for the label are dropped
        write!(label, "{rounded:.0}\u{b0}C").ok()?;
        Some(label)
    }
}
