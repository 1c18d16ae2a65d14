use std::fmt;

/// Shutter duration in seconds. Always finite and strictly positive, so a
/// zero or negative exposure from a broken import never reaches formatting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureTime(f64);

impl ExposureTime {
    pub fn from_seconds(seconds: f64) -> Option<Self> {
        (seconds.is_finite() && seconds > 0.0).then_some(Self(seconds))
    }

    /// Accepts decimal seconds (`"0.25"`, `"2"`) as well as the fraction
    /// notation cameras and importers commonly store (`"1/60"`).
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let seconds = match text.split_once('/') {
            Some((num, denom)) => {
                let num: f64 = num.trim().parse().ok()?;
                let denom: f64 = denom.trim().parse().ok()?;
                num / denom
            }
            None => text.parse().ok()?,
        };
        Self::from_seconds(seconds)
    }

    pub fn seconds(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for ExposureTime {
    /// Sub-second exposures read `1/<reciprocal>`, longer ones `"<seconds>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 1.0 {
            // 0.0666667 must come out as 1/15, not 1/14.999993
            let reciprocal = (1.0 / self.0 * 1000.0).round() / 1000.0;
            write!(f, "1/{}", reciprocal)
        } else {
            // Leading quote only; kept as the forum has always shown it.
            write!(f, "\"{}", self.0)
        }
    }
}

/// Formats an exposure duration, or `None` when the value cannot be shown.
pub fn format_exposure_time(seconds: f64) -> Option<String> {
    ExposureTime::from_seconds(seconds).map(|time| time.to_string())
}
