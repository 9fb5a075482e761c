/// Reveal timer period at speed 1.0.
pub const BASE_PERIOD_MS: u32 = 50;
pub const MIN_PERIOD_MS: u32 = 10;

/// User-selected reading speed shared by skimming and read-aloud.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ReadingSpeed(f32);

impl ReadingSpeed {
    pub const MIN: f32 = 0.5;
    pub const MAX: f32 = 2.0;

    /// Out-of-range and non-finite values are clamped.
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(Self::MIN, Self::MAX))
        } else {
            Self::default()
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Speech synthesis rate.
    pub fn rate(self) -> f32 {
        self.0
    }

    /// Reveal timer period; faster speeds tick more often.
    pub fn period_ms(self) -> u32 {
        ((BASE_PERIOD_MS as f32 / self.0).round() as u32).max(MIN_PERIOD_MS)
    }
}

impl Default for ReadingSpeed {
    fn default() -> Self {
        Self(1.0)
    }
}
