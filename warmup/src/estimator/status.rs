//! Loading status messages keyed to displayed progress.

use std::fmt;

/// Human-readable stage of a loading session, derived from displayed progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadingStatus {
    Preparing,
    LoadingCritical,
    LoadingImportant,
    LoadingRemaining,
    FinishingUp,
    Ready,
}

impl LoadingStatus {
    pub fn from_percent(percent: f64) -> Self {
        match percent {
            p if p.is_nan() || p < 10.0 => LoadingStatus::Preparing,
            p if p < 25.0 => LoadingStatus::LoadingCritical,
            p if p < 50.0 => LoadingStatus::LoadingImportant,
            p if p < 75.0 => LoadingStatus::LoadingRemaining,
            p if p < 100.0 => LoadingStatus::FinishingUp,
            _ => LoadingStatus::Ready,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            LoadingStatus::Preparing => "Preparing",
            LoadingStatus::LoadingCritical => "Loading critical assets",
            LoadingStatus::LoadingImportant => "Loading important assets",
            LoadingStatus::LoadingRemaining => "Loading remaining assets",
            LoadingStatus::FinishingUp => "Finishing up",
            LoadingStatus::Ready => "Ready",
        }
    }
}

impl fmt::Display for LoadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(LoadingStatus::from_percent(0.0), LoadingStatus::Preparing);
        assert_eq!(LoadingStatus::from_percent(9.9), LoadingStatus::Preparing);
        assert_eq!(LoadingStatus::from_percent(10.0), LoadingStatus::LoadingCritical);
        assert_eq!(LoadingStatus::from_percent(25.0), LoadingStatus::LoadingImportant);
        assert_eq!(LoadingStatus::from_percent(50.0), LoadingStatus::LoadingRemaining);
        assert_eq!(LoadingStatus::from_percent(75.0), LoadingStatus::FinishingUp);
        assert_eq!(LoadingStatus::from_percent(99.99), LoadingStatus::FinishingUp);
        assert_eq!(LoadingStatus::from_percent(100.0), LoadingStatus::Ready);
    }

    #[test]
    fn test_nan_is_preparing() {
        assert_eq!(LoadingStatus::from_percent(f64::NAN), LoadingStatus::Preparing);
    }

    #[test]
    fn test_display() {
        assert_eq!(LoadingStatus::FinishingUp.to_string(), "Finishing up");
    }
}
