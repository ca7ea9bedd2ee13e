//! Types for the encoder module.

use serde::{Deserialize, Serialize};

/// Result of a successful encode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeReport {
    /// Wall-clock encode duration in milliseconds.
    pub duration_ms: u64,
}

/// Progress update emitted while an encode runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeProgress {
    /// Fraction complete in 0.0..=1.0, 0.0 when the input duration is unknown.
    pub fraction: f32,
    /// Seconds of audio processed so far.
    pub time_secs: f64,
    /// Current processing speed (e.g., "1.5x").
    pub speed: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_serialization() {
        let progress = EncodeProgress {
            fraction: 0.5,
            time_secs: 90.0,
            speed: Some("12x".to_string()),
        };
        let json = serde_json::to_string(&progress).unwrap();
        let back: EncodeProgress = serde_json::from_str(&json).unwrap();
        assert_eq!(back.speed.as_deref(), Some("12x"));
        assert!((back.fraction - 0.5).abs() < f32::EPSILON);
    }
}
