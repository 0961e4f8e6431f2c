//! Data-driven game balance
//!
//! Every number the simulation formulas depend on lives here so a host page
//! can override them with a JSON blob. Defaults match the shipped game.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Error type for tuning overrides
#[derive(Debug)]
pub enum TuningError {
    /// JSON did not deserialize
    Parse(serde_json::Error),
    /// A parameter is out of range
    Invalid(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(err) => write!(f, "Tuning parse error: {}", err),
            TuningError::Invalid(msg) => write!(f, "Invalid tuning: {}", msg),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(err) => Some(err),
            TuningError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        TuningError::Parse(err)
    }
}

/// Balance parameters for one game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Speed at the start of a run
    pub base_speed: f32,
    /// Speed cap
    pub max_speed: f32,
    /// Speed gained per simulated millisecond
    pub accel_per_ms: f32,
    /// Distance that ends the run as a win
    pub finish_distance: f32,
    /// Spawn cooldown before speed is taken into account (ms)
    pub spawn_interval_base: f32,
    /// Cooldown shaved off per unit of speed (ms)
    pub spawn_speed_factor: f32,
    /// Hard floor on the spawn cooldown (ms)
    pub min_spawn_interval: f32,
    pub max_lives: u8,
    /// Minimum spacing between two life losses (ms)
    pub hit_cooldown_ms: f64,
    /// Duration of the red flash after losing a life (ms)
    pub hurt_flash_ms: f32,
    pub checkpoint_bonus: f32,
    pub finish_bonus: f32,
    /// Particle cap; bursts past this are dropped
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            max_speed: MAX_SPEED,
            accel_per_ms: ACCEL_PER_MS,
            finish_distance: FINISH_DISTANCE,
            spawn_interval_base: SPAWN_INTERVAL_BASE,
            spawn_speed_factor: SPAWN_SPEED_FACTOR,
            min_spawn_interval: MIN_SPAWN_INTERVAL,
            max_lives: MAX_LIVES,
            hit_cooldown_ms: HIT_COOLDOWN_MS,
            hurt_flash_ms: HURT_FLASH_MS,
            checkpoint_bonus: CHECKPOINT_BONUS,
            finish_bonus: FINISH_BONUS,
            max_particles: MAX_PARTICLES,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject parameters the formulas can't work with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("base_speed", self.base_speed),
            ("max_speed", self.max_speed),
            ("finish_distance", self.finish_distance),
            ("spawn_interval_base", self.spawn_interval_base),
            ("min_spawn_interval", self.min_spawn_interval),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::Invalid(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("accel_per_ms", self.accel_per_ms),
            ("spawn_speed_factor", self.spawn_speed_factor),
            ("hurt_flash_ms", self.hurt_flash_ms),
            ("checkpoint_bonus", self.checkpoint_bonus),
            ("finish_bonus", self.finish_bonus),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Invalid(format!(
                    "{} must be non-negative and finite, got {}",
                    name, value
                )));
            }
        }

        if !self.hit_cooldown_ms.is_finite() || self.hit_cooldown_ms < 0.0 {
            return Err(TuningError::Invalid(format!(
                "hit_cooldown_ms must be non-negative and finite, got {}",
                self.hit_cooldown_ms
            )));
        }
        if self.base_speed > self.max_speed {
            return Err(TuningError::Invalid(format!(
                "base_speed {} exceeds max_speed {}",
                self.base_speed, self.max_speed
            )));
        }
        if self.max_lives == 0 {
            return Err(TuningError::Invalid("max_lives must be at least 1".into()));
        }
        Ok(())
    }

    /// Speed after `elapsed_ms` of running
    #[inline]
    pub fn speed_at(&self, elapsed_ms: f32) -> f32 {
        (self.base_speed + elapsed_ms * self.accel_per_ms).min(self.max_speed)
    }

    /// Spawn cooldown to arm after a spawn at the given speed
    #[inline]
    pub fn spawn_interval(&self, speed: f32) -> f32 {
        (self.spawn_interval_base - speed * self.spawn_speed_factor).max(self.min_spawn_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "finish_distance": 1200.0, "max_lives": 5 }"#)
            .expect("valid overrides");
        assert_eq!(tuning.finish_distance, 1200.0);
        assert_eq!(tuning.max_lives, 5);
        assert_eq!(tuning.base_speed, BASE_SPEED);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Tuning::from_json("{ nope").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().contains("parse error"));
    }

    #[test]
    fn test_base_above_max_rejected() {
        let err = Tuning::from_json(r#"{ "base_speed": 9.0, "max_speed": 4.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid(_)));
    }

    #[test]
    fn test_zero_lives_rejected() {
        let tuning = Tuning {
            max_lives: 0,
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_speed_ramp_caps() {
        let tuning = Tuning::default();
        assert_eq!(tuning.speed_at(0.0), BASE_SPEED);
        assert!(tuning.speed_at(1000.0) > BASE_SPEED);
        assert_eq!(tuning.speed_at(1.0e9), MAX_SPEED);
    }

    #[test]
    fn test_spawn_interval_floor() {
        let tuning = Tuning::default();
        assert_eq!(tuning.spawn_interval(2.2), (520.0f32 - 2.2 * 30.0).max(240.0));
        let fast = Tuning {
            spawn_speed_factor: 100.0,
            ..Default::default()
        };
        assert_eq!(fast.spawn_interval(8.0), 240.0);
    }
}
