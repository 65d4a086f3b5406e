//! Gameplay tuning knobs, grouped by subsystem.
//!
//! `Tuning::default()` carries the shipped values. A partial JSON document can
//! override any subset via [`Tuning::from_json_str`]; every group and field
//! falls back to its default. The simulation only ever reads this table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub flight: FlightTuning,
    pub ai: AiTuning,
    pub weapons: WeaponTuning,
    pub targeting: TargetingTuning,
    pub auto_trace: AutoTraceTuning,
    pub look: LookTuning,
}

impl Tuning {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightTuning {
    /// Forward cruise speed (units/s).
    pub base_speed: f64,
    pub strafe_speed: f64,
    pub vertical_speed: f64,
    /// Yaw rate per unit of smoothed look input (rad/s).
    pub turn_rate_yaw: f64,
    pub turn_rate_pitch: f64,
    pub damping_linear: f64,
    pub damping_angular: f64,
    pub boost_multiplier: f64,
    pub boost_duration_sec: f64,
    pub boost_cooldown_sec: f64,
    /// Absolute pitch limit (radians).
    pub max_pitch: f64,
    /// Flight integration step cap (seconds).
    pub max_dt: f64,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self {
            base_speed: 6.0,
            strafe_speed: 3.2,
            vertical_speed: 3.2,
            turn_rate_yaw: 2.2,
            turn_rate_pitch: 1.9,
            damping_linear: 6.0,
            damping_angular: 8.0,
            boost_multiplier: 1.8,
            boost_duration_sec: 1.4,
            boost_cooldown_sec: 2.6,
            max_pitch: 1.2,
            max_dt: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    pub perception_hz: f64,
    pub decision_hz: f64,
    /// Decision rate beyond `lod_distance`.
    pub decision_lod_hz: f64,
    pub steering_hz: f64,
    /// Distance beyond which enemies think less often; also the fallback
    /// perception range for archetypes missing from content.
    pub lod_distance: f64,
    /// Full field of view (degrees).
    pub fov_degrees: f64,
    pub min_action_duration_sec: f64,
    pub evade_duration_sec: f64,
    /// Weight of the radial correction while orbiting.
    pub orbit_radial_factor: f64,
    /// Velocity smoothing rate toward the steering intent.
    pub move_damping: f64,
    /// Heading smoothing rate toward the velocity direction.
    pub turn_rate: f64,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            perception_hz: 10.0,
            decision_hz: 4.0,
            decision_lod_hz: 1.0,
            steering_hz: 20.0,
            lod_distance: 60.0,
            fov_degrees: 120.0,
            min_action_duration_sec: 0.8,
            evade_duration_sec: 0.6,
            orbit_radial_factor: 0.6,
            move_damping: 3.0,
            turn_rate: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    pub heat_max: f64,
    /// Overheat latch releases at or below this heat.
    pub heat_recover_threshold: f64,
    pub laser_max_range: f64,
    pub hit_marker_duration: f64,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            heat_max: 100.0,
            heat_recover_threshold: 40.0,
            laser_max_range: 120.0,
            hit_marker_duration: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingTuning {
    pub max_acquire_distance: f64,
    /// Acquisition circle radius in normalized device coordinates.
    pub screen_radius_ndc: f64,
    /// Minimum seconds between voluntary target switches.
    pub sticky_time_sec: f64,
    /// A challenger must score below `current * factor` to take the lock.
    pub switch_score_factor: f64,
    /// Half-angle of the aim assist cone (degrees).
    pub assist_cone_deg: f64,
    pub assist_strength: f64,
    /// Vertical field of view of the ship camera (degrees).
    pub camera_fov_deg: f64,
    pub camera_aspect: f64,
    pub camera_near: f64,
    pub camera_far: f64,
}

impl Default for TargetingTuning {
    fn default() -> Self {
        Self {
            max_acquire_distance: 120.0,
            screen_radius_ndc: 0.6,
            sticky_time_sec: 0.7,
            switch_score_factor: 0.7,
            assist_cone_deg: 6.0,
            assist_strength: 0.35,
            camera_fov_deg: 70.0,
            camera_aspect: 16.0 / 9.0,
            camera_near: 0.1,
            camera_far: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoTraceTuning {
    /// Rate cap for the assist's own turn request (deg/s).
    pub max_turn_deg_per_sec: f64,
    pub default_strength: f64,
    pub default_stop_angle_deg: f64,
    pub default_cancel_look_threshold: f64,
}

impl Default for AutoTraceTuning {
    fn default() -> Self {
        Self {
            max_turn_deg_per_sec: 90.0,
            default_strength: 2.5,
            default_stop_angle_deg: 2.0,
            default_cancel_look_threshold: 0.35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookTuning {
    pub look_sensitivity_touch: f64,
    pub look_sensitivity_gyro: f64,
    /// 0 = raw input, 1 = frozen.
    pub look_smoothing: f64,
    pub max_look_rate_deg_per_sec: f64,
    pub invert_look_x_touch: bool,
    pub invert_look_y_touch: bool,
    pub invert_look_x_gyro: bool,
    pub invert_look_y_gyro: bool,
}

impl Default for LookTuning {
    fn default() -> Self {
        Self {
            look_sensitivity_touch: 1.0,
            look_sensitivity_gyro: 1.0,
            look_smoothing: 0.15,
            max_look_rate_deg_per_sec: 180.0,
            invert_look_x_touch: false,
            invert_look_y_touch: false,
            invert_look_x_gyro: false,
            invert_look_y_gyro: false,
        }
    }
}
