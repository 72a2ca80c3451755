//! Model parameters controlling how the turtle turns a command string into a
//! mesh.
//!
//! Every field has a textual setter mirroring a free-form input box: bad text
//! resets the field to a fallback value and out-of-range numbers are clamped.
//! Nothing here ever returns an error.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const SIDES_RANGE: RangeInclusive<u32> = 3..=64;
pub const SEGMENT_LENGTH_RANGE: RangeInclusive<f32> = 1.0..=50.0;
pub const SEGMENT_THICKNESS_RANGE: RangeInclusive<f32> = 1.0..=20.0;
pub const TAPER_RANGE: RangeInclusive<f32> = 0.5..=3.0;

/// Geometric parameters for plant interpretation. Angles are in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Initial rotation of the turtle about the pitch axis.
    pub init_angle: f32,
    /// Base rotation applied by every turn command.
    pub rot_angle: f32,
    /// Maximum random deviation from `rot_angle` (non-negative).
    pub dev_angle: f32,
    /// Number of side faces per segment.
    pub sides: u32,
    /// Length of the first segment of the trunk.
    pub segment_length: f32,
    /// Ratio between successive segment lengths along a branch.
    pub cut_len_factor: f32,
    /// Radius of the first segment of the trunk.
    pub segment_thickness: f32,
    /// Ratio between successive segment radii along a branch.
    pub cut_thi_factor: f32,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            init_angle: 0.0,
            rot_angle: 60.0,
            dev_angle: 5.0,
            sides: 8,
            segment_length: 5.0,
            cut_len_factor: 0.9,
            segment_thickness: 1.0,
            cut_thi_factor: 0.9,
        }
    }
}

fn parse_f32(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

fn clamp(value: f32, range: &RangeInclusive<f32>) -> f32 {
    value.clamp(*range.start(), *range.end())
}

impl ModelParams {
    /// Returns a copy with every field clamped into its valid range.
    pub fn sanitized(mut self) -> Self {
        self.set_dev_angle(self.dev_angle);
        self.set_sides(self.sides);
        self.set_segment_length(self.segment_length);
        self.set_cut_len_factor(self.cut_len_factor);
        self.set_segment_thickness(self.segment_thickness);
        self.set_cut_thi_factor(self.cut_thi_factor);
        self
    }

    pub fn set_dev_angle(&mut self, value: f32) {
        self.dev_angle = value.max(0.0);
    }

    pub fn set_sides(&mut self, value: u32) {
        self.sides = value.clamp(*SIDES_RANGE.start(), *SIDES_RANGE.end());
    }

    pub fn set_segment_length(&mut self, value: f32) {
        self.segment_length = clamp(value.abs(), &SEGMENT_LENGTH_RANGE);
    }

    pub fn set_cut_len_factor(&mut self, value: f32) {
        self.cut_len_factor = clamp(value, &TAPER_RANGE);
    }

    pub fn set_segment_thickness(&mut self, value: f32) {
        self.segment_thickness = clamp(value.abs(), &SEGMENT_THICKNESS_RANGE);
    }

    pub fn set_cut_thi_factor(&mut self, value: f32) {
        self.cut_thi_factor = clamp(value, &TAPER_RANGE);
    }

    // --- Textual setters ---

    pub fn set_init_angle_str(&mut self, value: &str) {
        self.init_angle = parse_f32(value).unwrap_or(0.0);
    }

    pub fn set_rot_angle_str(&mut self, value: &str) {
        self.rot_angle = parse_f32(value).unwrap_or(60.0);
    }

    pub fn set_dev_angle_str(&mut self, value: &str) {
        self.set_dev_angle(parse_f32(value).unwrap_or(5.0));
    }

    /// Parses a side count. Unparsable text resets the side count to 8.
    pub fn set_sides_str(&mut self, value: &str) {
        match value.trim().parse::<i64>() {
            Ok(n) => {
                let n = u32::try_from(n.unsigned_abs()).unwrap_or(u32::MAX);
                self.set_sides(n);
            }
            Err(_) => self.sides = 8,
        }
    }

    pub fn set_segment_length_str(&mut self, value: &str) {
        match parse_f32(value) {
            Some(v) => self.set_segment_length(v),
            None => self.segment_length = 1.0,
        }
    }

    pub fn set_cut_len_factor_str(&mut self, value: &str) {
        match parse_f32(value) {
            Some(v) => self.set_cut_len_factor(v),
            None => self.cut_len_factor = 1.0,
        }
    }

    pub fn set_segment_thickness_str(&mut self, value: &str) {
        match parse_f32(value) {
            Some(v) => self.set_segment_thickness(v),
            None => self.segment_thickness = 1.0,
        }
    }

    pub fn set_cut_thi_factor_str(&mut self, value: &str) {
        match parse_f32(value) {
            Some(v) => self.set_cut_thi_factor(v),
            None => self.cut_thi_factor = 1.0,
        }
    }

    /// Samples a turn angle uniformly from `rot_angle ± dev_angle`, in degrees.
    pub fn sample_angle<R: rand::Rng>(&self, rng: &mut R) -> f32 {
        let min = self.rot_angle - self.dev_angle;
        let max = self.rot_angle + self.dev_angle;
        min + rng.r#gen::<f32>() * (max - min)
    }
}
