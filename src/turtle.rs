//! Turtle state and operations for plant interpretation.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Local axis the turtle pitches around (`+`/`-`).
pub const PITCH_AXIS: Vec3 = Vec3::Z;
/// Local axis the turtle yaws around (`}`/`{`).
pub const YAW_AXIS: Vec3 = Vec3::Y;
/// Local axis the turtle rolls around (`>`/`<`).
pub const ROLL_AXIS: Vec3 = Vec3::X;

/// Upper bound for segment length and thickness. Growing taper factors
/// saturate here instead of overflowing to infinity.
pub const MAX_SEGMENT_SCALE: f32 = 1.0e6;

/// The pose of the drawing turtle.
///
/// Tracks position, two orientations and the current segment scale. The
/// `ring` holds the cross-section left at the tip of the last segment drawn
/// on this branch; it is empty at the start of every branch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TurtleState {
    /// Current world-space position of the tip.
    pub position: Vec3,

    /// Orientation used to derive the heading; local `+Y` is forward.
    pub forward_rot: Quat,

    /// Secondary orientation rotated alongside `forward_rot` with the roll and
    /// yaw axes swapped.
    pub up_rot: Quat,

    /// Length of the next segment.
    pub segment_length: f32,

    /// Radius at the base of the next segment.
    pub segment_thickness: f32,

    /// Cross-section at the branch tip, reused as the base of the next segment.
    pub ring: Vec<Vec3>,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self::new(0.0, 1.0, 1.0)
    }
}

impl TurtleState {
    /// Creates the root pose at the origin, pitched by `init_angle` degrees.
    pub fn new(init_angle: f32, segment_length: f32, segment_thickness: f32) -> Self {
        let initial = Quat::from_axis_angle(PITCH_AXIS, init_angle.to_radians());
        Self {
            position: Vec3::ZERO,
            forward_rot: initial,
            up_rot: Quat::from_axis_angle(PITCH_AXIS, 90f32.to_radians()) * initial,
            segment_length,
            segment_thickness,
            ring: Vec::new(),
        }
    }

    /// Copies the pose for a new branch. The branch starts without a ring.
    pub fn branch(&self) -> Self {
        Self {
            ring: Vec::new(),
            ..self.clone()
        }
    }

    /// Returns the turtle's heading (local `+Y`) in world space.
    pub fn heading(&self) -> Vec3 {
        self.forward_rot * Vec3::Y
    }

    /// Displacement of one segment along the heading at the current length.
    pub fn step(&self) -> Vec3 {
        self.forward_rot * (Vec3::Y * self.segment_length)
    }

    /// Rotates both orientations around the pitch axis by `degrees`.
    pub fn pitch(&mut self, degrees: f32) {
        let rot = Quat::from_axis_angle(PITCH_AXIS, degrees.to_radians());
        self.forward_rot *= rot;
        self.up_rot *= rot;
    }

    /// Yaws the heading and rolls the secondary orientation by `degrees`.
    pub fn yaw(&mut self, degrees: f32) {
        let angle = degrees.to_radians();
        self.forward_rot *= Quat::from_axis_angle(YAW_AXIS, angle);
        self.up_rot *= Quat::from_axis_angle(ROLL_AXIS, angle);
    }

    /// Rolls the heading and yaws the secondary orientation by `degrees`.
    pub fn roll(&mut self, degrees: f32) {
        let angle = degrees.to_radians();
        self.forward_rot *= Quat::from_axis_angle(ROLL_AXIS, angle);
        self.up_rot *= Quat::from_axis_angle(YAW_AXIS, angle);
    }

    /// Scales length and thickness after a segment has been laid down,
    /// saturating at [`MAX_SEGMENT_SCALE`].
    pub fn taper(&mut self, len_factor: f32, thi_factor: f32) {
        self.segment_length = (self.segment_length * len_factor).min(MAX_SEGMENT_SCALE);
        self.segment_thickness = (self.segment_thickness * thi_factor).min(MAX_SEGMENT_SCALE);
    }
}

/// Operations that can be performed by the plant turtle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurtleOp {
    // --- Movement ---
    /// Draw a segment forward (`F`).
    Draw,
    /// Move forward, computing the segment without faces (`f`).
    Move,
    /// Draw a segment backward (`B`).
    DrawBack,
    /// Move backward without faces (`b`).
    MoveBack,

    // --- Rotation (sign of the sampled angle) ---
    /// `+` / `-`
    Pitch(f32),
    /// `}` / `{`
    Yaw(f32),
    /// `>` / `<`
    Roll(f32),

    // --- Flow Control ---
    /// Open a branch (`[`).
    Push,
    /// Cap the branch tip and close the branch (`]`).
    Pop,
    /// No-op; symbol has no meaning to the turtle.
    Ignore,
}

impl TurtleOp {
    /// Maps a command symbol to its operation. Unknown symbols are ignored.
    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            'F' => Self::Draw,
            'f' => Self::Move,
            'B' => Self::DrawBack,
            'b' => Self::MoveBack,
            '+' => Self::Pitch(1.0),
            '-' => Self::Pitch(-1.0),
            '}' => Self::Yaw(1.0),
            '{' => Self::Yaw(-1.0),
            '>' => Self::Roll(1.0),
            '<' => Self::Roll(-1.0),
            '[' => Self::Push,
            ']' => Self::Pop,
            _ => Self::Ignore,
        }
    }
}
