//! Interpreter that converts a derived command string into a plant mesh.
//!
//! The entry point is [`PlantInterpreter`]. Configure it with [`ModelParams`],
//! then call [`PlantInterpreter::build`] with the command string produced by
//! [`Grammar::derive`](crate::grammar::Grammar::derive), the active
//! [`Material`] and a random source.

use crate::geometry::{BoundingBox, ring_points};
use crate::mesh::{Material, Mesh, MeshBuilder};
use crate::params::ModelParams;
use crate::turtle::{TurtleOp, TurtleState};
use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default maximum number of simultaneously open branches.
pub const DEFAULT_MAX_STACK_DEPTH: usize = 1024;

const SIDE_UVS: [[Vec2; 3]; 2] = [
    [Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 0.0)],
    [Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0)],
];
const CAP_UVS: [Vec2; 3] = [Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0), Vec2::new(0.5, 0.0)];

/// Counters collected while walking the command string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Segments emitted with side faces (`F`, `B`).
    pub segments: usize,
    /// Segments computed without faces (`f`, `b`).
    pub moves: usize,
    /// End caps closing branch tips.
    pub caps: usize,
    /// Deepest branch nesting reached.
    pub max_depth: usize,
    /// Pushes dropped because the stack was full.
    pub dropped_pushes: usize,
}

/// A finished plant: mesh, bounds, the centering transform and its material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantModel {
    pub mesh: Mesh,

    /// Bounds of every ring point and cap apex computed during the build, in
    /// model space (before `translation`).
    pub bounds: BoundingBox,

    /// Global translation that centers the model on the origin. It is kept
    /// separate from the vertex data and never baked into `mesh`.
    pub translation: Vec3,

    pub material: Material,

    pub stats: BuildStats,
}

impl PlantModel {
    /// Wraps an already built mesh, deriving the centering translation from
    /// `bounds`.
    pub fn from_parts(mesh: Mesh, bounds: BoundingBox, material: Material) -> Self {
        Self {
            mesh,
            translation: bounds.centering_translation(),
            bounds,
            material,
            stats: BuildStats::default(),
        }
    }

    /// Bounds after applying the centering translation.
    pub fn centered_bounds(&self) -> BoundingBox {
        if self.bounds.is_empty() {
            return self.bounds;
        }
        BoundingBox {
            min: self.bounds.min + self.translation,
            max: self.bounds.max + self.translation,
        }
    }

    /// Vertex positions with the centering translation applied.
    pub fn world_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.mesh.positions.iter().map(|p| *p + self.translation)
    }
}

/// Interprets turtle command strings to build a [`PlantModel`].
pub struct PlantInterpreter {
    params: ModelParams,
    max_stack_depth: usize,
}

impl PlantInterpreter {
    /// Creates an interpreter. Out-of-range parameters are clamped.
    pub fn new(params: ModelParams) -> Self {
        Self {
            params: params.sanitized(),
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
        }
    }

    /// Limits branch nesting (builder pattern). Pushes beyond the limit are
    /// dropped together with their matching `]`.
    pub fn with_max_stack_depth(mut self, depth: usize) -> Self {
        self.max_stack_depth = depth;
        self
    }

    pub fn params(&self) -> &ModelParams {
        &self.params
    }

    /// Walks `commands` and returns the resulting plant.
    ///
    /// The turtle starts at the origin heading along `+Y`, pitched by
    /// `init_angle`. Every turn samples its own angle from `rng`, so seeding
    /// the generator makes a build reproducible.
    ///
    /// # Branches
    ///
    /// `[` saves the full pose (position, orientations, segment length and
    /// thickness) and continues on a copy whose cross-section starts fresh.
    /// `]` caps the current tip and restores the saved pose. A `]` with no
    /// open branch caps the trunk and ends the walk. Branches still open at
    /// the end of the string are capped innermost first.
    pub fn build<R: Rng>(&self, commands: &str, material: &Material, rng: &mut R) -> PlantModel {
        let mut ctx = BuildContext {
            params: &self.params,
            textured: material.is_textured(),
            mesh: MeshBuilder::new(),
            bounds: BoundingBox::new(),
            stats: BuildStats::default(),
        };
        let mut turtle = TurtleState::new(
            self.params.init_angle,
            self.params.segment_length,
            self.params.segment_thickness,
        );
        let mut stack: Vec<TurtleState> = Vec::new();
        // Dropped pushes still waiting for their `]`.
        let mut overflow = 0usize;
        let mut terminated = false;

        for symbol in commands.chars() {
            match TurtleOp::from_symbol(symbol) {
                // --- MOVEMENT ---
                TurtleOp::Draw => ctx.segment(&mut turtle, 1.0, true),
                TurtleOp::Move => ctx.segment(&mut turtle, 1.0, false),
                TurtleOp::DrawBack => ctx.segment(&mut turtle, -1.0, true),
                TurtleOp::MoveBack => ctx.segment(&mut turtle, -1.0, false),

                // --- ROTATION ---
                TurtleOp::Pitch(s) => turtle.pitch(s * self.params.sample_angle(rng)),
                TurtleOp::Yaw(s) => turtle.yaw(s * self.params.sample_angle(rng)),
                TurtleOp::Roll(s) => turtle.roll(s * self.params.sample_angle(rng)),

                // --- FLOW ---
                TurtleOp::Push => {
                    if stack.len() < self.max_stack_depth {
                        let child = turtle.branch();
                        stack.push(std::mem::replace(&mut turtle, child));
                        ctx.stats.max_depth = ctx.stats.max_depth.max(stack.len());
                    } else {
                        if overflow == 0 {
                            log::warn!(
                                "branch depth limit {} reached; ignoring deeper branches",
                                self.max_stack_depth
                            );
                        }
                        overflow += 1;
                        ctx.stats.dropped_pushes += 1;
                    }
                }
                TurtleOp::Pop => {
                    // A `]` closing a dropped push is swallowed with it.
                    if overflow > 0 {
                        overflow -= 1;
                        continue;
                    }
                    ctx.cap(&mut turtle);
                    match stack.pop() {
                        Some(parent) => turtle = parent,
                        None => {
                            log::warn!(
                                "unbalanced ']' closed the trunk; remaining commands ignored"
                            );
                            terminated = true;
                            break;
                        }
                    }
                }
                TurtleOp::Ignore => {}
            }
        }

        if !terminated {
            ctx.cap(&mut turtle);
            while let Some(mut parent) = stack.pop() {
                ctx.cap(&mut parent);
            }
        }

        let BuildContext {
            mesh, bounds, stats, ..
        } = ctx;
        let mesh = mesh.build();
        log::debug!(
            "built plant: {} triangles, {} segments, {} caps, depth {}",
            mesh.triangle_count(),
            stats.segments,
            stats.caps,
            stats.max_depth
        );

        PlantModel {
            mesh,
            translation: bounds.centering_translation(),
            bounds,
            material: material.clone(),
            stats,
        }
    }
}

/// Mutable state of one build: the mesh under construction, the running
/// bounds and statistics. Owned by a single [`PlantInterpreter::build`] call.
struct BuildContext<'a> {
    params: &'a ModelParams,
    textured: bool,
    mesh: MeshBuilder,
    bounds: BoundingBox,
    stats: BuildStats,
}

impl BuildContext<'_> {
    fn ring(&mut self, center: Vec3, axis: Vec3, radius: f32) -> Vec<Vec3> {
        let ring = ring_points(center, axis, radius, self.params.sides);
        self.bounds.include_all(&ring);
        ring
    }

    /// Lays one tapered segment from the tip along `direction * step`.
    fn segment(&mut self, turtle: &mut TurtleState, direction: f32, visible: bool) {
        let axis = turtle.step();
        let next = turtle.position + axis * direction;

        if turtle.ring.is_empty() {
            turtle.ring = self.ring(turtle.position, axis, turtle.segment_thickness);
        }
        let end_radius = turtle.segment_thickness * self.params.cut_thi_factor;
        let end_ring = self.ring(next, axis, end_radius);

        if visible {
            self.connect_rings(&turtle.ring, &end_ring);
            self.stats.segments += 1;
        } else {
            self.stats.moves += 1;
        }

        turtle.position = next;
        turtle.ring = end_ring;
        turtle.taper(self.params.cut_len_factor, self.params.cut_thi_factor);
    }

    /// Two triangles per side, wound so the faces point away from the axis.
    fn connect_rings(&mut self, begin: &[Vec3], end: &[Vec3]) {
        let n = begin.len().min(end.len());
        for i in 0..n {
            let j = (i + 1) % n;
            let quads = [[begin[i], end[i], begin[j]], [begin[j], end[i], end[j]]];
            for (corners, uvs) in quads.into_iter().zip(SIDE_UVS) {
                if self.textured {
                    self.mesh.add_textured_triangle(corners, uvs);
                } else {
                    self.mesh.add_triangle(corners);
                }
            }
        }
    }

    /// Closes the branch with a triangle fan from the tip ring to an apex one
    /// segment ahead.
    fn cap(&mut self, turtle: &mut TurtleState) {
        let axis = turtle.step();
        let apex = turtle.position + axis;

        if turtle.ring.is_empty() {
            turtle.ring = self.ring(turtle.position, axis, turtle.segment_thickness);
        }

        let ring = &turtle.ring;
        let n = ring.len();
        for i in 0..n {
            let corners = [ring[(i + 1) % n], ring[i], apex];
            if self.textured {
                self.mesh.add_textured_triangle(corners, CAP_UVS);
            } else {
                self.mesh.add_triangle(corners);
            }
        }

        self.bounds.include(apex);
        self.stats.caps += 1;
    }
}
