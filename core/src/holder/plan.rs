//! The holder's construction sequence as plain data.
//!
//! A [`BuildPlan`] names every intermediate solid and lists the primitive
//! and boolean steps in the exact order the kernel must run them.

use super::params::{BoxExtents, CylinderSize, HolderParams};
use crate::kernel::Placement;
use std::collections::HashMap;

/// Names of the solids produced along the way.
pub mod names {
    pub const OUTER: &str = "outer";
    pub const INNER: &str = "inner";
    pub const FRAME: &str = "frame";
    pub const LEFT_BOSS: &str = "left_boss";
    pub const RIGHT_BOSS: &str = "right_boss";
    pub const FRAME_WITH_LEFT_BOSS: &str = "frame_with_left_boss";
    pub const FRAME_WITH_BOSSES: &str = "frame_with_bosses";
    pub const LEFT_BORE: &str = "left_bore";
    pub const RIGHT_BORE: &str = "right_bore";
    pub const FRAME_WITH_LEFT_BORE: &str = "frame_with_left_bore";
    pub const HOLDER: &str = "holder";
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box(BoxExtents),
    Cylinder(CylinderSize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Fuse,
    Cut,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BuildStep {
    Primitive {
        name: &'static str,
        shape: Shape,
        placement: Placement,
    },
    Boolean {
        op: BooleanOp,
        result: &'static str,
        base: &'static str,
        tool: &'static str,
    },
}

impl BuildStep {
    /// Name of the solid this step produces.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Primitive { name, .. } => *name,
            Self::Boolean { result, .. } => *result,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildPlan {
    pub steps: Vec<BuildStep>,
    pub output: &'static str,
}

impl BuildPlan {
    pub fn for_params(params: &HolderParams) -> Self {
        use names::*;

        let feature = |name, size, position| BuildStep::Primitive {
            name,
            shape: Shape::Cylinder(size),
            placement: Placement::rotated_then_translated(params.feature_rotation, position),
        };
        let boolean = |op, result, base, tool| BuildStep::Boolean { op, result, base, tool };

        let steps = vec![
            BuildStep::Primitive {
                name: OUTER,
                shape: Shape::Box(params.outer),
                placement: Placement::identity(),
            },
            BuildStep::Primitive {
                name: INNER,
                shape: Shape::Box(params.inner),
                placement: Placement::translation(params.inner_offset),
            },
            boolean(BooleanOp::Cut, FRAME, OUTER, INNER),
            feature(LEFT_BOSS, params.boss, params.boss_positions.left),
            feature(RIGHT_BOSS, params.boss, params.boss_positions.right),
            boolean(BooleanOp::Fuse, FRAME_WITH_LEFT_BOSS, FRAME, LEFT_BOSS),
            boolean(BooleanOp::Fuse, FRAME_WITH_BOSSES, FRAME_WITH_LEFT_BOSS, RIGHT_BOSS),
            feature(LEFT_BORE, params.bore, params.bore_positions.left),
            feature(RIGHT_BORE, params.bore, params.bore_positions.right),
            boolean(BooleanOp::Cut, FRAME_WITH_LEFT_BORE, FRAME_WITH_BOSSES, LEFT_BORE),
            boolean(BooleanOp::Cut, HOLDER, FRAME_WITH_LEFT_BORE, RIGHT_BORE),
        ];

        Self { steps, output: HOLDER }
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(BuildStep::name).collect()
    }

    /// Index of the last step that reads each solid as an operand.
    ///
    /// The output and any solid no boolean reads are absent.
    pub fn last_uses(&self) -> HashMap<&'static str, usize> {
        let mut last = HashMap::new();
        for (index, step) in self.steps.iter().enumerate() {
            if let BuildStep::Boolean { base, tool, .. } = step {
                last.insert(*base, index);
                last.insert(*tool, index);
            }
        }
        last
    }
}
