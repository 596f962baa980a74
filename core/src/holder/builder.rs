//! Executes a [`BuildPlan`] against a geometry kernel.

use super::params::HolderParams;
use super::plan::{BooleanOp, BuildPlan, BuildStep, Shape};
use crate::error::{HolderError, HolderResult};
use crate::kernel::{GeometryKernel, KernelOpError};
use std::collections::HashMap;
use tracing::{debug, info, info_span};

/// Boolean results at or below this volume (mm³) count as empty.
const MIN_SOLID_VOLUME: f64 = 1e-9;

pub struct HolderBuilder<'k, K: GeometryKernel> {
    kernel: &'k K,
    params: HolderParams,
}

impl<'k, K: GeometryKernel> HolderBuilder<'k, K> {
    pub fn new(kernel: &'k K, params: HolderParams) -> Self {
        Self { kernel, params }
    }

    pub fn params(&self) -> &HolderParams {
        &self.params
    }

    pub fn plan(&self) -> BuildPlan {
        BuildPlan::for_params(&self.params)
    }

    /// Run the full construction sequence and return the finished holder.
    ///
    /// Aborts at the first failing step; there is no partial result.
    pub fn build(&self) -> HolderResult<K::Solid> {
        self.params.validate()?;
        if !self.params.is_symmetric() {
            tracing::warn!(
                offset = self.params.mirror_offset(),
                "boss pair is not centred on the frame"
            );
        }

        let span = info_span!("build_holder", kernel = self.kernel.name());
        let _enter = span.enter();

        let plan = self.plan();
        let last_uses = plan.last_uses();
        let mut solids: HashMap<&'static str, K::Solid> = HashMap::with_capacity(plan.steps.len());
        for (index, step) in plan.steps.iter().enumerate() {
            let solid = self.execute(step, &solids)?;
            if let BuildStep::Boolean { base, tool, .. } = step {
                // Release operands no later step reads.
                for operand in [base, tool] {
                    if last_uses.get(operand) == Some(&index) {
                        solids.remove(operand);
                    }
                }
            }
            solids.insert(step.name(), solid);
        }

        let holder = solids.remove(plan.output).ok_or_else(|| {
            HolderError::construction(
                plan.output,
                KernelOpError::OperationFailed("plan did not produce its output".into()),
            )
        })?;
        info!(steps = plan.steps.len(), "holder built");
        Ok(holder)
    }

    fn execute(&self, step: &BuildStep, solids: &HashMap<&'static str, K::Solid>) -> HolderResult<K::Solid> {
        let kernel = self.kernel;
        match step {
            BuildStep::Primitive { name, shape, placement } => {
                let fail = |e| HolderError::construction(*name, e);
                let raw = match shape {
                    Shape::Box(b) => kernel.create_box(b.x, b.y, b.z),
                    Shape::Cylinder(c) => kernel.create_cylinder(c.radius, c.height),
                }
                .map_err(fail)?;
                let placed = if placement.is_identity() {
                    raw
                } else {
                    kernel.place(&raw, placement).map_err(fail)?
                };
                debug!(step = name, ?shape, "primitive created");
                Ok(placed)
            }
            BuildStep::Boolean { op, result, base, tool } => {
                let fail = |e| HolderError::construction(*result, e);
                let a = operand(solids, base, result)?;
                let b = operand(solids, tool, result)?;
                let solid = match op {
                    BooleanOp::Fuse => kernel.boolean_union(a, b),
                    BooleanOp::Cut => kernel.boolean_subtract(a, b),
                }
                .map_err(fail)?;

                let props = kernel.measure(&solid).map_err(fail)?;
                if props.is_degenerate(MIN_SOLID_VOLUME) {
                    return Err(fail(KernelOpError::OperationFailed(format!(
                        "{:?} of {} and {} left an empty solid (volume {:.6})",
                        op, base, tool, props.volume
                    ))));
                }
                debug!(step = result, ?op, volume = props.volume, "boolean applied");
                Ok(solid)
            }
        }
    }
}

fn operand<'a, S>(solids: &'a HashMap<&'static str, S>, name: &str, step: &str) -> HolderResult<&'a S> {
    solids.get(name).ok_or_else(|| {
        HolderError::construction(
            step,
            KernelOpError::OperationFailed(format!("operand '{}' has not been built", name)),
        )
    })
}

/// Build the HEPA filter holder with its production dimensions.
pub fn build_holder<K: GeometryKernel>(kernel: &K) -> HolderResult<K::Solid> {
    HolderBuilder::new(kernel, HolderParams::hepa()).build()
}
