//! Block lookup and placement against the spatial cache.

use async_trait::async_trait;
use runtime::{ActionContext, ActionError, ActionResult, ParamKind, ParamsSchema, TypedAction};
use serde::Deserialize;
use serde_json::json;
use world_core::{BlockInfo, BlockPos, WorldError};

const DEFAULT_SEARCH_RADIUS: f64 = 32.0;
const MAX_SEARCH_RADIUS: f64 = 128.0;

/// Finds the nearest cached block with a given name.
pub struct FindBlock;

#[derive(Debug, Deserialize)]
pub struct FindBlockParams {
    pub block: String,
    #[serde(default = "default_radius")]
    pub radius: f64,
}

fn default_radius() -> f64 {
    DEFAULT_SEARCH_RADIUS
}

#[async_trait]
impl TypedAction for FindBlock {
    type Params = FindBlockParams;

    fn id(&self) -> &str {
        "find_block"
    }

    fn name(&self) -> &str {
        "Find Block"
    }

    fn description(&self) -> &str {
        "Find the nearest known block of a type"
    }

    fn category(&self) -> Option<&str> {
        Some("world")
    }

    fn params_schema(&self) -> ParamsSchema {
        ParamsSchema::new()
            .required("block", ParamKind::String, "Block name, e.g. oak_log")
            .optional("radius", ParamKind::Number, "Search radius (default 32)")
    }

    fn validate(&self, params: &FindBlockParams) -> Result<(), String> {
        if params.block.trim().is_empty() {
            return Err("block name cannot be empty".to_string());
        }
        if !(params.radius > 0.0 && params.radius <= MAX_SEARCH_RADIUS) {
            return Err(format!("radius must be within (0, {MAX_SEARCH_RADIUS}]"));
        }
        Ok(())
    }

    async fn run(
        &self,
        ctx: &ActionContext,
        params: FindBlockParams,
    ) -> Result<ActionResult, ActionError> {
        ctx.check_interrupted()?;
        let here = ctx.telemetry.snapshot().position.floored();

        let nearest = ctx
            .blocks
            .query_by_radius(here, params.radius)
            .into_iter()
            .find(|(_, info)| info.name == params.block);

        let Some((pos, _)) = nearest else {
            return Ok(ActionResult::failure(format!(
                "No {} within {} blocks",
                params.block, params.radius
            )));
        };

        let distance = here.distance_to(pos);
        Ok(
            ActionResult::success(format!("Found {} at {pos}", params.block)).with_data(json!({
                "pos": pos,
                "distance": distance,
            })),
        )
    }
}

/// Places a block and records it in the cache.
pub struct PlaceBlock;

#[derive(Debug, Deserialize)]
pub struct PlaceBlockParams {
    pub block: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

#[async_trait]
impl TypedAction for PlaceBlock {
    type Params = PlaceBlockParams;

    fn id(&self) -> &str {
        "place_block"
    }

    fn name(&self) -> &str {
        "Place Block"
    }

    fn description(&self) -> &str {
        "Place a block from the inventory at the given coordinates"
    }

    fn category(&self) -> Option<&str> {
        Some("world")
    }

    fn params_schema(&self) -> ParamsSchema {
        ParamsSchema::new()
            .required("block", ParamKind::String, "Block name to place")
            .required("x", ParamKind::Integer, "Target X")
            .required("y", ParamKind::Integer, "Target Y")
            .required("z", ParamKind::Integer, "Target Z")
    }

    fn should_activate(&self, ctx: &ActionContext) -> bool {
        ctx.telemetry.snapshot().connected
    }

    fn validate(&self, params: &PlaceBlockParams) -> Result<(), String> {
        if params.block.trim().is_empty() {
            return Err("block name cannot be empty".to_string());
        }
        Ok(())
    }

    async fn run(
        &self,
        ctx: &ActionContext,
        params: PlaceBlockParams,
    ) -> Result<ActionResult, ActionError> {
        let pos = BlockPos::new(params.x, params.y, params.z);

        if let Some(existing) = ctx.blocks.get(pos).filter(|info| info.solid) {
            return Ok(ActionResult::failure(format!(
                "{pos} is occupied by {}",
                existing.name
            )));
        }

        ctx.check_interrupted()?;
        let outcome = match ctx.placer.place_block(pos, &params.block).await {
            Ok(outcome) => outcome,
            Err(WorldError::PlacementFailed { reason, .. }) => {
                return Ok(ActionResult::failure(format!(
                    "Cannot place {} at {pos}: {reason}",
                    params.block
                )));
            }
            Err(e) => return Err(e.into()),
        };

        if !outcome.success {
            return Ok(ActionResult::failure(format!(
                "Placing {} at {pos} did not take effect",
                params.block
            )));
        }

        ctx.blocks.set(pos, BlockInfo::new(outcome.block.clone(), true));
        ctx.logger.info(format_args!("placed {} at {pos}", outcome.block));

        Ok(
            ActionResult::success(format!("Placed {} at {pos}", outcome.block)).with_data(json!({
                "pos": pos,
                "distance": outcome.distance,
            })),
        )
    }
}
