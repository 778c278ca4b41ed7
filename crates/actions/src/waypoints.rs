//! Named locations the agent can remember and return to.

use async_trait::async_trait;
use runtime::{ActionContext, ActionError, ActionResult, ParamKind, ParamsSchema, TypedAction};
use serde::Deserialize;
use serde_json::json;
use world_core::{BlockPos, Waypoint};

use crate::movement::{goal_for, navigate, validate_range};

fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("waypoint name cannot be empty".to_string());
    }
    Ok(())
}

/// Remembers a position under a name. Defaults to where the agent stands.
pub struct SetWaypoint;

#[derive(Debug, Deserialize)]
pub struct SetWaypointParams {
    pub name: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub x: Option<i32>,
    #[serde(default)]
    pub y: Option<i32>,
    #[serde(default)]
    pub z: Option<i32>,
}

#[async_trait]
impl TypedAction for SetWaypoint {
    type Params = SetWaypointParams;

    fn id(&self) -> &str {
        "set_waypoint"
    }

    fn name(&self) -> &str {
        "Set Waypoint"
    }

    fn description(&self) -> &str {
        "Remember a location by name (current position unless coordinates are given)"
    }

    fn category(&self) -> Option<&str> {
        Some("memory")
    }

    fn params_schema(&self) -> ParamsSchema {
        ParamsSchema::new()
            .required("name", ParamKind::String, "Waypoint name")
            .optional("note", ParamKind::String, "Free-form note")
            .optional("x", ParamKind::Integer, "X coordinate")
            .optional("y", ParamKind::Integer, "Y coordinate")
            .optional("z", ParamKind::Integer, "Z coordinate")
    }

    fn validate(&self, params: &SetWaypointParams) -> Result<(), String> {
        validate_name(&params.name)?;
        match (params.x, params.y, params.z) {
            (Some(_), Some(_), Some(_)) | (None, None, None) => Ok(()),
            _ => Err("give all of x, y, z or none of them".to_string()),
        }
    }

    async fn run(
        &self,
        ctx: &ActionContext,
        params: SetWaypointParams,
    ) -> Result<ActionResult, ActionError> {
        let snapshot = ctx.telemetry.snapshot();
        let pos = match (params.x, params.y, params.z) {
            (Some(x), Some(y), Some(z)) => BlockPos::new(x, y, z),
            _ => snapshot.position.floored(),
        };

        let mut waypoint = Waypoint::new(params.name.trim(), pos, snapshot.dimension);
        if let Some(note) = params.note {
            waypoint = waypoint.with_note(note);
        }
        let name = waypoint.name.clone();

        let previous = ctx.locations.set(waypoint)?;
        let verb = if previous.is_some() { "Updated" } else { "Saved" };
        ctx.logger.info(format_args!("{verb} waypoint {name} at {pos}"));

        Ok(ActionResult::success(format!("{verb} waypoint '{name}' at {pos}")))
    }
}

/// Walks to a remembered location.
pub struct GoToWaypoint;

#[derive(Debug, Deserialize)]
pub struct GoToWaypointParams {
    pub name: String,
    #[serde(default)]
    pub range: Option<f64>,
}

#[async_trait]
impl TypedAction for GoToWaypoint {
    type Params = GoToWaypointParams;

    fn id(&self) -> &str {
        "go_to_waypoint"
    }

    fn name(&self) -> &str {
        "Go To Waypoint"
    }

    fn description(&self) -> &str {
        "Walk to a previously saved waypoint"
    }

    fn category(&self) -> Option<&str> {
        Some("movement")
    }

    fn params_schema(&self) -> ParamsSchema {
        ParamsSchema::new()
            .required("name", ParamKind::String, "Waypoint name")
            .optional("range", ParamKind::Number, "Acceptable distance from the waypoint")
    }

    /// Only offered when connected and something has been saved.
    fn should_activate(&self, ctx: &ActionContext) -> bool {
        ctx.telemetry.snapshot().connected
            && ctx.locations.list().is_ok_and(|list| !list.is_empty())
    }

    fn validate(&self, params: &GoToWaypointParams) -> Result<(), String> {
        validate_name(&params.name)?;
        validate_range(params.range)
    }

    async fn run(
        &self,
        ctx: &ActionContext,
        params: GoToWaypointParams,
    ) -> Result<ActionResult, ActionError> {
        let Some(waypoint) = ctx.locations.get(params.name.trim())? else {
            return Ok(ActionResult::failure(format!(
                "Unknown waypoint '{}'",
                params.name
            )));
        };

        let here = ctx.telemetry.snapshot().dimension;
        if waypoint.dimension != here {
            return Ok(ActionResult::failure(format!(
                "Waypoint '{}' is in the {}, currently in the {here}",
                waypoint.name, waypoint.dimension
            )));
        }

        let label = format!("waypoint '{}'", waypoint.name);
        navigate(ctx, goal_for(waypoint.pos, params.range), &label).await
    }
}

/// Lists every saved waypoint.
pub struct ListWaypoints;

#[derive(Debug, Default, Deserialize)]
pub struct ListWaypointsParams {}

#[async_trait]
impl TypedAction for ListWaypoints {
    type Params = ListWaypointsParams;

    fn id(&self) -> &str {
        "list_waypoints"
    }

    fn name(&self) -> &str {
        "List Waypoints"
    }

    fn description(&self) -> &str {
        "List saved waypoints"
    }

    fn category(&self) -> Option<&str> {
        Some("memory")
    }

    async fn run(
        &self,
        ctx: &ActionContext,
        _params: ListWaypointsParams,
    ) -> Result<ActionResult, ActionError> {
        let waypoints = ctx.locations.list()?;
        if waypoints.is_empty() {
            return Ok(ActionResult::success("No waypoints saved"));
        }

        let summary: Vec<String> = waypoints
            .iter()
            .map(|w| format!("{} {}", w.name, w.pos))
            .collect();
        let data = waypoints
            .iter()
            .map(|w| {
                json!({
                    "name": w.name,
                    "pos": w.pos,
                    "dimension": w.dimension,
                    "note": w.note,
                })
            })
            .collect();

        Ok(
            ActionResult::success(format!("{} waypoints: {}", waypoints.len(), summary.join(", ")))
                .with_data(serde_json::Value::Array(data)),
        )
    }
}
