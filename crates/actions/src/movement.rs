use async_trait::async_trait;
use runtime::{ActionContext, ActionError, ActionResult, ParamKind, ParamsSchema, TypedAction};
use serde::Deserialize;
use serde_json::json;
use world_core::{BlockPos, MovementGoal, WorldError};

/// Walks to a block coordinate.
pub struct GoTo;

#[derive(Debug, Deserialize)]
pub struct GoToParams {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// Stop once within this many blocks. Absent or zero means "stand on it".
    #[serde(default)]
    pub range: Option<f64>,
}

#[async_trait]
impl TypedAction for GoTo {
    type Params = GoToParams;

    fn id(&self) -> &str {
        "go_to"
    }

    fn name(&self) -> &str {
        "Go To"
    }

    fn description(&self) -> &str {
        "Walk to the given block coordinates"
    }

    fn category(&self) -> Option<&str> {
        Some("movement")
    }

    fn params_schema(&self) -> ParamsSchema {
        ParamsSchema::new()
            .required("x", ParamKind::Integer, "Target X")
            .required("y", ParamKind::Integer, "Target Y")
            .required("z", ParamKind::Integer, "Target Z")
            .optional("range", ParamKind::Number, "Acceptable distance from the target")
    }

    fn should_activate(&self, ctx: &ActionContext) -> bool {
        ctx.telemetry.snapshot().connected
    }

    fn validate(&self, params: &GoToParams) -> Result<(), String> {
        validate_range(params.range)
    }

    async fn run(
        &self,
        ctx: &ActionContext,
        params: GoToParams,
    ) -> Result<ActionResult, ActionError> {
        let pos = BlockPos::new(params.x, params.y, params.z);
        navigate(ctx, goal_for(pos, params.range), &pos.to_string()).await
    }
}

pub(crate) fn validate_range(range: Option<f64>) -> Result<(), String> {
    match range {
        Some(range) if !range.is_finite() || range < 0.0 => {
            Err("range must be a non-negative number".to_string())
        }
        _ => Ok(()),
    }
}

pub(crate) fn goal_for(pos: BlockPos, range: Option<f64>) -> MovementGoal {
    match range {
        Some(range) if range > 0.0 => MovementGoal::Near { pos, range },
        _ => MovementGoal::Block { pos },
    }
}

/// Runs a navigation request, stopping the navigator if interrupted.
///
/// An unreachable target is an ordinary failure; other world errors
/// propagate.
pub(crate) async fn navigate(
    ctx: &ActionContext,
    goal: MovementGoal,
    label: &str,
) -> Result<ActionResult, ActionError> {
    ctx.check_interrupted()?;
    ctx.logger.debug(format_args!("navigating to {label}"));

    let outcome = tokio::select! {
        outcome = ctx.navigator.go_to(goal) => Some(outcome),
        _ = ctx.interrupted() => None,
    };
    let Some(outcome) = outcome else {
        ctx.navigator.stop();
        ctx.check_interrupted()?;
        return Ok(ActionResult::failure("navigation interrupted"));
    };

    match outcome {
        Ok(outcome) if outcome.success => Ok(ActionResult::success(format!("Reached {label}"))
            .with_data(json!({
                "position": outcome.final_position,
                "distance": outcome.distance,
            }))),
        Ok(outcome) => Ok(ActionResult::failure(format!(
            "Stopped {:.1} blocks short of {label}",
            outcome.distance
        ))),
        Err(WorldError::NavigationFailed(reason)) => {
            ctx.logger.warn(format_args!("no route to {label}: {reason}"));
            Ok(ActionResult::failure(format!("Cannot reach {label}: {reason}")))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::harness;
    use runtime::typed;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use std::time::Duration;
    use world_core::Vec3;

    #[test]
    fn range_selects_goal_kind() {
        let pos = BlockPos::new(1, 2, 3);
        assert_eq!(goal_for(pos, None), MovementGoal::Block { pos });
        assert_eq!(goal_for(pos, Some(0.0)), MovementGoal::Block { pos });
        assert_eq!(goal_for(pos, Some(3.0)), MovementGoal::Near { pos, range: 3.0 });
    }

    #[tokio::test]
    async fn walks_to_target() {
        let (world, runtime) = harness(vec![typed(GoTo)]).await;

        let result = runtime.execute("go_to", json!({"x": 10, "y": 64, "z": -4})).await;

        assert!(result.success, "{}", result.message);
        assert_eq!(result.message, "Reached (10, 64, -4)");
        assert_eq!(world.position(), Vec3::new(10.5, 64.5, -3.5));
    }

    #[tokio::test]
    async fn missing_coordinates_are_rejected() {
        let (_world, runtime) = harness(vec![typed(GoTo)]).await;
        let result = runtime.execute("go_to", json!({"x": 10})).await;
        assert!(!result.success);
        assert!(result.message.starts_with("invalid parameters for go_to"));
    }

    #[tokio::test]
    async fn unreachable_target_is_a_failure_not_an_error() {
        let (world, runtime) = harness(vec![typed(GoTo)]).await;
        world.unreachable.store(true, Ordering::SeqCst);
        let mut errors = runtime.events().subscribe(runtime::Topic::ActionError);

        let result = runtime.execute("go_to", json!({"x": 1, "y": 1, "z": 1})).await;

        assert!(!result.success);
        assert!(result.message.contains("no path"));
        assert!(errors.try_recv().is_err());
    }

    #[tokio::test]
    async fn interrupt_stops_navigation() {
        let (world, runtime) = harness(vec![typed(GoTo)]).await;
        *world.travel_time.lock().unwrap() = Duration::from_secs(30);
        let executor = Arc::clone(runtime.executor());

        let pending = tokio::spawn(async move {
            executor.execute("go_to", json!({"x": 100, "y": 64, "z": 100})).await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        runtime.executor().interrupt_all("danger").unwrap();

        let result = tokio::time::timeout(Duration::from_secs(1), pending)
            .await
            .unwrap()
            .unwrap();
        assert!(!result.success);
        assert!(result.message.contains("danger"));
        assert_eq!(world.stops.load(Ordering::SeqCst), 1);
    }
}
