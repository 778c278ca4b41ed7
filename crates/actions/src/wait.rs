use std::time::Duration;

use async_trait::async_trait;
use runtime::{ActionContext, ActionError, ActionResult, ParamKind, ParamsSchema, TypedAction};
use serde::Deserialize;

const DEFAULT_SECONDS: f64 = 1.0;
const DEFAULT_MAX_SECONDS: f64 = 60.0;

/// Idles for a while. Stops early when interrupted.
///
/// The upper bound comes from the `wait.max_seconds` config key.
pub struct Wait;

#[derive(Debug, Deserialize)]
pub struct WaitParams {
    #[serde(default = "default_seconds")]
    pub seconds: f64,
}

fn default_seconds() -> f64 {
    DEFAULT_SECONDS
}

#[async_trait]
impl TypedAction for Wait {
    type Params = WaitParams;

    fn id(&self) -> &str {
        "wait"
    }

    fn name(&self) -> &str {
        "Wait"
    }

    fn description(&self) -> &str {
        "Do nothing for a number of seconds"
    }

    fn params_schema(&self) -> ParamsSchema {
        ParamsSchema::new().optional("seconds", ParamKind::Number, "How long to wait (default 1)")
    }

    fn validate(&self, params: &WaitParams) -> Result<(), String> {
        if !params.seconds.is_finite() || params.seconds <= 0.0 {
            return Err("seconds must be a positive number".to_string());
        }
        Ok(())
    }

    async fn run(
        &self,
        ctx: &ActionContext,
        params: WaitParams,
    ) -> Result<ActionResult, ActionError> {
        let max = ctx.config.get_or("wait.max_seconds", DEFAULT_MAX_SECONDS);
        if params.seconds > max {
            return Ok(ActionResult::failure(format!(
                "cannot wait {}s, the limit is {max}s",
                params.seconds
            )));
        }

        let Ok(duration) = Duration::try_from_secs_f64(params.seconds) else {
            return Ok(ActionResult::failure(format!(
                "cannot wait {}s, not a representable duration",
                params.seconds
            )));
        };

        ctx.check_interrupted()?;
        tokio::select! {
            _ = ctx.interrupted() => {}
            _ = tokio::time::sleep(duration) => {}
        }
        ctx.check_interrupted()?;

        Ok(ActionResult::success(format!("Waited {}s", params.seconds)))
    }
}
