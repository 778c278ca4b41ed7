use async_trait::async_trait;
use runtime::{ActionContext, ActionError, ActionResult, ParamKind, ParamsSchema, TypedAction};
use serde::Deserialize;

/// Longest message the server accepts in one chat packet.
pub const MAX_CHAT_LENGTH: usize = 256;

/// Sends a message to the in-game chat.
pub struct Chat;

#[derive(Debug, Deserialize)]
pub struct ChatParams {
    #[serde(default)]
    pub message: String,
}

#[async_trait]
impl TypedAction for Chat {
    type Params = ChatParams;

    fn id(&self) -> &str {
        "chat"
    }

    fn name(&self) -> &str {
        "Chat"
    }

    fn description(&self) -> &str {
        "Send a message to the in-game chat"
    }

    fn category(&self) -> Option<&str> {
        Some("social")
    }

    fn params_schema(&self) -> ParamsSchema {
        ParamsSchema::new().required("message", ParamKind::String, "Text to send")
    }

    fn validate(&self, params: &ChatParams) -> Result<(), String> {
        if params.message.trim().is_empty() {
            return Err("message cannot be empty".to_string());
        }
        if params.message.chars().count() > MAX_CHAT_LENGTH {
            return Err(format!("message is longer than {MAX_CHAT_LENGTH} characters"));
        }
        Ok(())
    }

    async fn run(
        &self,
        ctx: &ActionContext,
        params: ChatParams,
    ) -> Result<ActionResult, ActionError> {
        ctx.check_interrupted()?;
        ctx.chat.send_chat(&params.message).await?;
        ctx.logger.debug(format_args!("sent {} chars", params.message.len()));
        Ok(ActionResult::success(format!("Sent: {}", params.message)))
    }
}
