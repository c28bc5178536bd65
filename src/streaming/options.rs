//! Per-stream options.

use super::builder::ToolCallPolicy;
use super::state::UsageMode;
use crate::types::UserMessage;
use crate::utils::cancel::CancelHandle;

/// Options for one [`ChatStream`](super::ChatStream).
///
/// Policy overrides take precedence over the adapter's defaults.
#[derive(Debug, Clone, Default)]
pub struct StreamOptions {
    /// The user turn that triggered the call, recorded into the state.
    pub user_message: Option<UserMessage>,
    /// Override the adapter's tool-call argument policy.
    pub tool_call_policy: Option<ToolCallPolicy>,
    /// Override the adapter's usage folding mode.
    pub usage_mode: Option<UsageMode>,
    /// Stop consuming when this handle is cancelled.
    pub cancel_handle: Option<CancelHandle>,
}

impl StreamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_message(mut self, message: UserMessage) -> Self {
        self.user_message = Some(message);
        self
    }

    pub fn with_tool_call_policy(mut self, policy: ToolCallPolicy) -> Self {
        self.tool_call_policy = Some(policy);
        self
    }

    pub fn with_usage_mode(mut self, mode: UsageMode) -> Self {
        self.usage_mode = Some(mode);
        self
    }

    pub fn with_cancel_handle(mut self, handle: CancelHandle) -> Self {
        self.cancel_handle = Some(handle);
        self
    }
}
