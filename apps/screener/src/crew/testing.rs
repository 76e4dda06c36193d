//! Test doubles for the model and tool seams.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::crew::errors::ToolError;
use crate::crew::tools::Tool;
use crate::llm_client::{
    CompletionRequest, ContentBlock, LanguageModel, LlmError, LlmResponse, Usage,
};
use crate::retrieval::RetrievalError;

type Responder = Box<dyn Fn(&CompletionRequest) -> Result<LlmResponse, LlmError> + Send + Sync>;

/// A language model whose replies come from a closure. Every request is recorded.
pub struct ScriptedModel {
    responder: Responder,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    pub fn new(
        responder: impl Fn(&CompletionRequest) -> Result<LlmResponse, LlmError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn always_text(text: &str) -> Arc<Self> {
        let text = text.to_string();
        Self::new(move |_| Ok(text_response(&text)))
    }

    /// Replies in order; fails once the script runs out.
    pub fn sequence(replies: Vec<Result<LlmResponse, LlmError>>) -> Arc<Self> {
        let queue = Mutex::new(VecDeque::from(replies));
        Self::new(move |_| {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(api_error("script exhausted")))
        })
    }

    pub fn failing() -> Arc<Self> {
        Self::new(|_| Err(api_error("backend unavailable")))
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<LlmResponse, LlmError> {
        self.calls.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }
}

pub fn api_error(message: &str) -> LlmError {
    LlmError::Api {
        status: 500,
        message: message.to_string(),
    }
}

pub fn text_response(text: &str) -> LlmResponse {
    LlmResponse {
        content: vec![ContentBlock::text(text)],
        stop_reason: Some("end_turn".to_string()),
        usage: Usage::default(),
    }
}

pub fn tool_use_response(id: &str, name: &str, input: Value) -> LlmResponse {
    LlmResponse {
        content: vec![ContentBlock::ToolUse {
            id: id.to_string(),
            name: name.to_string(),
            input,
        }],
        stop_reason: Some("tool_use".to_string()),
        usage: Usage::default(),
    }
}

/// Returns `echo: <text>`.
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> String {
        "Echoes its input".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {"text": {"type": "string"}}, "required": ["text"]})
    }

    async fn invoke(&self, input: &Value) -> Result<String, ToolError> {
        let text = input
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidInput("missing 'text'".to_string()))?;
        Ok(format!("echo: {text}"))
    }
}

/// Always fails with a capability error.
pub struct FailingTool;

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "broken"
    }

    fn description(&self) -> String {
        "Always fails".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    async fn invoke(&self, _input: &Value) -> Result<String, ToolError> {
        Err(ToolError::Retrieval(RetrievalError::EmptyDocument))
    }
}
