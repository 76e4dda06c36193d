//! Agent loop: drives one agent through model turns and tool calls until it
//! produces a final answer.
//!
//! # Loop
//! 1. Send system prompt, conversation and tool specs.
//! 2. Tool calls in the reply → run each, append the assistant turn and a user
//!    turn with the results, go again.
//! 3. No tool calls → the reply text is the final answer.
//! 4. Budget (`max_iter` turns) spent → ask for the final answer with tool use
//!    disabled.
//!
//! Recoverable tool errors go back to the model as error results. Everything
//! else aborts the loop and propagates.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::crew::agent::Agent;
use crate::crew::errors::CrewError;
use crate::crew::prompts::FORCE_FINAL_ANSWER;
use crate::crew::tools::Tool;
use crate::llm_client::{
    CompletionRequest, ContentBlock, LlmError, LlmResponse, Message, MessageRole, ToolCall,
    ToolChoice,
};

/// Logs at info for verbose agents, at debug otherwise.
macro_rules! step {
    ($agent:expr, $($arg:tt)+) => {
        if $agent.verbose {
            info!($($arg)+);
        } else {
            debug!($($arg)+);
        }
    };
}

/// Runs `agent` on `prompt` with `tools` available and returns its final answer.
pub async fn execute_agent(
    agent: &Agent,
    prompt: &str,
    tools: &[Arc<dyn Tool>],
) -> Result<String, CrewError> {
    let system = agent.system_prompt();
    let specs: Vec<_> = tools.iter().map(|t| t.spec()).collect();
    let mut messages = vec![Message::user_text(prompt)];

    for iteration in 1..=agent.max_iter {
        let request = CompletionRequest {
            system: system.clone(),
            messages: messages.clone(),
            tools: specs.clone(),
            tool_choice: None,
        };
        let response = complete(agent, &request).await?;
        let calls = response.tool_calls();

        if calls.is_empty() {
            step!(agent, agent = %agent.role, iteration, "Agent produced final answer");
            return final_answer(agent, response);
        }

        let thought = response.text();
        if !thought.is_empty() {
            step!(agent, agent = %agent.role, iteration, "Thought: {}", thought);
        }

        messages.push(response.into_assistant_message());

        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(run_tool(agent, tools, call).await?);
        }
        messages.push(Message {
            role: MessageRole::User,
            content: results,
        });
    }

    warn!(
        agent = %agent.role,
        max_iter = agent.max_iter,
        "Iteration budget exhausted, forcing final answer"
    );

    // The last message is always the user turn carrying tool results here.
    if let Some(last) = messages.last_mut() {
        last.content.push(ContentBlock::text(FORCE_FINAL_ANSWER));
    }

    let request = CompletionRequest {
        system,
        messages,
        tools: specs,
        tool_choice: if tools.is_empty() {
            None
        } else {
            Some(ToolChoice::None)
        },
    };
    let response = complete(agent, &request).await?;
    final_answer(agent, response)
}

async fn complete(agent: &Agent, request: &CompletionRequest) -> Result<LlmResponse, CrewError> {
    agent
        .llm()
        .complete(request)
        .await
        .map_err(|source| CrewError::Llm {
            agent: agent.role.clone(),
            source,
        })
}

fn final_answer(agent: &Agent, response: LlmResponse) -> Result<String, CrewError> {
    let text = response.text();
    if text.is_empty() {
        return Err(CrewError::Llm {
            agent: agent.role.clone(),
            source: LlmError::EmptyContent,
        });
    }
    Ok(text)
}

async fn run_tool(
    agent: &Agent,
    tools: &[Arc<dyn Tool>],
    call: ToolCall,
) -> Result<ContentBlock, CrewError> {
    let Some(tool) = tools.iter().find(|t| t.name() == call.name) else {
        warn!(agent = %agent.role, tool = %call.name, "Model requested an unavailable tool");
        let available = tools.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ");
        return Ok(ContentBlock::tool_result(
            call.id,
            format!(
                "Tool '{}' does not exist. Available tools: {}",
                call.name,
                if available.is_empty() { "none" } else { available.as_str() }
            ),
            true,
        ));
    };

    step!(agent, agent = %agent.role, tool = %call.name, "Using tool with input {}", call.input);

    match tool.invoke(&call.input).await {
        Ok(output) => {
            step!(agent, agent = %agent.role, tool = %call.name, "Tool returned {} chars", output.len());
            Ok(ContentBlock::tool_result(call.id, output, false))
        }
        Err(e) if e.is_recoverable() => {
            warn!(agent = %agent.role, tool = %call.name, "Tool input rejected: {e}");
            Ok(ContentBlock::tool_result(call.id, e.to_string(), true))
        }
        Err(source) => Err(CrewError::Tool {
            tool: call.name,
            source,
        }),
    }
}
