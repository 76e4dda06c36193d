//! Agent: a role definition: persona, goal, tools, delegation policy and
//! iteration budget, bound to the language model that drives it.

use std::fmt;
use std::sync::Arc;

use crate::crew::errors::CrewError;
use crate::crew::template::{interpolate, Inputs};
use crate::crew::tools::Tool;
use crate::llm_client::LanguageModel;

const DEFAULT_MAX_ITER: u32 = 10;

/// A role in the crew. Immutable once built; `render` yields a fresh copy with
/// placeholders in role, goal and backstory substituted.
#[derive(Clone)]
pub struct Agent {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub tools: Vec<Arc<dyn Tool>>,
    pub allow_delegation: bool,
    /// Roles this agent may hand work to. Only consulted when `allow_delegation` is set.
    pub delegates_to: Vec<String>,
    /// Model turns before the agent is forced to answer.
    pub max_iter: u32,
    /// Step traces log at info when set, at debug otherwise.
    pub verbose: bool,
    llm: Arc<dyn LanguageModel>,
}

impl Agent {
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            tools: Vec::new(),
            allow_delegation: false,
            delegates_to: Vec::new(),
            max_iter: DEFAULT_MAX_ITER,
            verbose: false,
            llm,
        }
    }

    pub fn with_tools(mut self, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.tools = tools;
        self
    }

    /// Enables delegation towards the named coworkers.
    pub fn delegating_to(mut self, coworkers: &[&str]) -> Self {
        self.allow_delegation = true;
        self.delegates_to = coworkers.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_max_iter(mut self, max_iter: u32) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn llm(&self) -> &dyn LanguageModel {
        self.llm.as_ref()
    }

    /// True when `name` refers to this agent's role (case and surrounding
    /// whitespace or quotes ignored).
    pub fn answers_to(&self, name: &str) -> bool {
        normalize_role(&self.role) == normalize_role(name)
    }

    /// True when this agent may hand work to `coworker`.
    pub fn may_delegate_to(&self, coworker: &Agent) -> bool {
        self.allow_delegation && self.delegates_to.iter().any(|name| coworker.answers_to(name))
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }

    pub fn render(&self, inputs: &Inputs) -> Result<Agent, CrewError> {
        Ok(Agent {
            role: interpolate(&self.role, inputs)?,
            goal: interpolate(&self.goal, inputs)?,
            backstory: interpolate(&self.backstory, inputs)?,
            ..self.clone()
        })
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("role", &self.role)
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name().to_string()).collect::<Vec<_>>(),
            )
            .field("allow_delegation", &self.allow_delegation)
            .field("delegates_to", &self.delegates_to)
            .field("max_iter", &self.max_iter)
            .finish()
    }
}

pub(crate) fn normalize_role(name: &str) -> String {
    name.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_lowercase()
}
