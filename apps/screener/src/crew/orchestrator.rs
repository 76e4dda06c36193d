//! Crew: composes agents and tasks into one ordered pipeline and runs it.
//!
//! Tasks run strictly one after another in list order. `Crew::new` rejects any
//! task whose context names a task that does not come earlier, so every
//! upstream output exists before a task starts and cycles cannot occur.
//! Nothing is kept between `kickoff` calls.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::crew::agent::{normalize_role, Agent};
use crate::crew::errors::CrewError;
use crate::crew::executor::execute_agent;
use crate::crew::task::Task;
use crate::crew::template::Inputs;
use crate::crew::tools::{delegation_tools, Tool};

/// Final output of one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskOutput {
    pub task: String,
    pub agent: String,
    pub raw: String,
}

/// Outputs of a completed run, in task order. Only built when every task succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct CrewOutput {
    pub tasks_output: Vec<TaskOutput>,
}

impl CrewOutput {
    pub fn get(&self, task: &str) -> Option<&TaskOutput> {
        self.tasks_output.iter().find(|o| o.task == task)
    }

    /// Raw text of `task`, or an error if the task never ran.
    pub fn raw(&self, task: &str) -> Result<&str, CrewError> {
        self.get(task)
            .map(|o| o.raw.as_str())
            .ok_or_else(|| CrewError::MissingOutput(task.to_string()))
    }
}

/// Write-once output slots for one run.
#[derive(Default)]
struct OutputSlots {
    outputs: Vec<TaskOutput>,
}

impl OutputSlots {
    fn get(&self, task: &str) -> Result<&str, CrewError> {
        self.outputs
            .iter()
            .find(|o| o.task == task)
            .map(|o| o.raw.as_str())
            .ok_or_else(|| CrewError::MissingOutput(task.to_string()))
    }

    fn record(&mut self, output: TaskOutput) -> Result<(), CrewError> {
        if self.outputs.iter().any(|o| o.task == output.task) {
            return Err(CrewError::OutputAlreadySet(output.task));
        }
        self.outputs.push(output);
        Ok(())
    }
}

#[derive(Debug)]
pub struct Crew {
    agents: Vec<Agent>,
    tasks: Vec<Task>,
}

impl Crew {
    /// Validates the pipeline shape: unique names, known agents, context that
    /// only points backwards, and delegation lists naming crew members.
    pub fn new(agents: Vec<Agent>, tasks: Vec<Task>) -> Result<Self, CrewError> {
        let mut roles = HashSet::new();
        for agent in &agents {
            if !roles.insert(normalize_role(&agent.role)) {
                return Err(CrewError::DuplicateAgent(agent.role.clone()));
            }
        }

        for agent in agents.iter().filter(|a| a.allow_delegation) {
            for coworker in &agent.delegates_to {
                let reachable = agents
                    .iter()
                    .any(|other| other.answers_to(coworker) && !agent.answers_to(coworker));
                if !reachable {
                    return Err(CrewError::UnknownCoworker {
                        agent: agent.role.clone(),
                        coworker: coworker.clone(),
                    });
                }
            }
        }

        let mut seen = HashSet::new();
        for task in &tasks {
            if !roles.contains(&normalize_role(&task.agent)) {
                return Err(CrewError::UnknownAgent {
                    task: task.name.clone(),
                    agent: task.agent.clone(),
                });
            }
            for dependency in &task.context {
                if !seen.contains(dependency.as_str()) {
                    return Err(CrewError::InvalidContext {
                        task: task.name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
            if !seen.insert(task.name.as_str()) {
                return Err(CrewError::DuplicateTask(task.name.clone()));
            }
        }

        Ok(Self { agents, tasks })
    }

    /// Runs every task in order with `inputs` substituted into all agent and
    /// task templates. The first failure aborts the run and nothing is returned.
    pub async fn kickoff(&self, inputs: &Inputs) -> Result<CrewOutput, CrewError> {
        let agents = self.render_agents(inputs)?;
        let mut slots = OutputSlots::default();

        for (position, task) in self.tasks.iter().enumerate() {
            let agent = agents
                .get(&normalize_role(&task.agent))
                .ok_or_else(|| CrewError::UnknownAgent {
                    task: task.name.clone(),
                    agent: task.agent.clone(),
                })?;

            let context = task
                .context
                .iter()
                .map(|name| slots.get(name))
                .collect::<Result<Vec<_>, _>>()?;
            let prompt = task.render_prompt(inputs, &context)?;
            let tools = self.toolset(task, agent, &agents);

            info!(
                task = %task.name,
                agent = %agent.role,
                step = position + 1,
                of = self.tasks.len(),
                tools = tools.len(),
                "Starting task"
            );

            let raw = execute_agent(agent, &prompt, &tools).await?;

            info!(task = %task.name, chars = raw.len(), "Task completed");

            slots.record(TaskOutput {
                task: task.name.clone(),
                agent: agent.role.clone(),
                raw,
            })?;
        }

        Ok(CrewOutput {
            tasks_output: slots.outputs,
        })
    }

    fn render_agents(&self, inputs: &Inputs) -> Result<HashMap<String, Arc<Agent>>, CrewError> {
        self.agents
            .iter()
            .map(|agent| {
                Ok((normalize_role(&agent.role), Arc::new(agent.render(inputs)?)))
            })
            .collect()
    }

    /// Task tools replace the agent's own when present; delegation tools are
    /// added for agents allowed to delegate.
    fn toolset(
        &self,
        task: &Task,
        agent: &Arc<Agent>,
        agents: &HashMap<String, Arc<Agent>>,
    ) -> Vec<Arc<dyn Tool>> {
        let mut tools = if task.tools.is_empty() {
            agent.tools.clone()
        } else {
            task.tools.clone()
        };

        if agent.allow_delegation {
            // Crew order keeps the coworker list stable across runs.
            let coworkers = self
                .agents
                .iter()
                .filter_map(|a| agents.get(&normalize_role(&a.role)))
                .filter(|other| !Arc::ptr_eq(other, agent) && agent.may_delegate_to(other))
                .cloned()
                .collect();
            tools.extend(delegation_tools(agent, coworkers));
        }

        tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crew::testing::{text_response, tool_use_response, EchoTool, ScriptedModel};
    use serde_json::json;

    fn make_agent(role: &str, model: Arc<ScriptedModel>) -> Agent {
        Agent::new(role, "Goal of {topic}", "Backstory.", model)
    }

    fn make_inputs() -> Inputs {
        [("topic".to_string(), "hiring".to_string())]
            .into_iter()
            .collect()
    }

    /// Replies with the role name and the turn count so outputs are traceable.
    fn role_echo_model() -> Arc<ScriptedModel> {
        ScriptedModel::new(|request| {
            let role = request
                .system
                .trim_start_matches("You are ")
                .split('.')
                .next()
                .unwrap_or_default()
                .to_string();
            Ok(text_response(&format!("output of {role}")))
        })
    }

    #[test]
    fn test_context_must_point_backwards() {
        let model = ScriptedModel::always_text("x");
        let err = Crew::new(
            vec![make_agent("A", model)],
            vec![
                Task::new("first", "d", "e", "A").with_context(&["second"]),
                Task::new("second", "d", "e", "A"),
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CrewError::InvalidContext { ref task, ref dependency } if task == "first" && dependency == "second"
        ));
    }

    #[test]
    fn test_self_context_is_rejected() {
        let model = ScriptedModel::always_text("x");
        let err = Crew::new(
            vec![make_agent("A", model)],
            vec![Task::new("loop", "d", "e", "A").with_context(&["loop"])],
        )
        .unwrap_err();
        assert!(matches!(err, CrewError::InvalidContext { .. }));
    }

    #[test]
    fn test_unknown_agent_is_rejected() {
        let err = Crew::new(
            vec![make_agent("A", ScriptedModel::always_text("x"))],
            vec![Task::new("t", "d", "e", "B")],
        )
        .unwrap_err();
        assert!(matches!(err, CrewError::UnknownAgent { .. }));
    }

    #[test]
    fn test_duplicate_task_is_rejected() {
        let err = Crew::new(
            vec![make_agent("A", ScriptedModel::always_text("x"))],
            vec![Task::new("t", "d", "e", "A"), Task::new("t", "d", "e", "A")],
        )
        .unwrap_err();
        assert!(matches!(err, CrewError::DuplicateTask(name) if name == "t"));
    }

    #[test]
    fn test_delegation_to_absent_role_is_rejected() {
        let model = ScriptedModel::always_text("x");
        let err = Crew::new(
            vec![make_agent("A", model).delegating_to(&["Ghost"])],
            vec![Task::new("t", "d", "e", "A")],
        )
        .unwrap_err();
        assert!(matches!(err, CrewError::UnknownCoworker { .. }));
    }

    #[test]
    fn test_self_delegation_is_rejected() {
        let model = ScriptedModel::always_text("x");
        let err = Crew::new(
            vec![make_agent("A", model).delegating_to(&["a"])],
            vec![Task::new("t", "d", "e", "A")],
        )
        .unwrap_err();
        assert!(matches!(err, CrewError::UnknownCoworker { .. }));
    }

    #[tokio::test]
    async fn test_kickoff_runs_in_order_and_passes_context() {
        let model = role_echo_model();
        let crew = Crew::new(
            vec![make_agent("A", model.clone()), make_agent("B", model.clone())],
            vec![
                Task::new("first", "First about {topic}.", "text", "A"),
                Task::new("second", "Second.", "text", "B").with_context(&["first"]),
            ],
        )
        .unwrap();

        let output = crew.kickoff(&make_inputs()).await.unwrap();

        assert_eq!(output.raw("first").unwrap(), "output of A");
        assert_eq!(output.raw("second").unwrap(), "output of B");
        assert_eq!(output.tasks_output[0].task, "first");

        let calls = model.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].messages[0].text().starts_with("First about hiring."));
        assert!(calls[0].system.ends_with("Goal of hiring"));
        assert!(calls[1].messages[0].text().contains("output of A"));
    }

    #[tokio::test]
    async fn test_task_tools_override_agent_tools() {
        let model = ScriptedModel::always_text("done");
        let agent = make_agent("A", model.clone()).with_tools(vec![Arc::new(EchoTool)]);
        let crew = Crew::new(
            vec![agent],
            vec![
                Task::new("with_agent_tools", "d", "e", "A"),
                Task::new("no_override", "d", "e", "A"),
            ],
        )
        .unwrap();
        crew.kickoff(&make_inputs()).await.unwrap();

        for call in model.calls() {
            assert_eq!(call.tools.len(), 1);
            assert_eq!(call.tools[0].name, "echo");
        }
    }

    #[tokio::test]
    async fn test_delegation_tools_only_for_delegating_agent() {
        let model = ScriptedModel::always_text("done");
        let crew = Crew::new(
            vec![
                make_agent("Lead", model.clone()).delegating_to(&["Helper"]),
                make_agent("Helper", model.clone()),
            ],
            vec![
                Task::new("lead_task", "d", "e", "Lead"),
                Task::new("helper_task", "d", "e", "Helper"),
            ],
        )
        .unwrap();
        crew.kickoff(&make_inputs()).await.unwrap();

        let calls = model.calls();
        let lead_tools: Vec<_> = calls[0].tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(lead_tools, vec!["delegate_work", "ask_question"]);
        assert!(calls[1].tools.is_empty());
    }

    #[tokio::test]
    async fn test_delegated_coworker_runs_inside_task() {
        let model = ScriptedModel::new(|request| {
            if request.system.starts_with("You are Helper") {
                return Ok(text_response("helper answer"));
            }
            if request.messages.len() == 1 {
                Ok(tool_use_response(
                    "toolu_1",
                    "delegate_work",
                    json!({"task": "help", "context": "ctx", "coworker": "Helper"}),
                ))
            } else {
                Ok(text_response("lead final"))
            }
        });
        let crew = Crew::new(
            vec![
                make_agent("Lead", model.clone()).delegating_to(&["Helper"]),
                make_agent("Helper", model.clone()),
            ],
            vec![Task::new("lead_task", "d", "e", "Lead")],
        )
        .unwrap();

        let output = crew.kickoff(&make_inputs()).await.unwrap();
        assert_eq!(output.raw("lead_task").unwrap(), "lead final");

        let systems: Vec<_> = model
            .calls()
            .iter()
            .map(|c| c.system.split('.').next().unwrap_or_default().to_string())
            .collect();
        assert_eq!(systems, vec!["You are Lead", "You are Helper", "You are Lead"]);
    }

    #[tokio::test]
    async fn test_failure_returns_no_partial_output() {
        let good = ScriptedModel::always_text("fine");
        let crew = Crew::new(
            vec![make_agent("A", good), make_agent("B", ScriptedModel::failing())],
            vec![
                Task::new("first", "d", "e", "A"),
                Task::new("second", "d", "e", "B").with_context(&["first"]),
            ],
        )
        .unwrap();

        let err = crew.kickoff(&make_inputs()).await.unwrap_err();
        assert!(matches!(err, CrewError::Llm { ref agent, .. } if agent == "B"));
    }

    #[test]
    fn test_output_slots_are_write_once() {
        let mut slots = OutputSlots::default();
        let output = TaskOutput {
            task: "analysis".to_string(),
            agent: "Analyst".to_string(),
            raw: "first".to_string(),
        };
        slots.record(output.clone()).unwrap();
        let err = slots
            .record(TaskOutput {
                raw: "second".to_string(),
                ..output
            })
            .unwrap_err();

        assert!(matches!(err, CrewError::OutputAlreadySet(_)));
        assert_eq!(slots.get("analysis").unwrap(), "first");
    }

    #[tokio::test]
    async fn test_missing_input_fails_before_any_model_call() {
        let model = ScriptedModel::always_text("x");
        let crew = Crew::new(
            vec![make_agent("A", model.clone())],
            vec![Task::new("t", "d", "e", "A")],
        )
        .unwrap();

        let err = crew.kickoff(&Inputs::new()).await.unwrap_err();
        assert!(matches!(err, CrewError::MissingInput(key) if key == "topic"));
        assert!(model.calls().is_empty());
    }
}
