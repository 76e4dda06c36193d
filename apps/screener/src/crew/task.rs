//! Task: one unit of work: instruction template, expected-output contract,
//! assigned agent, task-level tools and upstream context.

use std::fmt;
use std::sync::Arc;

use crate::crew::errors::CrewError;
use crate::crew::prompts::{
    COMPLETE_ANSWER_INSTRUCTION, CONTEXT_HEADER, CONTEXT_SEPARATOR, EXPECTED_OUTPUT_HEADER,
};
use crate::crew::template::{interpolate, Inputs};
use crate::crew::tools::Tool;

#[derive(Clone)]
pub struct Task {
    /// Unique within a crew; other tasks name it in their context list.
    pub name: String,
    pub description: String,
    /// Shape and content the answer must have. Sent to the model, never validated.
    pub expected_output: String,
    /// Role of the agent that runs this task.
    pub agent: String,
    /// When non-empty, replaces the agent's own tools for this task.
    pub tools: Vec<Arc<dyn Tool>>,
    /// Earlier tasks whose outputs are appended to this task's prompt, in order.
    pub context: Vec<String>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent: agent.into(),
            tools: Vec::new(),
            context: Vec::new(),
        }
    }

    pub fn with_tools(mut self, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_context(mut self, tasks: &[&str]) -> Self {
        self.context = tasks.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Renders the full prompt: description, expected output, then the
    /// upstream outputs (in `context` order).
    pub fn render_prompt(&self, inputs: &Inputs, context: &[&str]) -> Result<String, CrewError> {
        let description = interpolate(&self.description, inputs)?;
        let expected_output = interpolate(&self.expected_output, inputs)?;

        let mut prompt = format!(
            "{description}\n\n{EXPECTED_OUTPUT_HEADER} {expected_output}\n{COMPLETE_ANSWER_INSTRUCTION}"
        );

        if !context.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(CONTEXT_HEADER);
            prompt.push('\n');
            prompt.push_str(&context.join(CONTEXT_SEPARATOR));
        }

        Ok(prompt)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("agent", &self.agent)
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name().to_string()).collect::<Vec<_>>(),
            )
            .field("context", &self.context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_inputs() -> Inputs {
        [("requirements".to_string(), "5 years Python".to_string())]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_prompt_without_context() {
        let task = Task::new(
            "analysis",
            "Analyse the resume against {requirements}.",
            "A list of requirements with verdicts.",
            "Analyst",
        );
        let prompt = task.render_prompt(&make_inputs(), &[]).unwrap();

        assert!(prompt.starts_with("Analyse the resume against 5 years Python."));
        assert!(prompt.contains(
            "This is the expected criteria for your final answer: A list of requirements with verdicts."
        ));
        assert!(!prompt.contains(CONTEXT_HEADER));
    }

    #[test]
    fn test_prompt_appends_context_in_order() {
        let task = Task::new("evaluation", "Decide.", "Cumple or No cumple.", "Evaluator")
            .with_context(&["analysis", "translation"]);
        let prompt = task
            .render_prompt(&make_inputs(), &["first output", "second output"])
            .unwrap();

        let header = prompt.find(CONTEXT_HEADER).unwrap();
        let first = prompt.find("first output").unwrap();
        let second = prompt.find("second output").unwrap();
        assert!(header < first && first < second);
        assert!(prompt.contains("first output\n\n----------\n\nsecond output"));
    }

    #[test]
    fn test_expected_output_placeholders_are_rendered() {
        let task = Task::new("t", "Do it.", "Compare against {requirements}.", "Analyst");
        let prompt = task.render_prompt(&make_inputs(), &[]).unwrap();
        assert!(prompt.contains("Compare against 5 years Python."));
    }

    #[test]
    fn test_missing_input_fails_render() {
        let task = Task::new("t", "Answer in {language}.", "Text.", "Analyst");
        assert!(matches!(
            task.render_prompt(&make_inputs(), &[]),
            Err(CrewError::MissingInput(_))
        ));
    }
}
