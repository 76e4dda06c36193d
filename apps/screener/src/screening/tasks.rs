use std::sync::Arc;

use crate::crew::{Task, Tool};
use crate::screening::prompts::{
    ANALYSIS_DESCRIPTION, ANALYSIS_EXPECTED_OUTPUT, ANALYST_ROLE, EVALUATION_DESCRIPTION,
    EVALUATION_EXPECTED_OUTPUT, EVALUATOR_ROLE, TRANSLATION_DESCRIPTION,
    TRANSLATION_EXPECTED_OUTPUT, TRANSLATOR_ROLE,
};

pub const ANALYSIS_TASK: &str = "analysis";
pub const TRANSLATION_TASK: &str = "translation";
pub const EVALUATION_TASK: &str = "evaluation";

/// Builds the screening tasks in execution order. Translation and evaluation
/// both read the analysis output.
pub fn build_tasks(resume_search: Arc<dyn Tool>) -> Vec<Task> {
    vec![
        Task::new(
            ANALYSIS_TASK,
            ANALYSIS_DESCRIPTION,
            ANALYSIS_EXPECTED_OUTPUT,
            ANALYST_ROLE,
        )
        .with_tools(vec![resume_search]),
        Task::new(
            TRANSLATION_TASK,
            TRANSLATION_DESCRIPTION,
            TRANSLATION_EXPECTED_OUTPUT,
            TRANSLATOR_ROLE,
        )
        .with_context(&[ANALYSIS_TASK]),
        Task::new(
            EVALUATION_TASK,
            EVALUATION_DESCRIPTION,
            EVALUATION_EXPECTED_OUTPUT,
            EVALUATOR_ROLE,
        )
        .with_context(&[ANALYSIS_TASK]),
    ]
}
