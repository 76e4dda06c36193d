use std::sync::Arc;

use crate::crew::{Agent, Tool};
use crate::llm_client::LanguageModel;
use crate::screening::prompts::{
    ANALYST_BACKSTORY, ANALYST_GOAL, ANALYST_ROLE, EVALUATOR_BACKSTORY, EVALUATOR_GOAL,
    EVALUATOR_ROLE, TRANSLATOR_BACKSTORY, TRANSLATOR_GOAL, TRANSLATOR_ROLE,
};

const ANALYST_MAX_ITER: u32 = 30;
const TRANSLATOR_MAX_ITER: u32 = 10;
const EVALUATOR_MAX_ITER: u32 = 10;

/// Builds the three screening roles in crew order: analyst, translator, evaluator.
///
/// Only the analyst gets the resume search tool, and only the analyst may
/// delegate (to the translator).
pub fn build_agents(llm: Arc<dyn LanguageModel>, resume_search: Arc<dyn Tool>) -> Vec<Agent> {
    let analyst = Agent::new(ANALYST_ROLE, ANALYST_GOAL, ANALYST_BACKSTORY, llm.clone())
        .with_tools(vec![resume_search])
        .delegating_to(&[TRANSLATOR_ROLE])
        .with_max_iter(ANALYST_MAX_ITER)
        .verbose(true);

    let translator = Agent::new(TRANSLATOR_ROLE, TRANSLATOR_GOAL, TRANSLATOR_BACKSTORY, llm.clone())
        .with_max_iter(TRANSLATOR_MAX_ITER)
        .verbose(true);

    let evaluator = Agent::new(EVALUATOR_ROLE, EVALUATOR_GOAL, EVALUATOR_BACKSTORY, llm)
        .with_max_iter(EVALUATOR_MAX_ITER)
        .verbose(false);

    vec![analyst, translator, evaluator]
}
