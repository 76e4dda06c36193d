// Resume screening: the three-role crew (analyst, translator, evaluator) bound
// to one uploaded resume, plus the HTTP surface, upload staging and the
// log-only verdict check.
// All LLM calls go through the crew, which goes through llm_client.

pub mod agents;
pub mod handlers;
pub mod language;
pub mod pipeline;
pub mod prompts;
pub mod staging;
pub mod tasks;
pub mod verdict;
