// Prompt fragments used by the crew runtime itself.
// Role- and task-specific text lives with the pipeline that defines them.
// Fragments are joined with format! rather than placeholder replacement: rendered
// role and task text may carry user input that must not be rescanned.

/// Introduces the expected-output contract after a task description.
pub const EXPECTED_OUTPUT_HEADER: &str = "This is the expected criteria for your final answer:";

pub const COMPLETE_ANSWER_INSTRUCTION: &str =
    "You MUST return the actual complete content as the final answer, not a summary.";

/// Header placed before upstream task outputs in a task prompt.
pub const CONTEXT_HEADER: &str = "This is the context you're working with:";

/// Separator between upstream task outputs.
pub const CONTEXT_SEPARATOR: &str = "\n\n----------\n\n";

/// Sent once the iteration budget is spent; tool use is disabled for the reply.
pub const FORCE_FINAL_ANSWER: &str = "You have reached the maximum number of reasoning steps. \
Stop using tools and give your best final answer now, based only on what you have gathered so far.";

pub const DELEGATE_WORK_DESCRIPTION: &str = "Delegate a specific task to a coworker. \
Name the coworker, describe the task precisely and include ALL the context \
the coworker needs, because they know nothing about your work beyond what you send. Coworkers:";

pub const ASK_QUESTION_DESCRIPTION: &str = "Ask a specific question to a coworker. \
Name the coworker, state the question and include ALL the context \
the coworker needs, because they know nothing about your work beyond what you send. Coworkers:";
