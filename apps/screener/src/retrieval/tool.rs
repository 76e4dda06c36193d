//! `search_resume` tool: passage lookup over the resume for the analyst.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::crew::{Tool, ToolError};
use crate::retrieval::DocumentSearch;

pub const SEARCH_RESUME_TOOL: &str = "search_resume";

const NO_MATCHES: &str = "No relevant passages found in the resume for this query.";

/// Searches the candidate's resume and returns the best-matching passages.
pub struct ResumeSearchTool {
    document: Arc<dyn DocumentSearch>,
    top_k: usize,
}

impl ResumeSearchTool {
    pub fn new(document: Arc<dyn DocumentSearch>, top_k: usize) -> Self {
        Self {
            document,
            top_k: top_k.max(1),
        }
    }
}

#[async_trait]
impl Tool for ResumeSearchTool {
    fn name(&self) -> &str {
        SEARCH_RESUME_TOOL
    }

    fn description(&self) -> String {
        "Search the candidate's resume for passages relevant to a query. \
         Use it to find evidence about experience, skills, education and languages."
            .to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "What to look for in the resume"}
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, input: &Value) -> Result<String, ToolError> {
        let query = input
            .get("query")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ToolError::InvalidInput("'query' must be a non-empty string".to_string()))?;

        let passages = self.document.search(query, self.top_k)?;
        debug!(query, hits = passages.len(), "Resume search");

        if passages.is_empty() {
            return Ok(NO_MATCHES.to_string());
        }

        Ok(passages
            .iter()
            .enumerate()
            .map(|(i, p)| format!("[{}] {}", i + 1, p.text))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }
}
