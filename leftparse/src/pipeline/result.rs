use crate::logging::codes;
use crate::tokens::TokenStream;
use crate::tree::Tree;
use std::time::Duration;

/// Everything one run produced, stage by stage
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub tokens: TokenStream,
    /// Oracle input: one terminal index per token
    pub terminal_indices: Vec<u32>,
    /// Oracle output: production indices in preorder
    pub derivation: Vec<u32>,
    pub tree: Tree,
    pub duration: Duration,
}

impl PipelineResult {
    pub fn log_success(&self, input_name: &str) {
        crate::log_success!(
            codes::success::PIPELINE_COMPLETE,
            "Parse pipeline succeeded",
            "input" => input_name,
            "tokens" => self.tokens.len(),
            "productions" => self.derivation.len(),
            "nodes" => self.tree.node_count(),
            "duration_ms" => format!("{:.2}", self.duration.as_secs_f64() * 1000.0)
        );
    }
}
