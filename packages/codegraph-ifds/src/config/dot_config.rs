//! Label and style strings for exploded-supergraph DOT output

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotConfig {
    pub graph_name: String,
    pub font: String,
    /// Attributes of statement (row header) nodes
    pub statement_node_style: String,
    /// Attributes of (statement, fact) nodes
    pub fact_node_style: String,
    /// Attributes of the zero fact's nodes
    pub zero_fact_node_style: String,
    /// Attributes of intraprocedural fact edges
    pub intra_edge_style: String,
    /// Attributes of call, return and summary edges
    pub inter_edge_style: String,
    /// Attributes of the control-flow edges between statement nodes
    pub cfg_edge_style: String,
    /// Label used in place of the zero fact's debug text
    pub zero_fact_label: String,
    /// Print edge functions on fact edges when they were recorded
    pub show_edge_functions: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            graph_name: "ESG".to_string(),
            font: "Courier".to_string(),
            statement_node_style: "shape=box, style=filled, fillcolor=lightgrey".to_string(),
            fact_node_style: "shape=ellipse".to_string(),
            zero_fact_node_style: "shape=ellipse, style=filled, fillcolor=lightblue".to_string(),
            intra_edge_style: "style=dotted".to_string(),
            inter_edge_style: "style=dashed, weight=0.1".to_string(),
            cfg_edge_style: "style=bold".to_string(),
            zero_fact_label: "Λ".to_string(),
            show_edge_functions: true,
        }
    }
}

impl Validatable for DotConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.graph_name.trim().is_empty() {
            return Err(ConfigError::invalid("graph_name", "must not be empty"));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "DotConfig"
    }
}
