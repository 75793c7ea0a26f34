use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de::{null_as_default, opt_text};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FormulationComponent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "opt_text")]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub concentration: Option<f64>,
    #[serde(default, deserialize_with = "opt_text")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExperimentPlan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub plan_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "opt_text")]
    pub estimated_cost: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub estimated_time: Option<String>,
    /// In `[0, 1]`. Drives the visual tier only, never ordering.
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority_score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub formulation: Vec<FormulationComponent>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rationale: String,
    #[serde(default, deserialize_with = "opt_text")]
    pub llm_rationale: Option<String>,
    #[serde(default)]
    pub prediction_confidence: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub predicted_performance: BTreeMap<String, Option<Value>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experimental_steps: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub safety_considerations: Vec<String>,
}
