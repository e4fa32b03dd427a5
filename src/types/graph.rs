//! Intent graph types returned by parse endpoints.

use serde::{Deserialize, Serialize};

use crate::errors::{XeroMlError, XeroMlResult};

/// Current schema version of the intent graph.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// How close the user is to acting on their goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionReadiness {
    /// Still exploring options.
    Exploring,
    /// Choosing between options.
    Deciding,
    /// Ready to act.
    Executing,
}

/// How ambiguous the expressed intent is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityLevel {
    /// Unambiguous.
    Clear,
    /// Partly specified.
    Partial,
    /// Contradictory signals.
    Conflicting,
}

/// Sensitivity of the goal to mistakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSensitivity {
    /// Low risk.
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
}

/// Breadth of the expressed intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentScope {
    /// A single goal.
    Single,
    /// Several goals at once.
    Compound,
    /// A sequence of dependent steps.
    MultiStep,
}

/// Latent user states inferred by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatentStates {
    /// Free-form label for the underlying intent.
    pub goal_intent: String,
    /// Action readiness.
    pub action_readiness: ActionReadiness,
    /// Ambiguity level.
    pub ambiguity_level: AmbiguityLevel,
    /// Risk sensitivity.
    pub risk_sensitivity: RiskSensitivity,
    /// Intent scope.
    pub intent_scope: IntentScope,
}

/// Metadata attached to an intent graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentMeta {
    /// Origin of the intent.
    #[serde(default = "default_source")]
    pub source: String,
    /// Parser confidence in `[0, 1]`.
    pub confidence: f64,
    /// Prior clarification exchanges.
    #[serde(default)]
    pub negotiation_history: Vec<String>,
    /// Inferred latent states.
    pub latent_states: LatentStates,
}

fn default_source() -> String {
    "user_input".to_string()
}

/// Lifecycle status of a sub-goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubGoalStatus {
    /// Not started.
    #[default]
    Pending,
    /// In progress.
    Active,
    /// Completed.
    Done,
    /// Waiting on something else.
    Blocked,
    /// Dropped by the user.
    Abandoned,
    /// Tracked but not in focus.
    Background,
}

/// A node of the intent graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubGoal {
    /// Sub-goal identifier.
    pub id: String,
    /// Goal description.
    pub goal: String,
    /// Status.
    #[serde(default)]
    pub status: SubGoalStatus,
    /// Priority in `[0, 1]`.
    pub priority: f64,
    /// Conditions that mark the goal done.
    #[serde(default)]
    pub success_criteria: Vec<String>,
    /// Constraints on how the goal may be achieved.
    #[serde(default)]
    pub constraints: Vec<String>,
    /// Uncertainty in `[0, 1]`.
    #[serde(default = "default_uncertainty")]
    pub uncertainty: f64,
    /// Context the goal needs.
    #[serde(default)]
    pub context_requirements: Vec<String>,
    /// Expected output modality.
    #[serde(default = "default_modality")]
    pub modality: String,
    /// Ids of sub-goals this one depends on.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Nested sub-goals.
    #[serde(default)]
    pub children: Vec<SubGoal>,
}

fn default_uncertainty() -> f64 {
    0.5
}

fn default_modality() -> String {
    "text".to_string()
}

impl SubGoal {
    /// Iterates over this sub-goal and all descendants, depth first.
    pub fn iter(&self) -> impl Iterator<Item = &SubGoal> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }

    fn validate(&self) -> XeroMlResult<()> {
        for node in self.iter() {
            check_unit_range(&format!("sub_goals[{}].priority", node.id), node.priority)?;
            check_unit_range(&format!("sub_goals[{}].uncertainty", node.id), node.uncertainty)?;
        }
        Ok(())
    }
}

/// Structured intent extracted from a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentGraph {
    /// Schema version.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Top-level goal.
    pub root_goal: String,
    /// Direct sub-goals.
    pub sub_goals: Vec<SubGoal>,
    /// Graph metadata.
    pub meta: IntentMeta,
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl IntentGraph {
    /// Checks the numeric ranges the schema requires.
    pub fn validate(&self) -> XeroMlResult<()> {
        check_unit_range("meta.confidence", self.meta.confidence)?;
        self.sub_goals.iter().try_for_each(SubGoal::validate)
    }

    /// Finds a sub-goal anywhere in the graph by id.
    pub fn find(&self, id: &str) -> Option<&SubGoal> {
        self.sub_goals
            .iter()
            .flat_map(|goal| goal.iter())
            .find(|goal| goal.id == id)
    }

    /// Counts all sub-goals, nested ones included.
    pub fn sub_goal_count(&self) -> usize {
        self.sub_goals.iter().map(|goal| goal.iter().count()).sum()
    }
}

fn check_unit_range(field: &str, value: f64) -> XeroMlResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(XeroMlError::validation_param(
            format!("{} must be between 0 and 1, got {}", field, value),
            field,
        ))
    }
}

/// Envelope returned by `/v1/parse`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResponse {
    /// The parsed graph.
    pub graph: IntentGraph,
    /// Session the parse belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Server request id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Server-side latency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// A graph payload in either envelope or bare form.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum GraphPayload {
    Envelope(ParseResponse),
    Bare(IntentGraph),
}

impl GraphPayload {
    pub(crate) fn into_response(self) -> ParseResponse {
        match self {
            GraphPayload::Envelope(response) => response,
            GraphPayload::Bare(graph) => ParseResponse {
                graph,
                session_id: None,
                request_id: None,
                latency_ms: None,
            },
        }
    }
}
