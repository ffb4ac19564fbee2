use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::conditions::DisplayCondition;
use super::domain::CheckoutContext;

/// How a composite combines its member conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionLogic {
    #[default]
    And,
    Or,
}

impl ConditionLogic {
    pub const fn label(self) -> &'static str {
        match self {
            ConditionLogic::And => "AND",
            ConditionLogic::Or => "OR",
        }
    }
}

impl fmt::Display for ConditionLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised for any logic mode outside `AND`/`OR`.
///
/// An unrecognized mode is a configuration mistake and must be reported, not
/// coerced to a default.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized condition logic '{0}': expected AND or OR")]
pub struct ParseConditionLogicError(pub String);

impl FromStr for ConditionLogic {
    type Err = ParseConditionLogicError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(ConditionLogic::And),
            "OR" => Ok(ConditionLogic::Or),
            _ => Err(ParseConditionLogicError(value.to_string())),
        }
    }
}

/// A flat set of conditions evaluated as one unit under a single logic mode.
///
/// Members are shared, not owned; the composite lives for one admission check
/// and is discarded afterwards. Evaluation walks members in insertion order.
///
/// The empty composite is defined explicitly: `AND` over zero members is
/// satisfied (no restrictions configured means always admit), `OR` over zero
/// members is not (no condition can be satisfied).
#[derive(Default)]
pub struct CompositeCondition {
    conditions: Vec<Arc<dyn DisplayCondition>>,
    logic: ConditionLogic,
}

impl CompositeCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logic(logic: ConditionLogic) -> Self {
        Self {
            conditions: Vec::new(),
            logic,
        }
    }

    pub fn add_condition(&mut self, condition: Arc<dyn DisplayCondition>) {
        self.conditions.push(condition);
    }

    /// Appends all given conditions, keeping existing members. No-op on empty
    /// input.
    pub fn add_conditions<I>(&mut self, conditions: I)
    where
        I: IntoIterator<Item = Arc<dyn DisplayCondition>>,
    {
        self.conditions.extend(conditions);
    }

    pub fn set_logic(&mut self, logic: ConditionLogic) {
        self.logic = logic;
    }

    pub fn logic(&self) -> ConditionLogic {
        self.logic
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn is_satisfied(&self, context: &CheckoutContext) -> bool {
        match self.logic {
            ConditionLogic::And => self
                .conditions
                .iter()
                .all(|condition| condition.is_satisfied(context)),
            ConditionLogic::Or => self
                .conditions
                .iter()
                .any(|condition| condition.is_satisfied(context)),
        }
    }
}
