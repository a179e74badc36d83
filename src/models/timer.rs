// Timer call-tree: one synthetic root, then real root timers, then nested timers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerNode {
    /// `None` only for the synthetic root.
    #[serde(default)]
    pub name: Option<String>,
    /// Inclusive of all descendants.
    pub total_duration_micros: u64,
    #[serde(default)]
    pub child_nodes: Vec<TimerNode>,
}

impl TimerNode {
    pub fn synthetic_root(child_nodes: Vec<TimerNode>) -> Self {
        let total_duration_micros = child_nodes
            .iter()
            .map(|c| c.total_duration_micros)
            .fold(0, u64::saturating_add);
        Self {
            name: None,
            total_duration_micros,
            child_nodes,
        }
    }

    pub fn named(
        name: impl Into<String>,
        total_duration_micros: u64,
        child_nodes: Vec<TimerNode>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            total_duration_micros,
            child_nodes,
        }
    }

    pub fn leaf(name: impl Into<String>, total_duration_micros: u64) -> Self {
        Self::named(name, total_duration_micros, Vec::new())
    }

    pub fn nested_micros(&self) -> u64 {
        self.child_nodes
            .iter()
            .map(|c| c.total_duration_micros)
            .fold(0, u64::saturating_add)
    }

    /// Time spent in this timer but not in any nested timer. `None` when the children
    /// add up to more than the node itself (inconsistent upstream totals).
    pub fn self_micros(&self) -> Option<u64> {
        self.total_duration_micros.checked_sub(self.nested_micros())
    }

    pub fn find_child(&self, name: &str) -> Option<&TimerNode> {
        self.child_nodes
            .iter()
            .find(|c| c.name.as_deref() == Some(name))
    }
}
