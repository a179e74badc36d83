// Flame-graph reduction of a profile tree. The walk uses an explicit work list since
// profiled call stacks can be arbitrarily deep.

use serde::Serialize;
use tracing::warn;

use crate::models::ProfileTree;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlameGraphNode {
    /// Frame label; empty for the synthetic root and the wrapper node.
    pub name: String,
    /// Samples in this frame itself.
    pub sv_unique: u64,
    /// Samples in this frame and everything it called.
    pub sv_total: u64,
    /// Indexes into `FlameGraph::nodes`, in profile order. Serialized as a plain index
    /// list, not a map keyed by label.
    pub sv_children: Vec<usize>,
}

/// Flat, index-addressed flame graph. Node 0 is a wrapper with no self samples whose
/// only child is the selected root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlameGraph {
    pub nodes: Vec<FlameGraphNode>,
}

impl FlameGraph {
    pub const ROOT: usize = 0;

    pub fn root(&self) -> &FlameGraphNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, index: usize) -> &FlameGraphNode {
        &self.nodes[index]
    }

    pub fn total_samples(&self) -> u64 {
        self.root().sv_total
    }

    pub fn is_empty(&self) -> bool {
        self.total_samples() == 0
    }

    /// Finds the child of `parent` with the given frame label.
    pub fn child(&self, parent: usize, name: &str) -> Option<usize> {
        self.nodes[parent]
            .sv_children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].name == name)
    }
}

/// Skips the chain of single-child frames at the top of the profile (thread entry
/// points and the like). Falls back to the real root if that chain is the whole tree.
pub fn interesting_root(tree: &ProfileTree) -> usize {
    let mut index = ProfileTree::ROOT;
    while let [only_child] = tree.node(index).child_nodes.as_slice() {
        index = *only_child;
    }
    let node = tree.node(index);
    if node.sample_count == 0 || node.child_nodes.is_empty() {
        // only a single branch through the entire tree
        return ProfileTree::ROOT;
    }
    index
}

pub fn reduce_flame_graph(tree: &ProfileTree) -> FlameGraph {
    let start = interesting_root(tree);
    let mut nodes = vec![FlameGraphNode {
        name: String::new(),
        sv_unique: 0,
        sv_total: tree.node(start).sample_count,
        sv_children: Vec::new(),
    }];
    let mut clamped = 0usize;
    let mut work: Vec<(usize, usize)> = vec![(start, FlameGraph::ROOT)];

    while let Some((profile_index, parent)) = work.pop() {
        let profile_node = tree.node(profile_index);
        let sv_unique = tree.self_samples(profile_index).unwrap_or_else(|| {
            clamped += 1;
            0
        });
        let index = nodes.len();
        nodes.push(FlameGraphNode {
            name: profile_node.frame_label.clone().unwrap_or_default(),
            sv_unique,
            sv_total: profile_node.sample_count,
            sv_children: Vec::new(),
        });
        nodes[parent].sv_children.push(index);
        // reversed so children pop, and therefore appear, in profile order
        work.extend(profile_node.child_nodes.iter().rev().map(|&c| (c, index)));
    }

    if clamped > 0 {
        warn!(
            clamped_frames = clamped,
            "profile children exceed their parent's sample count; self samples clamped to zero"
        );
    }
    FlameGraph { nodes }
}
