// Call-tree profile stored as an index arena so arbitrarily deep stacks never recurse.

use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileNode {
    /// `None` only for the synthetic root.
    pub frame_label: Option<String>,
    pub sample_count: u64,
    /// Arena indexes, in first-seen order.
    pub child_nodes: Vec<usize>,
    #[serde(skip)]
    child_by_label: HashMap<String, usize>,
}

impl ProfileNode {
    fn new(frame_label: Option<String>) -> Self {
        Self {
            frame_label,
            sample_count: 0,
            child_nodes: Vec::new(),
            child_by_label: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileTree {
    nodes: Vec<ProfileNode>,
}

impl Default for ProfileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileTree {
    pub const ROOT: usize = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![ProfileNode::new(None)],
        }
    }

    pub fn node(&self, index: usize) -> &ProfileNode {
        &self.nodes[index]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn sample_count(&self) -> u64 {
        self.nodes[Self::ROOT].sample_count
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count() == 0
    }

    /// Returns the child of `parent` labelled `frame_label`, creating it if needed.
    pub fn child(&mut self, parent: usize, frame_label: &str) -> usize {
        if let Some(&existing) = self.nodes[parent].child_by_label.get(frame_label) {
            return existing;
        }
        let index = self.nodes.len();
        self.nodes
            .push(ProfileNode::new(Some(frame_label.to_owned())));
        let parent_node = &mut self.nodes[parent];
        parent_node.child_nodes.push(index);
        parent_node
            .child_by_label
            .insert(frame_label.to_owned(), index);
        index
    }

    pub fn add_samples(&mut self, index: usize, count: u64) {
        let node = &mut self.nodes[index];
        node.sample_count = node.sample_count.saturating_add(count);
    }

    /// Merges one sampled stack (outermost frame first) into the tree, crediting
    /// `count` samples to the root and to every frame on the path.
    pub fn add_stack<S: AsRef<str>>(&mut self, frames: &[S], count: u64) {
        self.add_samples(Self::ROOT, count);
        let mut current = Self::ROOT;
        for frame in frames {
            current = self.child(current, frame.as_ref());
            self.add_samples(current, count);
        }
    }

    /// Sample count minus the children's sample counts; `None` if children exceed the parent.
    pub fn self_samples(&self, index: usize) -> Option<u64> {
        let node = &self.nodes[index];
        let nested = node
            .child_nodes
            .iter()
            .map(|&c| self.nodes[c].sample_count)
            .fold(0, u64::saturating_add);
        node.sample_count.checked_sub(nested)
    }

    /// Copy of the tree without the frames seen fewer than `min_samples` times, and
    /// without anything below them. Kept frames keep their counts, so pruned samples
    /// show up as self samples of the nearest kept caller.
    pub fn truncate_leafs(&self, min_samples: u64) -> ProfileTree {
        let mut out = ProfileTree::new();
        out.add_samples(Self::ROOT, self.sample_count());
        let mut stack = vec![(Self::ROOT, Self::ROOT)];
        while let Some((index, out_index)) = stack.pop() {
            for &c in &self.nodes[index].child_nodes {
                let child = &self.nodes[c];
                if child.sample_count < min_samples {
                    continue;
                }
                let label = child.frame_label.as_deref().unwrap_or_default();
                let out_child = out.child(out_index, label);
                out.add_samples(out_child, child.sample_count);
                stack.push((c, out_child));
            }
        }
        out
    }
}
