// Weighted-sum merge of timer trees. Nodes are matched by path from the root and by
// name at each level; the walk uses an explicit stack over an index arena.

use std::collections::HashMap;

use tracing::warn;

use crate::models::TimerNode;

/// Child key: sibling name plus how many earlier siblings in the same input share it.
/// Keeping the occurrence apart means duplicated siblings stay distinct entries.
type ChildKey<'a> = (Option<&'a str>, usize);

struct ArenaTimer<'a> {
    name: Option<&'a str>,
    total_duration_micros: u64,
    children: Vec<usize>,
    child_slots: HashMap<ChildKey<'a>, usize>,
}

impl<'a> ArenaTimer<'a> {
    fn new(name: Option<&'a str>) -> Self {
        Self {
            name,
            total_duration_micros: 0,
            children: Vec::new(),
            child_slots: HashMap::new(),
        }
    }
}

/// Merges synthetic-root timer trees. Empty input gives an empty synthetic root.
pub fn merge_timer_trees<'a, I>(trees: I) -> TimerNode
where
    I: IntoIterator<Item = &'a TimerNode>,
{
    let mut arena = vec![ArenaTimer::new(None)];
    let mut duplicate_siblings = 0usize;
    let mut stack: Vec<(&'a TimerNode, usize)> = Vec::new();

    for tree in trees {
        stack.push((tree, 0));
        while let Some((node, slot)) = stack.pop() {
            let merged = &mut arena[slot].total_duration_micros;
            *merged = merged.saturating_add(node.total_duration_micros);

            let mut occurrences: HashMap<Option<&'a str>, usize> = HashMap::new();
            for child in &node.child_nodes {
                let name = child.name.as_deref();
                let occurrence = occurrences.entry(name).or_insert(0);
                if *occurrence > 0 {
                    duplicate_siblings += 1;
                }
                let key = (name, *occurrence);
                *occurrence += 1;

                let child_slot = match arena[slot].child_slots.get(&key).copied() {
                    Some(existing) => existing,
                    None => {
                        let index = arena.len();
                        arena.push(ArenaTimer::new(name));
                        arena[slot].children.push(index);
                        arena[slot].child_slots.insert(key, index);
                        index
                    }
                };
                stack.push((child, child_slot));
            }
        }
    }

    if duplicate_siblings > 0 {
        warn!(
            duplicate_siblings,
            "timer tree has repeated sibling names; merged as distinct entries"
        );
    }
    into_tree(arena)
}

/// Children always sit at higher arena indexes than their parent, so building in
/// reverse index order sees every child before its parent.
fn into_tree(arena: Vec<ArenaTimer<'_>>) -> TimerNode {
    let mut built: Vec<Option<TimerNode>> = Vec::with_capacity(arena.len());
    built.resize_with(arena.len(), || None);
    for (index, timer) in arena.into_iter().enumerate().rev() {
        let child_nodes = timer
            .children
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        built[index] = Some(TimerNode {
            name: timer.name.map(str::to_owned),
            total_duration_micros: timer.total_duration_micros,
            child_nodes,
        });
    }
    built
        .into_iter()
        .next()
        .flatten()
        .unwrap_or_else(|| TimerNode::synthetic_root(Vec::new()))
}
