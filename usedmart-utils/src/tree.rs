use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    hash::Hash,
};

/// A node that can be arranged into a forest by its parent link.
pub trait TreeNode: Sized {
    type Id: Eq + Hash + Clone;

    fn id(&self) -> Self::Id;

    /// `None` for top-level nodes.
    fn parent_id(&self) -> Option<Self::Id>;

    fn children_mut(&mut self) -> &mut Vec<Self>;

    fn sort_key(&self) -> i32;

    fn compare(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// Arrange `nodes` into a forest.
///
/// Nodes without a parent, or whose parent is not part of `nodes`, become
/// roots. Siblings are ordered by [`TreeNode::compare`].
pub fn build_tree<N, T>(nodes: Vec<N>) -> Vec<T>
where
    N: Into<T>,
    T: TreeNode,
{
    let nodes: Vec<T> = nodes.into_iter().map(Into::into).collect();
    let known: HashSet<T::Id> = nodes.iter().map(TreeNode::id).collect();

    let mut roots = Vec::new();
    let mut by_parent: HashMap<T::Id, Vec<T>> = HashMap::with_capacity(nodes.len());
    for node in nodes {
        match node.parent_id().filter(|p| known.contains(p)) {
            Some(parent) => by_parent.entry(parent).or_default().push(node),
            None => roots.push(node),
        }
    }

    attach_children(&mut roots, &mut by_parent);
    roots
}

fn attach_children<T: TreeNode>(level: &mut [T], by_parent: &mut HashMap<T::Id, Vec<T>>) {
    level.sort_by(|a, b| a.compare(b));
    for node in level.iter_mut() {
        if let Some(mut children) = by_parent.remove(&node.id()) {
            attach_children(&mut children, by_parent);
            *node.children_mut() = children;
        }
    }
}

/// Collect `root` and every id reachable from it through `(id, parent_id)` links.
///
/// Cycles in the input terminate because each id is visited once.
pub fn descendant_ids<Id>(root: Id, links: &[(Id, Option<Id>)]) -> Vec<Id>
where
    Id: Eq + Hash + Clone,
{
    let mut children: HashMap<&Id, Vec<&Id>> = HashMap::new();
    for (id, parent) in links {
        if let Some(parent) = parent {
            children.entry(parent).or_default().push(id);
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if !seen.insert(id.clone()) {
            continue;
        }
        if let Some(kids) = children.get(&id) {
            stack.extend(kids.iter().map(|k| (*k).clone()));
        }
        out.push(id);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Node {
        id: i32,
        parent: Option<i32>,
        sort: i32,
        children: Vec<Node>,
    }

    impl Node {
        fn new(id: i32, parent: Option<i32>, sort: i32) -> Self {
            Self {
                id,
                parent,
                sort,
                children: Vec::new(),
            }
        }
    }

    impl TreeNode for Node {
        type Id = i32;

        fn id(&self) -> i32 {
            self.id
        }

        fn parent_id(&self) -> Option<i32> {
            self.parent
        }

        fn children_mut(&mut self) -> &mut Vec<Self> {
            &mut self.children
        }

        fn sort_key(&self) -> i32 {
            self.sort
        }
    }

    #[test]
    fn test_build_tree_orders_siblings_and_nests() {
        let nodes = vec![
            Node::new(3, Some(1), 2),
            Node::new(1, None, 1),
            Node::new(2, Some(1), 1),
            Node::new(4, None, 0),
            Node::new(5, Some(99), 5),
        ];
        let forest: Vec<Node> = build_tree(nodes);

        let roots: Vec<i32> = forest.iter().map(|n| n.id).collect();
        assert_eq!(roots, vec![4, 1, 5]);
        let kids: Vec<i32> = forest[1].children.iter().map(|n| n.id).collect();
        assert_eq!(kids, vec![2, 3]);
    }

    #[test]
    fn test_descendant_ids_walks_all_levels() {
        let links = vec![(1, None), (2, Some(1)), (3, Some(2)), (4, None), (5, Some(3))];
        let mut ids = descendant_ids(2, &links);
        ids.sort();
        assert_eq!(ids, vec![2, 3, 5]);
    }

    #[test]
    fn test_descendant_ids_survives_cycles() {
        let links = vec![(1, Some(2)), (2, Some(1))];
        let mut ids = descendant_ids(1, &links);
        ids.sort();
        assert_eq!(ids, vec![1, 2]);
    }
}
