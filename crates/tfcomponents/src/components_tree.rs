//! tree of component groups
//!
//! Every [Node] corresponds to a single component group. The root node stands for the configuration the tree was
//! built from, every other node is reached through a chain of [ComponentGroupCall]s starting at the root.
//!
//! Nodes live in an arena owned by [Tree] and refer to each other through [NodeId] handles. Nodes are only ever
//! created by [Tree], which fills in `parent`, `root` and `call_path` together, so a node can never be observed
//! half linked.
use crate::addrs::ComponentGroupCall;
use crate::config::Config;
use indexmap::IndexMap;

/// Handle of a [Node] inside the [Tree] that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
pub struct Node {
    parent: Option<NodeId>,
    root: NodeId,
    call_path: Vec<ComponentGroupCall>,
    children: IndexMap<ComponentGroupCall, NodeId>,
}

impl Node {
    /// The enclosing node, `None` for the root node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The root node of the tree. Refers to the node itself when called on the root
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The component group calls leading from the root to this node
    pub fn call_path(&self) -> &[ComponentGroupCall] {
        &self.call_path
    }

    pub fn depth(&self) -> usize {
        self.call_path.len()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    const ROOT: NodeId = NodeId(0);

    /// Create a tree consisting only of its root node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                root: Self::ROOT,
                call_path: vec![],
                children: Default::default(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// # Panic
    /// Panics when `id` was handed out by a different tree
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        // there is always a root node
        false
    }

    /// The child of `parent` reached through `call`, if there is one
    pub fn child(&self, parent: NodeId, call: &ComponentGroupCall) -> Option<NodeId> {
        self.get(parent).children.get(call).copied()
    }

    /// Children of `id` in insertion order
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (&ComponentGroupCall, NodeId)> {
        self.get(id)
            .children
            .iter()
            .map(|(call, child)| (call, *child))
    }

    /// Return the child of `parent` for `call`, creating it when missing
    pub fn get_or_insert_child(&mut self, parent: NodeId, call: ComponentGroupCall) -> NodeId {
        if let Some(existing) = self.child(parent, &call) {
            return existing;
        }

        let parent_node = self.get(parent);
        let mut call_path = Vec::with_capacity(parent_node.call_path.len() + 1);
        call_path.extend_from_slice(&parent_node.call_path);
        call_path.push(call.clone());

        let id = NodeId(self.nodes.len());
        let node = Node {
            parent: Some(parent),
            root: parent_node.root,
            call_path,
            children: Default::default(),
        };

        tracing::trace!(?id, call_path = ?node.call_path, "add components tree node");
        self.nodes.push(node);
        self.nodes[parent.0].children.insert(call, id);

        id
    }

    /// Add a child below `parent` for every component group declared in `config`
    ///
    /// Returns the children in declaration order.
    pub fn insert_group_calls(&mut self, parent: NodeId, config: &Config) -> Vec<NodeId> {
        config
            .groups
            .values()
            .map(|group| self.get_or_insert_child(parent, group.call_addr()))
            .collect()
    }

    /// Follow `path` from the root
    pub fn lookup(&self, path: &[ComponentGroupCall]) -> Option<NodeId> {
        path.iter()
            .try_fold(Self::ROOT, |node, call| self.child(node, call))
    }

    /// `id` followed by its parent, grandparent and so on up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), |current| self.get(*current).parent)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call(name: &str) -> ComponentGroupCall {
        ComponentGroupCall::new(name)
    }

    #[test]
    fn root_refers_to_itself() {
        let tree = Tree::new();
        let root = tree.get(tree.root());

        assert!(root.is_root());
        assert_eq!(root.root(), tree.root());
        assert_eq!(root.parent(), None);
        assert_eq!(root.depth(), 0);
        assert!(root.call_path().is_empty());
    }

    #[test]
    fn child_extends_parent() {
        let mut tree = Tree::new();
        let network = tree.get_or_insert_child(tree.root(), call("network"));
        let subnets = tree.get_or_insert_child(network, call("subnets"));

        let parent = tree.get(network);
        let node = tree.get(subnets);
        assert_eq!(node.parent(), Some(network));
        assert_eq!(node.root(), parent.root());
        assert_eq!(node.depth(), parent.call_path().len() + 1);
        assert_eq!(node.call_path(), &[call("network"), call("subnets")]);
    }

    #[test]
    fn parent_chain_reaches_root_in_depth_steps() {
        let mut tree = Tree::new();
        let mut current = tree.root();
        for name in ["a", "b", "c", "d"] {
            current = tree.get_or_insert_child(current, call(name));
        }

        let depth = tree.get(current).depth();
        let ancestors: Vec<_> = tree.ancestors(current).collect();
        assert_eq!(ancestors.len(), depth + 1);
        assert_eq!(ancestors.last().copied(), Some(tree.get(current).root()));

        let mut walked = current;
        for _ in 0..depth {
            walked = tree.get(walked).parent().expect("not yet at root");
        }
        assert_eq!(walked, tree.root());
    }

    #[test]
    fn insertion_is_idempotent() {
        let mut tree = Tree::new();
        let first = tree.get_or_insert_child(tree.root(), call("a"));
        let second = tree.get_or_insert_child(tree.root(), call("a"));

        assert_eq!(first, second);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.children(tree.root()).count(), 1);
    }

    #[test]
    fn lookup_by_path() {
        let mut tree = Tree::new();
        let a = tree.get_or_insert_child(tree.root(), call("a"));
        let b = tree.get_or_insert_child(a, call("b"));

        assert_eq!(tree.lookup(&[]), Some(tree.root()));
        assert_eq!(tree.lookup(&[call("a"), call("b")]), Some(b));
        assert_eq!(tree.lookup(&[call("b")]), None);
        assert_eq!(tree.child(a, &call("b")), Some(b));
    }

    #[test]
    fn groups_from_config() {
        let (config, diagnostics) = crate::config::load_config(
            "root.tfcomponents.hcl",
            b"component_group \"net\" {}\ncomponent \"db\" {}\ncomponent_group \"app\" {}\n",
        );
        assert!(diagnostics.is_empty());
        let config = config.expect("config must be returned");

        let mut tree = Tree::new();
        let children = tree.insert_group_calls(tree.root(), &config);

        let calls: Vec<_> = tree
            .children(tree.root())
            .map(|(call, _)| call.to_string())
            .collect();
        assert_eq!(calls, vec!["component_group.net", "component_group.app"]);
        assert_eq!(children.len(), 2);
        assert_eq!(tree.get(children[1]).call_path(), &[call("app")]);
    }
}
