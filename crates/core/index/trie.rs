//! Prefix trie keyed by geohash strings.
//!
//! Nodes live in a flat arena and refer to their children by index. The
//! root is node 0. Each node stores the values whose key ends exactly at
//! that node; a prefix query gathers a node's values and everything below
//! it.
//!
//! ```text
//! PrefixTrie
//! └─ nodes: Vec<TrieNode>
//!    ├─ [0] root  children: [('d', 1), ('u', 4)]
//!    ├─ [1] "d"   children: [('r', 2)]
//!    ├─ [2] "dr"  children: [('5', 3)]
//!    ├─ [3] "dr5" values: [a, b]
//!    └─ [4] "u"   values: [c]
//! ```

use smallvec::SmallVec;

type NodeId = usize;

const ROOT: NodeId = 0;

struct TrieNode<T> {
    /// Child links sorted by key byte.
    children: SmallVec<[(u8, NodeId); 4]>,
    values: SmallVec<[T; 1]>,
}

impl<T> TrieNode<T> {
    fn new() -> Self {
        Self {
            children: SmallVec::new(),
            values: SmallVec::new(),
        }
    }

    fn child(&self, byte: u8) -> Option<NodeId> {
        self.children
            .binary_search_by_key(&byte, |(b, _)| *b)
            .ok()
            .map(|pos| self.children[pos].1)
    }
}

/// Mapping from string keys to value lists, searchable by key prefix.
///
/// Keys sharing a prefix share a path from the root, so every value whose
/// key starts with a given prefix sits in a single subtree. Inserting the
/// same key twice keeps both values.
///
/// # Examples
///
/// ```rust
/// use geonear::index::PrefixTrie;
///
/// let mut trie = PrefixTrie::new();
/// trie.insert("dr5reg", "manhattan");
/// trie.insert("dr5rsq", "brooklyn");
/// trie.insert("9q5ctr", "los angeles");
///
/// assert_eq!(trie.query("dr5r"), vec![&"manhattan", &"brooklyn"]);
/// assert!(trie.query("c2").is_empty());
/// ```
pub struct PrefixTrie<T> {
    nodes: Vec<TrieNode<T>>,
    len: usize,
}

impl<T> PrefixTrie<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::new()],
            len: 0,
        }
    }

    /// Add `value` under `key`, creating path nodes on demand.
    pub fn insert(&mut self, key: &str, value: T) {
        let mut current = ROOT;

        for byte in key.bytes() {
            current = match self.nodes[current].child(byte) {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::new());
                    let children = &mut self.nodes[current].children;
                    let pos = children.partition_point(|(b, _)| *b < byte);
                    children.insert(pos, (byte, next));
                    next
                }
            };
        }

        self.nodes[current].values.push(value);
        self.len += 1;
    }

    /// All values whose key starts with `prefix`.
    ///
    /// Values come back in a stable order: a node's own values first, in
    /// insertion order, then its subtrees in ascending key-byte order. An
    /// unknown prefix yields an empty vector; the empty prefix yields every
    /// value.
    pub fn query(&self, prefix: &str) -> Vec<&T> {
        let mut out = Vec::new();
        self.for_each_prefixed(prefix, |value| out.push(value));
        out
    }

    /// Visit every value whose key starts with `prefix`, in `query` order.
    pub fn for_each_prefixed<'a, F>(&'a self, prefix: &str, mut visit: F)
    where
        F: FnMut(&'a T),
    {
        let Some(start) = self.find(prefix) else {
            return;
        };

        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            node.values.iter().for_each(&mut visit);
            stack.extend(node.children.iter().rev().map(|(_, child)| *child));
        }
    }

    /// Whether any key starts with `prefix`.
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.find(prefix).is_some()
    }


    /// Total number of stored values.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes in the arena, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn find(&self, prefix: &str) -> Option<NodeId> {
        prefix
            .bytes()
            .try_fold(ROOT, |id, byte| self.nodes[id].child(byte))
    }
}

impl<T> Default for PrefixTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for PrefixTrie<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefixTrie")
            .field("len", &self.len)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}
