// Suffix trie: find every stored key that is a suffix of a query string.

use std::collections::HashMap;

/// Maps string keys to sets of values. A lookup returns the values of every
/// key that is a suffix of the query, including the empty key.
///
/// Keys are stored reversed in a node arena, so a lookup is a single walk
/// over the query from its last character backwards.
#[derive(Debug, Clone)]
pub struct SuffixTrie<T> {
    nodes: Vec<Node<T>>,
    len: usize,
}

#[derive(Debug, Clone)]
struct Node<T> {
    children: HashMap<char, usize>,
    values: Vec<T>,
}

impl<T> Node<T> {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            values: Vec::new(),
        }
    }
}

impl<T> Default for SuffixTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SuffixTrie<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            len: 0,
        }
    }

    /// Number of distinct `(key, value)` pairs stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T: PartialEq> SuffixTrie<T> {
    /// Associate `value` with `key`. Values accumulate per key; inserting the
    /// same pair twice stores it once.
    pub fn insert(&mut self, key: &str, value: T) {
        let mut node = 0;
        for c in key.chars().rev() {
            node = match self.nodes[node].children.get(&c) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::new());
                    self.nodes[node].children.insert(c, next);
                    next
                }
            };
        }
        let values = &mut self.nodes[node].values;
        if !values.contains(&value) {
            values.push(value);
            self.len += 1;
        }
    }

    /// Union of the values of every key that is a suffix of `query`, shortest
    /// keys first. A value stored under several matching keys appears once.
    pub fn lookup(&self, query: &str) -> Vec<&T> {
        let mut out: Vec<&T> = Vec::new();
        let mut node = 0;
        collect(&self.nodes[node].values, &mut out);
        for c in query.chars().rev() {
            match self.nodes[node].children.get(&c) {
                Some(&next) => node = next,
                None => break,
            }
            collect(&self.nodes[node].values, &mut out);
        }
        out
    }
}

fn collect<'a, T: PartialEq>(values: &'a [T], out: &mut Vec<&'a T>) {
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
}
