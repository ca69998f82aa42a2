//! BK-tree over Levenshtein distance, for near-duplicate word lookups.
use std::collections::{hash_map::Entry, HashMap};

/// Character-level edit distance.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            cur[j + 1] = substitution.min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

#[derive(Debug)]
struct Node {
    word: String,
    children: HashMap<usize, Node>,
}

impl Node {
    fn new(word: &str) -> Self {
        Self {
            word: word.to_string(),
            children: HashMap::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct BkTree {
    root: Option<Node>,
    len: usize,
}

impl BkTree {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `word`. Already present words are ignored.
    pub fn insert(&mut self, word: &str) {
        let mut node = match self.root {
            Some(ref mut root) => root,
            None => {
                self.root = Some(Node::new(word));
                self.len += 1;
                return;
            }
        };

        loop {
            let d = levenshtein(word, &node.word);
            if d == 0 {
                return;
            }
            match node.children.entry(d) {
                Entry::Occupied(child) => node = child.into_mut(),
                Entry::Vacant(slot) => {
                    slot.insert(Node::new(word));
                    self.len += 1;
                    return;
                }
            }
        }
    }

    /// Words within `max_distance` of `word`, sorted by distance then word.
    pub fn find(&self, word: &str, max_distance: usize) -> Vec<(usize, &str)> {
        let mut found = Vec::new();
        let mut stack: Vec<&Node> = self.root.iter().collect();

        while let Some(node) = stack.pop() {
            let d = levenshtein(word, &node.word);
            if d <= max_distance {
                found.push((d, node.word.as_str()));
            }
            let lower = d.saturating_sub(max_distance);
            let upper = d + max_distance;
            stack.extend(
                node.children
                    .iter()
                    .filter(|(k, _)| (lower..=upper).contains(*k))
                    .map(|(_, child)| child),
            );
        }

        found.sort_unstable();
        found
    }
}

impl<'a> FromIterator<&'a str> for BkTree {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tree = Self::default();
        iter.into_iter().for_each(|w| tree.insert(w));
        tree
    }
}
