use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use fst::{IntoStreamer, Set, Streamer};
use serde::{Deserialize, Serialize};

use super::ALPHABET_SIZE;
use crate::errors::DictionaryLoadError;
use crate::utils::serialization;

/// Handle to a node in the dictionary arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Prefix tree node. Children are indexed by alphabet position, the end marker
/// is kept apart from them so it can never be mistaken for a branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieNode {
    next: [Option<NodeId>; ALPHABET_SIZE],
    /// The word that ends at this node, if any
    word: Option<String>,
}

impl TrieNode {
    /// Child for the letter, None if no word continues with it
    pub fn next_node(&self, c: char) -> Option<NodeId> {
        letter_index(c).and_then(|i| self.next[i])
    }

    /// Child at the given alphabet position
    pub fn child_at(&self, i: usize) -> Option<NodeId> {
        self.next.get(i).copied().flatten()
    }

    /// Every populated child, in alphabetical order
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.next.iter().flatten().copied()
    }

    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }
}

fn letter_index(c: char) -> Option<usize> {
    if c.is_ascii_lowercase() {
        Some(c as usize - 'a' as usize)
    } else {
        None
    }
}

/// Word lists are trimmed and lowercased before they are indexed
fn normalize(line: &str) -> String {
    line.trim().to_lowercase()
}

/// Prefix tree over a word list. Read-only once built, so a single instance
/// can be shared by any number of searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    nodes: Vec<TrieNode>,
    n_words: usize,
}

impl Dictionary {
    /// Builds the index from a list of words. Blank entries and words with
    /// characters outside a-z are left out.
    pub fn build<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dict = Self {
            nodes: vec![TrieNode::default()],
            n_words: 0,
        };
        let mut skipped = 0;
        for word in words {
            let word = normalize(word.as_ref());
            if word.is_empty() {
                continue;
            }
            if !dict.add_word(&word) {
                log::debug!("Skipping '{}': only the letters a-z can be indexed", word);
                skipped += 1;
            }
        }

        log::info!(
            "Built dictionary index: {} words, {} nodes ({} skipped)",
            dict.n_words,
            dict.nodes.len(),
            skipped
        );
        dict
    }

    /// Adds a word to the trie, creating missing nodes along the way.
    /// Returns false if the word cannot be represented.
    fn add_word(&mut self, word: &str) -> bool {
        let letters = match word.chars().map(letter_index).collect::<Option<Vec<_>>>() {
            Some(letters) => letters,
            None => return false,
        };

        let mut curr = NodeId::ROOT;
        for i in letters {
            curr = match self.nodes[curr.index()].next[i] {
                Some(node) => node,
                None => {
                    let node = NodeId(self.nodes.len() as u32);
                    self.nodes.push(TrieNode::default());
                    self.nodes[curr.index()].next[i] = Some(node);
                    node
                }
            };
        }

        let end = &mut self.nodes[curr.index()];
        if end.word.is_none() {
            self.n_words += 1;
        }
        end.word = Some(word.to_string());
        true
    }

    /// Builds the index from a newline delimited word list
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DictionaryLoadError> {
        let mut words = Vec::new();
        for line in reader.split(b'\n') {
            // Invalid utf-8 turns into replacement chars, which build() skips
            words.push(String::from_utf8_lossy(&line?).into_owned());
        }
        Self::build(words).non_empty()
    }

    /// Reads a newline delimited word list from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryLoadError> {
        let file = File::open(path.as_ref()).map_err(|source| DictionaryLoadError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Builds the index from every key of an fst set
    pub fn from_fst_set<D: AsRef<[u8]>>(set: &Set<D>) -> Result<Self, DictionaryLoadError> {
        let mut words = Vec::with_capacity(set.len());
        let mut stream = set.into_stream();
        while let Some(key) = stream.next() {
            match std::str::from_utf8(key) {
                Ok(word) => words.push(word.to_string()),
                Err(_) => log::warn!("Skipping word list entry that is not valid utf-8"),
            }
        }
        Self::build(words).non_empty()
    }

    /// Reads an fst set from disk and indexes its keys
    pub fn from_fst_file<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryLoadError> {
        let bytes = std::fs::read(path.as_ref()).map_err(|source| DictionaryLoadError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        let set = Set::new(bytes)?;
        Self::from_fst_set(&set)
    }

    /// Writes the built index so later runs can skip rebuilding it
    pub fn save_cache<P: AsRef<Path>>(&self, path: P) -> Result<(), DictionaryLoadError> {
        serialization::save_to_disk(self, path.as_ref())?;
        Ok(())
    }

    /// Loads an index written by `save_cache`
    pub fn load_cache<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryLoadError> {
        let dict: Self = serialization::load_from_disk(path.as_ref())?;
        let dict = dict.validated()?;
        log::info!(
            "Loaded dictionary index from {}: {} words",
            path.as_ref().display(),
            dict.n_words
        );
        dict.non_empty()
    }

    /// Loads a dictionary picking the format from the file extension:
    /// `.bin` for a saved index, `.fst` for an fst set, anything else is a
    /// plain word list.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryLoadError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("bin") => Self::load_cache(path),
            Some("fst") => Self::from_fst_file(path),
            _ => Self::from_file(path),
        }
    }

    /// Checks a deserialized arena: the root must exist, every child link must
    /// stay inside the arena and the word count must match the end markers.
    fn validated(mut self) -> Result<Self, DictionaryLoadError> {
        if self.nodes.is_empty() {
            return Err(DictionaryLoadError::Corrupt("index has no root node".into()));
        }
        let n_nodes = self.nodes.len();
        if let Some(bad) = self
            .nodes
            .iter()
            .flat_map(|node| node.children())
            .find(|child| child.index() >= n_nodes)
        {
            return Err(DictionaryLoadError::Corrupt(format!(
                "node {} is out of range ({} nodes)",
                bad.0, n_nodes
            )));
        }
        self.n_words = self.nodes.iter().filter(|node| node.word.is_some()).count();
        Ok(self)
    }

    fn non_empty(self) -> Result<Self, DictionaryLoadError> {
        if self.is_empty() {
            Err(DictionaryLoadError::Empty)
        } else {
            Ok(self)
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of distinct words in the index
    pub fn len(&self) -> usize {
        self.n_words
    }

    pub fn is_empty(&self) -> bool {
        self.n_words == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Checks whether the word (case-insensitive) is in the dictionary
    pub fn contains(&self, word: &str) -> bool {
        let word = normalize(word);
        let mut curr = self.root();
        for c in word.chars() {
            match self[curr].next_node(c) {
                Some(node) => curr = node,
                None => return false,
            }
        }
        self[curr].word().is_some()
    }
}

impl std::ops::Index<NodeId> for Dictionary {
    type Output = TrieNode;

    fn index(&self, index: NodeId) -> &Self::Output {
        &self.nodes[index.index()]
    }
}
