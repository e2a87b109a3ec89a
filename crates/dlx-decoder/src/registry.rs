use std::collections::HashMap;
use std::fmt;

use dlx_types::{BlockContent, BlockType, Decoded};
use dlx_wire::TypeTag;

/// A payload decoder: pure, and safe to share across threads.
pub type GrammarFn = dyn Fn(&[u8]) -> Decoded<BlockContent> + Send + Sync;

/// Maps type tags to the grammar that decodes their payload.
///
/// The registry is built once and then only read, so a single instance
/// can back any number of concurrent decoders. Every lookup returns a
/// fresh value; nothing decoded is cached or shared between blocks.
///
/// `BlockRegistry::default()` knows every built-in block type;
/// `BlockRegistry::new()` starts empty so tests can install stubs.
pub struct BlockRegistry {
    grammars: HashMap<TypeTag, Box<GrammarFn>>,
}

impl BlockRegistry {
    /// An empty registry. Every tag decodes as unknown.
    pub fn new() -> Self {
        Self {
            grammars: HashMap::new(),
        }
    }

    /// Install `grammar` for `tag`, replacing any earlier one.
    ///
    /// Returns `true` if a grammar was replaced.
    pub fn register<F>(&mut self, tag: TypeTag, grammar: F) -> bool
    where
        F: Fn(&[u8]) -> Decoded<BlockContent> + Send + Sync + 'static,
    {
        self.grammars.insert(tag, Box::new(grammar)).is_some()
    }

    /// Install the built-in grammar for a known block type.
    pub fn register_builtin(&mut self, block_type: BlockType) -> bool {
        self.register(block_type.tag(), move |payload| {
            BlockContent::decode(block_type, payload)
        })
    }

    pub fn unregister(&mut self, tag: TypeTag) -> bool {
        self.grammars.remove(&tag).is_some()
    }

    pub fn contains(&self, tag: TypeTag) -> bool {
        self.grammars.contains_key(&tag)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<TypeTag> {
        let mut tags: Vec<_> = self.grammars.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Decode `payload` with the grammar for `tag`, or `None` if no grammar
    /// is registered.
    pub fn construct(&self, tag: TypeTag, payload: &[u8]) -> Option<Decoded<BlockContent>> {
        self.grammars.get(&tag).map(|grammar| grammar(payload))
    }

    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        for block_type in BlockType::KNOWN {
            registry.register_builtin(block_type);
        }
        registry
    }
}

impl fmt::Debug for BlockRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}
