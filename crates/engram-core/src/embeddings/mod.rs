//! GloVe-based embeddings: text loader, binary cache, averaging.

mod glove;

pub use glove::{embed_text, GloveTable};
