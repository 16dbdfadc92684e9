pub mod builder;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod stemmer;
pub mod tokenizer;

pub use builder::{IndexBuilder, PostingStore, TermFrequencies};
pub use error::{IndexError, Result};
pub use index::{DocId, InvertedIndex, PostingList};
pub use query::{Hits, QueryEngine};
