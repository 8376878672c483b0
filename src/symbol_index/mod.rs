//! Symbol Index for generated API documentation
//!
//! Builds an immutable, key-grouped index of documented symbols and serves
//! as-you-type substring queries against it. Overloads and same-named
//! members of different scopes share one key and carry a disambiguator.
//!
//! Performance targets:
//! - Query: well under 1ms for a few thousand keys
//! - Build: linear in the number of records

mod builder;
mod error;
mod normalize;
mod search;
mod search_data;
mod store;
mod symbol;
mod trigram;

pub use builder::{merge_shards, BuildOutput, BuildWarning, IndexBuilder};
pub use error::{BuildError, QueryError, StoreError};
pub use normalize::{display_name, normalize, IndexKey};
pub use search::{parse_limit, MatchKind, QueryEngine, ResultGroup, SearchQuery};
pub use search_data::{escape_key, render_search_data, write_search_data};
pub use store::{load_index, load_records, save_index, Index, INDEX_SCHEMA_VERSION};
pub use symbol::{IndexEntry, SymbolKind, SymbolRecord};
