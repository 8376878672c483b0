pub mod config;
pub mod symbol_index;

pub use config::{load_config, IndexConfig};
pub use symbol_index::{
    BuildError, BuildOutput, Index, IndexBuilder, IndexEntry, IndexKey, QueryEngine, QueryError,
    ResultGroup, SearchQuery, SymbolKind, SymbolRecord,
};
