//! Column suggestion, key normalization and the reference join

pub mod join;
pub mod normalize;
pub mod suggest;

pub use join::{JoinOptions, JoinReconciler, JoinResult, KeyPair, KeySpec, join};
pub use normalize::{BlankKeyPolicy, composite_key, normalize};
pub use suggest::{ColumnSuggester, columns_containing, rank_candidates, similarity};
