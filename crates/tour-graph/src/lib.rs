//! `tour-graph`: navigation graph, topology loading, and routing.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`graph`]  | `NavGraph` (CSR adjacency), `NavGraphBuilder`                |
//! | [`router`] | `Router` trait, `Route`, `DijkstraRouter`                    |
//! | [`loader`] | `load_graph_csv`, `load_graph_readers`                       |
//! | [`error`]  | `GraphError`, `GraphResult<T>`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `tour-core` types.      |

pub mod error;
pub mod graph;
pub mod loader;
pub mod router;


pub use error::{GraphError, GraphResult};
pub use graph::{NavGraph, NavGraphBuilder};
pub use loader::{load_graph_csv, load_graph_readers};
pub use router::{DijkstraRouter, Route, Router};
