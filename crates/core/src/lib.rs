//! Pure domain logic for asset-hierarchy imports and map views.
//!
//! Nothing in this crate touches the network, a database, or the async
//! runtime. The API crate feeds it in-memory data and serialises whatever
//! comes back.

pub mod error;
pub mod geo;
pub mod hierarchy;
pub mod tabular;
