// Cache module for local filesystem caching.
// Stores the fetched catalogue and the last-used filters between runs.

pub mod paths;
pub mod store;

pub use paths::*;
pub use store::{
    CachedData, DEFAULT_TTL, delete, read_cached, read_if_valid, read_json, write_cached,
    write_json,
};
