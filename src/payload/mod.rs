//! Caption payload retrieval.
//!
//! Fetches the raw bytes behind a [`PayloadLocator`](crate::captions::PayloadLocator),
//! either from a file on disk or with a single HTTP request.

mod fetcher;
mod materialize;

pub use fetcher::PayloadFetcher;
pub use materialize::{find_caption_file, scratch_dir};
