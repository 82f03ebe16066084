pub(crate) mod crawl;
pub(crate) mod ingest;
pub(crate) mod migrate;
pub(crate) mod shared;
