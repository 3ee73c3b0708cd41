use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] exp_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] exp_store_lmdb::LmdbError),

    #[error("burn execution failed: {0}")]
    Burn(#[from] exp_requests::BurnError),

    #[error("mint execution failed: {0}")]
    Mint(#[from] exp_requests::MintError),

    #[error("request rejected: {0}")]
    Submit(#[from] exp_requests::SubmitError),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Corrupted storage. The host must stop instead of retrying.
    #[error("fatal: {0}")]
    Fatal(String),
}
