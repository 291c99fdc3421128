pub mod config;
pub mod repository;
pub mod service;

// Re-export commonly used types for tests and the binary
pub use repository::{
    AlloyExecutionAdapter, AlloyPoolStateReader, ExecutionAdapter, PoolStateReader,
    RepositoryError,
};
pub use service::{
    EncodedSwap, ServiceError, SlippageTolerance, SwapOptions, SwapService, Token, TokenRegistry,
    TradeDirection,
};
