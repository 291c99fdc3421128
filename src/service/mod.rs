pub mod encoder;
pub mod error;
pub mod math;
pub mod pool;
pub mod route;
pub mod swap;
pub mod token_registry;
pub mod trade;
pub mod types;
pub mod utils;


pub use encoder::SwapEncoder;
pub use error::ServiceError;
pub use pool::{Pool, PoolState};
pub use route::Route;
pub use swap::{FEE_TIER_MEDIUM, SwapService};
pub use token_registry::TokenRegistry;
pub use trade::{QuotedLeg, Trade};
pub use types::*;

pub(crate) type ServiceResult<T> = std::result::Result<T, ServiceError>;
