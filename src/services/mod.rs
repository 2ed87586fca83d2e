pub mod digest_service;
pub mod email_service;
pub mod normalizer;
pub mod provider_client;
pub mod query_builder;
pub mod relevance;
pub mod search_service;
pub mod watch_service;

pub use digest_service::*;
pub use email_service::*;
pub use normalizer::*;
pub use provider_client::*;
pub use query_builder::*;
pub use relevance::*;
pub use search_service::*;
pub use watch_service::*;
