mod cache;
mod client;
mod http_client;
mod normalize;
mod operations;
mod policy;
mod request;

// 公共 API 重新导出
pub use cache::{CacheSweeper, ResponseCache};
pub use client::{empty_results, CatalogClient, FetchOptions};
pub use normalize::{normalize_list, CatalogItem};
pub use operations::{DiscoverParams, Endpoint, MediaType};
pub use policy::{is_network_failure, Criticality, FetchPolicy, LinearBackoff, PolicyProfile};
pub use request::{build_request_url, Credentials, Query, QueryValue};
