pub mod api;
pub mod http;

pub use api::ApplicationsApi;
pub use http::HttpApplicationsApi;

#[cfg(test)]
pub use api::MockApplicationsApi;
