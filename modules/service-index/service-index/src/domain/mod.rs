pub mod hub_feed;
pub mod service;

pub use hub_feed::HubServiceFeed;
pub use service::ServiceIndex;
