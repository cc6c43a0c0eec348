pub mod allow_list;
pub mod context;
pub mod queue;
pub mod services;

pub use allow_list::CapabilityAllowList;
pub use context::TenantContext;
pub use queue::{InMemoryQueue, InMemoryQueueManager};
pub use services::{ContextServices, ContextServicesBuilder};
