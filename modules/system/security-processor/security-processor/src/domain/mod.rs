//! Domain layer for the security processor.

pub mod error;
pub mod lifecycle;
pub mod local_client;
pub mod registry;
pub mod service;

pub use error::DomainError;
pub use lifecycle::ProcessorState;
pub use local_client::SecurityProcessorLocalClient;
pub use registry::SubjectRegistry;
pub use service::Service;
