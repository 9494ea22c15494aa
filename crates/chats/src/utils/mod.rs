//! Input validation and permission checks used by the chat service.

pub mod permissions;
pub mod validation;

pub use permissions::PermissionChecker;
pub use validation::Validator;
