pub mod contact;
pub mod errors;

pub use contact::{Contact, NewContact};
pub use errors::DomainError;
