//! Collaborators consulted by the validator, and in-memory implementations.

mod memory_service;
mod memory_ticket;
mod static_attributes;
mod traits;

pub use memory_service::MemoryServiceRegistry;
pub use memory_ticket::{MemoryTicketRegistry, PurgedTickets};
pub use static_attributes::StaticAttributeResolver;
pub use traits::*;
