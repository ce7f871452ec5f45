//! Notification domain entities.

pub mod entity_type;
pub mod model;

pub use entity_type::EntityType;
pub use model::Notification;
