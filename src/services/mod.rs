// Service module exports

pub mod date_range;
pub mod event_store;
pub mod geometry;
pub mod interaction;
pub mod rewards;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod timeline;
pub mod viewport;
