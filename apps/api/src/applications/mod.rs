// Job applications and their status pipeline.

pub mod handlers;
pub mod store;
