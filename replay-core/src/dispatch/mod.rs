pub mod bridge;
pub mod deferred;
