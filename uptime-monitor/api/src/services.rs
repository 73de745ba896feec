pub mod health;
pub mod history;
pub mod monitoring;
pub mod registry;
pub mod scheduler;
pub mod status;
