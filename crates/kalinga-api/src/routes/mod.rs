pub mod clients;
pub mod forms;
pub mod health;
pub mod records;
pub mod roster;
pub mod stats;
