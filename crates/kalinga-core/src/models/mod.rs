pub mod category;
pub mod client;
pub mod enrollment;
pub mod session;
pub mod statistics;
pub mod visit_record;
