pub mod clear;
pub mod dispatch;
pub mod plants;
pub mod purge;
pub mod schema;
pub mod species;
pub mod status;
