pub mod db;
pub mod migrate;
pub mod remote;
pub mod secrets;
pub mod seed;
pub mod users;
