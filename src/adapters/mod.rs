pub mod http;
pub mod observation;
pub mod persistence;
