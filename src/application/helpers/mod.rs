pub mod domain_name;
pub mod snapshot;
