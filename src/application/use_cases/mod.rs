pub mod observation;
pub mod provenance;
