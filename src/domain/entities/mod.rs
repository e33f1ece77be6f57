pub mod domain;
pub mod origin;
pub mod server;
pub mod ssl_grade;
