pub mod app_error_impl;
pub mod app_state;
pub mod origin;
pub mod routes;
