pub mod handlers;
pub mod pages;
pub mod routes;
pub mod services;
pub mod view;
