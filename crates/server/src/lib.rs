pub mod routes;
pub mod startup;
pub mod errors;
pub mod state;
pub mod openapi;
pub mod vote_cookie;

pub use startup::run;
