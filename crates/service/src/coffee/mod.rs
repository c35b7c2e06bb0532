//! Coffee catalog: domain, record store contract and its implementations, service.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use repository::CoffeeRepository;
pub use service::CoffeeService;
