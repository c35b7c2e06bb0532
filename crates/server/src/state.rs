use std::sync::Arc;

use service::coffee::{CoffeeRepository, CoffeeService};

/// Shared request context: the one store instance built at startup.
#[derive(Clone)]
pub struct AppState {
    pub coffees: Arc<CoffeeService<dyn CoffeeRepository>>,
}

impl AppState {
    pub fn new(repo: Arc<dyn CoffeeRepository>) -> Self {
        Self { coffees: Arc::new(CoffeeService::new(repo)) }
    }
}
