//! Per-user document store port (saved stocks and simulations).

use crate::domain::error::GatewayError;
use crate::domain::portfolio::{NewSimulation, SavedStock, Simulation};

pub trait StorePort {
    fn saved_stocks(&self, user_id: &str) -> Result<Vec<SavedStock>, GatewayError>;

    /// Idempotent: saving an already-saved symbol returns the existing entry.
    fn save_stock(&self, user_id: &str, symbol: &str) -> Result<SavedStock, GatewayError>;

    /// Returns whether anything was removed.
    fn remove_stock(&self, user_id: &str, symbol: &str) -> Result<bool, GatewayError>;

    fn is_saved(&self, user_id: &str, symbol: &str) -> Result<bool, GatewayError>;

    fn create_simulation(
        &self,
        user_id: &str,
        new_sim: &NewSimulation,
    ) -> Result<Simulation, GatewayError>;

    fn simulations(&self, user_id: &str) -> Result<Vec<Simulation>, GatewayError>;
}
