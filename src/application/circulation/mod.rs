mod circulation_service;
mod errors;

pub use circulation_service::{BorrowOutcome, CirculationService, ReturnOutcome};
pub use errors::{CirculationError, Result};
