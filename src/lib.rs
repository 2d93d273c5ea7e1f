pub mod aggregate;
pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod process;
pub mod server;
pub mod table;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::{qualifying_offer, qualifying_offer_with, OfferParams, QualifyingOffer};
pub use error::{PipelineError, PipelineResult};
pub use fetch::fetch;
pub use process::clean;
pub use table::{SalaryRow, Table};
