// Application layer: validation, reference checks and transactions around
// the storage calls. One file per record family, all on `ShopService`.

mod catalog;
mod clients;
mod crews;
pub mod error;
mod estimates;
mod inventory;
mod jobs;
mod service;

pub use error::*;
pub use service::ShopService;
