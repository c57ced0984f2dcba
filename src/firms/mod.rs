//! Firm population table and loading

mod data;
pub mod loader;
pub mod sector;

pub use data::{FirmRecord, FirmTable};
pub use loader::{load_firms, load_firms_from_reader, REQUIRED_COLUMNS};
pub use sector::Sector;
