pub mod directory;
pub mod nearby;
pub mod registry;

pub use directory::SearchService;
pub use nearby::{NearbyService, NearbyTable};
pub use registry::{RegistryClient, RegistryError};
