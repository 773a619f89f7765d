pub mod directory;
pub mod roster;

pub use directory::DoctorDirectoryService;
pub use roster::DoctorRosterService;
