pub mod directory;
pub mod registration;

pub use directory::OrganizationDirectoryService;
pub use registration::OrganizationAccountService;
