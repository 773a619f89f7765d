pub mod consultant;
pub mod patient;

pub use consultant::ConsultantAuthService;
pub use patient::PatientAuthService;
