pub mod entity;
pub mod website;

pub use entity::ReviewService;
pub use website::WebReviewService;
