pub mod extractor;
pub mod geo;
pub mod jwt;
pub mod lenient;
pub mod password;
pub mod payload;
pub mod projection;
pub mod test_utils;
pub mod validation;
