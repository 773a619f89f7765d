pub mod cloudinary;
pub mod error;
pub mod query;
pub mod supabase;

pub use error::DatabaseError;
pub use query::{Condition, Order, Query};
pub use supabase::SupabaseClient;
