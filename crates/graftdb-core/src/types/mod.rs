mod float64;
mod ulid;

pub use float64::Float64;
pub use ulid::{Ulid, UlidDecodeError, UlidError};
