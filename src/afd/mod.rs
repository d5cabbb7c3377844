//! April Fools community drawing event: who claimed which Pokemon, what they submitted, and how
//! the review went.

pub mod normalize;
pub mod row;
pub mod sheet;
pub mod stats;
pub mod store;

pub use row::{ClaimRow, Participant, Status};
pub use sheet::Sheet;
