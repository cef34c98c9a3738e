//! Domain layer for the ballotbox voting service.
//!
//! Zero internal dependencies: shared type aliases, the domain error enum,
//! input validation, and the permissive selected-options parser. Both the
//! persistence layer and the HTTP layer build on this crate.

pub mod error;
pub mod options;
pub mod types;
pub mod votes;
