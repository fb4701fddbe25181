pub mod change;
pub mod group;
pub mod invite;
pub mod lifecycle;
pub(crate) mod macros;
pub mod membership;
pub mod quota;
pub mod user;
pub mod vacation;

// Re-export all models for easy importing
pub use change::*;
pub use group::*;
pub use invite::*;
pub use lifecycle::*;
pub use membership::*;
pub use quota::*;
pub use user::*;
pub use vacation::*;
