pub mod changes;
pub mod group;
pub mod group_user;
pub mod quotas;
pub mod shared;
pub mod vacation;
