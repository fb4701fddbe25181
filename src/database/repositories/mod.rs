pub mod changes;
pub mod groups;
pub mod invites;
pub mod memberships;
pub mod quotas;
pub mod users;
pub mod vacations;
