pub mod audit;
pub mod auth;
pub mod directory;
pub mod invites;
pub mod ledger;
pub mod lifecycle;
pub mod notifier;

pub use audit::ChangeAudit;
pub use auth::AuthSession;
pub use directory::GroupDirectory;
pub use invites::InviteService;
pub use ledger::QuotaLedger;
pub use lifecycle::VacationLifecycle;
pub use notifier::{ApproverNotifier, LogNotifier};
