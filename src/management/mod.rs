mod ledger;
mod mirror;
mod session;

pub use ledger::LedgerError;
pub use ledger::MAX_SELECTIONS;
pub use ledger::SelectionLedger;
pub use mirror::BestEffortMirror;
pub use mirror::HttpMirror;
pub use mirror::SelectionMirror;
pub use session::AuthError;
pub use session::REFRESH_MARGIN_SECS;
pub use session::SessionManager;
pub use session::TokenExchange;
pub use session::apply_grant;
pub use session::valid_bearer;
