//! Plur app flows on top of the `fw-driver` session.
//!
//! Every flow is a scripted sequence of locate-by-visible-text, click, and
//! bounded settle waits, with hand-coded fallback labels where the app's
//! copy varies (Communities/Groups, Create/Add, Invite/Share, Paste/Join).
//! "Not found" degrades to a warning and a sentinel return; engine failures
//! propagate.

mod flows;

pub use flows::{CommunityEntry, PlurTester};
