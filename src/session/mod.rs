//! Session schema, validation, storage and collation
//!
//! ## Pipeline
//!
//! ```text
//! raw JSON ──> validate_session ──> SessionStore ──> TrialCollator ──> stats
//!                  (first error)      (ordered)        (lazy, flat)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use judgment_analytics::session::{validate_session, SessionStore, TrialCollator};
//!
//! let document = serde_json::json!({
//!     "participant": { "id": "P1" },
//!     "experiment": { "data": [{
//!         "trial": 1, "sentence": "Der Hund schläft.",
//!         "condition": "simple_non_ambiguous",
//!         "expected": "grammatical", "response": "grammatical",
//!         "responseTime": 812, "correct": true
//!     }] }
//! });
//!
//! let mut store = SessionStore::new();
//! store.add(validate_session(&document, "p1.json")?);
//!
//! let collator = TrialCollator::new(store.sessions());
//! assert_eq!(collator.trials().count(), 1);
//! # Ok::<(), judgment_analytics::ValidationError>(())
//! ```

mod collator;
mod session_record;
mod store;
mod trial_record;
mod validator;

pub use collator::{CollatedTrial, TrialCollator};
pub use session_record::{SessionRecord, SessionRecordBuilder};
pub use store::{SessionStore, SharedSessionStore, StoreSnapshot};
pub use trial_record::{Condition, ConditionId, Judgment, TrialRecord, TrialRecordBuilder};
pub use validator::{parse_session_document, validate_session, REQUIRED_TRIAL_FIELDS};
