//! Abstract storage traits for the Custodia consent core.
//!
//! Every durable backend (Postgres in production, in-memory for testing)
//! implements these traits. The rest of the workspace depends only on the
//! traits, never on a backend.
//!
//! Grant and revocation are single trait calls (`apply_grant`,
//! `apply_revocation`) rather than separate record/profile writes: a backend
//! must execute each as one atomic transaction so a crash mid-update cannot
//! leave the consent record and the profile disagreeing.

pub mod consent;
pub mod error;
pub mod user;

pub use consent::{
    ConsentRecord, ConsentStatus, ConsentStore, GrantTransaction, RequesterInfo, RetentionFilter,
    RevocationTransaction, VerificationEvidence,
};
pub use error::StoreError;
pub use user::{EmailToken, ParentalConsentStatus, Profile, UserRecord, UserStore};
