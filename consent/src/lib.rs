//! Parental-consent workflow orchestration.
//!
//! Drives a consent record through `pending -> granted | denied` and
//! `granted -> revoked`, branching on the verification method:
//!
//! 1. **KBA**: a quiz session from [`custodia_kba`]; a passing score grants.
//! 2. **Email**: a one-time token stored on the profile; an out-of-band
//!    confirmation flow redeems it and calls [`ConsentOrchestrator::grant_consent`].
//! 3. **Payment**: the payment gateway's verified flag decides.
//!
//! Grant and revocation are atomic store transactions covering the record and
//! the child's profile together. The orchestrator never caches durable state:
//! every operation re-fetches, so concurrent grant attempts collapse into one
//! winner and a `CONSENT_ALREADY_GRANTED` conflict.
//!
//! Side effects with external delivery (emails, reminders) are emitted as
//! [`ConsentEvent`]s for the platform to drain and act on.

pub mod error;
pub mod events;
pub mod orchestrator;
pub mod outcomes;

pub use error::ConsentError;
pub use events::ConsentEvent;
pub use orchestrator::{ConsentOrchestrator, InitiateConsent};
pub use outcomes::{ConsentStatusReport, Initiation, RenewalReminder};
