//! Signup wizard — the multi-step join flow.
//!
//! The wizard walks seven steps, gated at step 1 by phone verification.
//! Components are plain state machines driven by the REST routes; the
//! manager owns them as one session and talks to the external backend.

pub mod experience;
pub mod manager;
pub mod payload;
pub mod routes;
pub mod steps;
pub mod verification;

pub use experience::{ExperienceEntry, ExperienceRegistry, SkillKey, YearsBucket};
pub use manager::{SignupManager, WizardStatus};
pub use payload::{SignupPayload, TechCode, WorkExperienceRequest};
pub use routes::{SignupRouteState, signup_routes};
pub use steps::{FieldsPatch, FormStepController, WizardFields, WizardStep};
pub use verification::{VerificationPhase, VerificationSession};
