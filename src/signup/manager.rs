//! SignupManager — owns the wizard session and coordinates steps,
//! verification, experience, and submission.
//!
//! All user-triggered transitions run under one write lock for their full
//! duration, backend awaits included, so they are serialized the way the
//! original UI serialized them by disabling controls.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::IntervalStream;
use uuid::Uuid;

use crate::backend::JoinBackend;
use crate::error::FlowError;

use super::experience::{ExperienceEntry, ExperienceRegistry, SkillKey, YearsBucket};
use super::payload::SignupPayload;
use super::steps::{FieldsPatch, FormStepController, IndicatorState, WizardFields, WizardStep};
use super::verification::{
    RESEND_COOLDOWN_SECS, Tick, VERIFICATION_WINDOW_SECS, VerificationPhase, VerificationSession,
};

const MSG_CODE_SENT: &str = "인증번호를 발송했습니다. SMS를 확인해주세요.";
const MSG_CODE_RESENT: &str = "새로운 인증번호를 발송했습니다. SMS를 확인해주세요.";
const MSG_VERIFIED: &str = "휴대폰 인증이 완료되었습니다! ✅";
const MSG_NEED_VERIFICATION: &str = "전화번호 인증을 완료해주세요.";
const MSG_MISSING_REQUIRED: &str = "필수 정보가 누락되었습니다. 모든 단계를 완료해주세요.";
const MSG_JOIN_DONE: &str = "회원가입이 완료되었습니다! 로그인 페이지로 이동합니다.";
const MSG_EXPERIENCE_ADDED: &str = "경력이 추가되었습니다.";
const MSG_CONFIRM_REMOVAL: &str = "이 경력을 삭제하시겠습니까?";

/// The wizard session: everything the signup page accumulates.
#[derive(Debug, Default)]
struct WizardSession {
    controller: FormStepController,
    fields: WizardFields,
    verification: VerificationSession,
    experience: ExperienceRegistry,
}

impl WizardSession {
    fn reset(&mut self) {
        self.controller.reset();
        self.fields = WizardFields::default();
        self.verification.reset();
        self.experience.clear();
    }
}

/// Snapshot of the wizard, rendered by `GET /api/signup/status`.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardStatus {
    pub step: WizardStep,
    pub step_index: usize,
    pub indicators: Vec<IndicatorState>,
    pub verification: VerificationPhase,
    pub verified: bool,
    /// `MM:SS` while a code is outstanding.
    pub timer: Option<String>,
    pub can_resend: bool,
    pub experience: Vec<ExperienceItemView>,
}

/// Projection of one experience entry with its display labels.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceItemView {
    pub id: Uuid,
    pub skill: SkillKey,
    pub skill_label: &'static str,
    pub years: YearsBucket,
    pub years_label: &'static str,
}

impl From<&ExperienceEntry> for ExperienceItemView {
    fn from(entry: &ExperienceEntry) -> Self {
        Self {
            id: entry.id,
            skill: entry.skill,
            skill_label: entry.skill.label(),
            years: entry.years,
            years_label: entry.years.label(),
        }
    }
}

/// Result of a successful code dispatch.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeDispatch {
    pub message: &'static str,
    pub expires_in_secs: i32,
    pub resend_cooldown_secs: u32,
}

/// Result of a successful submission.
#[derive(Debug, serde::Serialize)]
pub struct SubmitOutcome {
    pub message: &'static str,
    /// Where the front end goes next.
    pub next: &'static str,
}

/// Coordinates the signup flow end to end.
pub struct SignupManager {
    backend: Arc<dyn JoinBackend>,
    session: Arc<RwLock<WizardSession>>,
    /// The running countdown task, if any. Replacing it always aborts the
    /// prior task so at most one countdown ticks at a time.
    countdown: Mutex<Option<JoinHandle<()>>>,
}

impl SignupManager {
    pub fn new(backend: Arc<dyn JoinBackend>) -> Self {
        Self {
            backend,
            session: Arc::new(RwLock::new(WizardSession::default())),
            countdown: Mutex::new(None),
        }
    }

    /// Full snapshot for the status endpoint.
    pub async fn status(&self) -> WizardStatus {
        let s = self.session.read().await;
        WizardStatus {
            step: s.controller.current(),
            step_index: s.controller.current().index(),
            indicators: s.controller.indicators().to_vec(),
            verification: s.verification.phase(),
            verified: s.verification.verified(),
            timer: s.verification.timer_display(),
            can_resend: s.verification.can_resend(),
            experience: s.experience.list().iter().map(Into::into).collect(),
        }
    }

    /// Merge a partial field update into the session.
    pub async fn update_fields(&self, patch: FieldsPatch) {
        let mut s = self.session.write().await;
        patch.apply(&mut s.fields);
    }

    /// Advance to the next step if the current one validates.
    pub async fn advance(&self) -> Result<WizardStep, FlowError> {
        let mut s = self.session.write().await;
        let session = &mut *s;
        let step = session
            .controller
            .advance(&session.fields, session.verification.verified())?;
        tracing::info!(%step, "wizard advanced");
        Ok(step)
    }

    /// Go back one step. No-op at step 1.
    pub async fn retreat(&self) -> WizardStep {
        let mut s = self.session.write().await;
        s.controller.retreat()
    }

    /// Reset the whole wizard, cancelling any running countdown.
    pub async fn reset(&self) {
        self.stop_countdown().await;
        let mut s = self.session.write().await;
        s.reset();
        tracing::info!("wizard reset");
    }

    /// Validate the phone, run the duplicate check, and dispatch a code.
    pub async fn request_code(&self, raw_phone: &str) -> Result<CodeDispatch, FlowError> {
        self.dispatch_code(raw_phone, false).await
    }

    /// Re-run the full check + dispatch sequence, gated by the cool-down.
    pub async fn resend_code(&self, raw_phone: &str) -> Result<CodeDispatch, FlowError> {
        self.dispatch_code(raw_phone, true).await
    }

    async fn dispatch_code(&self, raw_phone: &str, resend: bool) -> Result<CodeDispatch, FlowError> {
        let mut s = self.session.write().await;
        if resend {
            s.verification.check_resend_allowed()?;
        }
        s.verification.begin_check(raw_phone)?;
        s.fields.phone = raw_phone.trim().to_string();
        let phone = s.verification.phone().to_string();

        if let Err(err) = self.backend.check_phone_duplicate(&phone).await {
            s.verification.mark_failed();
            return Err(err.into());
        }

        let code = match self.backend.send_sms_code(&phone).await {
            Ok(code) => code,
            Err(err) => {
                s.verification.mark_failed();
                return Err(err.into());
            }
        };

        s.verification.code_dispatched(code);
        drop(s);
        self.start_countdown().await;

        tracing::info!(resend, "verification code dispatched");
        Ok(CodeDispatch {
            message: if resend { MSG_CODE_RESENT } else { MSG_CODE_SENT },
            expires_in_secs: VERIFICATION_WINDOW_SECS,
            resend_cooldown_secs: RESEND_COOLDOWN_SECS,
        })
    }

    /// Check a submitted code; success unlocks step 1 and cancels the
    /// countdown.
    pub async fn confirm_code(&self, code: &str) -> Result<&'static str, FlowError> {
        {
            let mut s = self.session.write().await;
            s.verification.confirm(code.trim())?;
        }
        self.stop_countdown().await;
        tracing::info!("phone verified");
        Ok(MSG_VERIFIED)
    }

    /// Add an experience entry. Duplicate skills are rejected.
    pub async fn add_experience(
        &self,
        skill: SkillKey,
        years: YearsBucket,
    ) -> Result<(Uuid, &'static str), FlowError> {
        let mut s = self.session.write().await;
        let id = s.experience.add(skill, years)?;
        Ok((id, MSG_EXPERIENCE_ADDED))
    }

    /// Remove an experience entry. The caller must confirm, mirroring the
    /// original's confirm dialog; removal of an unknown id is a no-op.
    pub async fn remove_experience(&self, id: Uuid, confirmed: bool) -> Result<bool, FlowError> {
        if !confirmed {
            return Err(FlowError::validation(MSG_CONFIRM_REMOVAL));
        }
        let mut s = self.session.write().await;
        Ok(s.experience.remove(id))
    }

    /// Current experience entries.
    pub async fn experience(&self) -> Vec<ExperienceItemView> {
        let s = self.session.read().await;
        s.experience.list().iter().map(Into::into).collect()
    }

    /// Collect the payload and perform the single join submission.
    ///
    /// The session write lock is held across the request, so a second submit
    /// issued while one is in flight waits and then fails against the reset
    /// session instead of double-sending.
    pub async fn submit(&self) -> Result<SubmitOutcome, FlowError> {
        let mut s = self.session.write().await;
        if !s.verification.verified() {
            return Err(FlowError::validation(MSG_NEED_VERIFICATION));
        }
        let session = &mut *s;
        session
            .controller
            .validate_step(session.controller.current(), &session.fields)?;

        let payload = SignupPayload::collect(
            &session.fields,
            &session.experience,
            session.verification.phone(),
        );
        if payload.phone.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
            return Err(FlowError::validation(MSG_MISSING_REQUIRED));
        }

        self.backend.worker_join(&payload).await?;

        session.reset();
        drop(s);
        self.stop_countdown().await;

        tracing::info!("worker join submitted");
        Ok(SubmitOutcome {
            message: MSG_JOIN_DONE,
            next: "login",
        })
    }

    /// Spawn the 1 Hz countdown ticker, aborting any prior one.
    async fn start_countdown(&self) {
        let session = Arc::clone(&self.session);
        let handle = tokio::spawn(async move {
            let first = tokio::time::Instant::now() + std::time::Duration::from_secs(1);
            let interval = tokio::time::interval_at(first, std::time::Duration::from_secs(1));
            let mut ticks = IntervalStream::new(interval);
            while ticks.next().await.is_some() {
                let tick = session.write().await.verification.tick();
                match tick {
                    Tick::Running => {}
                    Tick::Expired => {
                        tracing::info!("verification window expired");
                        break;
                    }
                    Tick::Inert => break,
                }
            }
        });

        let mut slot = self.countdown.lock().await;
        if let Some(old) = slot.replace(handle) {
            old.abort();
        }
    }

    async fn stop_countdown(&self) {
        let mut slot = self.countdown.lock().await;
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}
