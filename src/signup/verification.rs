//! Phone verification state machine.
//!
//! Progresses Idle → CheckingDuplicate → CodeSent → Verified, with Failed
//! re-enterable from any state. The session is pure state: network calls and
//! the 1 Hz countdown driver live in the manager.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::FlowError;

/// Validity window of an issued code, in seconds.
pub const VERIFICATION_WINDOW_SECS: i32 = 180;

/// Seconds after a send before the resend control unlocks.
pub const RESEND_COOLDOWN_SECS: u32 = 30;

/// Exact length of a verification code.
pub const AUTH_CODE_LEN: usize = 6;

const MSG_BAD_FORMAT: &str = "올바른 전화번호 형식을 입력해주세요. (010-0000-0000)";
const MSG_NEED_SIX_DIGITS: &str = "6자리 인증번호를 입력해주세요.";
const MSG_CODE_MISMATCH: &str = "인증번호가 올바르지 않습니다. 다시 확인해주세요.";
const MSG_RESEND_COOLDOWN: &str = "잠시 후 인증번호 재발송이 가능합니다.";

/// The domestic mobile format the wizard accepts.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^010-\d{4}-\d{4}$").expect("phone pattern is valid"));

/// Phases of the verification flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationPhase {
    Idle,
    CheckingDuplicate,
    CodeSent,
    Verified,
    Failed,
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Countdown still running.
    Running,
    /// The window just closed: code cleared, flow failed.
    Expired,
    /// No countdown is active; nothing changed.
    Inert,
}

/// Tracks phone-ownership proof for the wizard.
#[derive(Debug)]
pub struct VerificationSession {
    phase: VerificationPhase,
    /// Normalized digits-only phone, set when a check begins.
    phone: String,
    issued_code: Option<String>,
    remaining_seconds: i32,
    resend_cooldown: u32,
    verified: bool,
}

impl Default for VerificationSession {
    fn default() -> Self {
        Self {
            phase: VerificationPhase::Idle,
            phone: String::new(),
            issued_code: None,
            remaining_seconds: VERIFICATION_WINDOW_SECS,
            resend_cooldown: 0,
            verified: false,
        }
    }
}

/// Strip separators from a formatted phone number.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| *c != '-').collect()
}

/// Whether a raw phone matches the `010-XXXX-XXXX` input format.
pub fn phone_format_ok(raw: &str) -> bool {
    PHONE_RE.is_match(raw)
}

impl VerificationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> VerificationPhase {
        self.phase
    }

    pub fn verified(&self) -> bool {
        self.verified
    }

    /// Digits-only phone of the current session.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn remaining_seconds(&self) -> i32 {
        self.remaining_seconds
    }

    /// `MM:SS` display while a code is outstanding.
    pub fn timer_display(&self) -> Option<String> {
        if self.phase != VerificationPhase::CodeSent {
            return None;
        }
        let secs = self.remaining_seconds.max(0);
        Some(format!("{:02}:{:02}", secs / 60, secs % 60))
    }

    /// Validate the raw phone format and enter the duplicate-check phase.
    /// Rejecting here guarantees no network call is made for bad input.
    pub fn begin_check(&mut self, raw_phone: &str) -> Result<(), FlowError> {
        if !phone_format_ok(raw_phone) {
            return Err(FlowError::validation(MSG_BAD_FORMAT));
        }
        self.phone = normalize_phone(raw_phone);
        self.phase = VerificationPhase::CheckingDuplicate;
        Ok(())
    }

    /// Record a failed check or dispatch; the flow stays re-enterable.
    pub fn mark_failed(&mut self) {
        self.phase = VerificationPhase::Failed;
    }

    /// A code was dispatched: replace the session state wholesale and start
    /// a fresh window and resend cool-down.
    pub fn code_dispatched(&mut self, code: String) {
        self.issued_code = Some(code);
        self.remaining_seconds = VERIFICATION_WINDOW_SECS;
        self.resend_cooldown = RESEND_COOLDOWN_SECS;
        self.verified = false;
        self.phase = VerificationPhase::CodeSent;
    }

    /// Advance the countdown by one second.
    ///
    /// When the window closes the issued code is cleared and the flow fails;
    /// further ticks are inert.
    pub fn tick(&mut self) -> Tick {
        if self.phase != VerificationPhase::CodeSent {
            return Tick::Inert;
        }
        self.resend_cooldown = self.resend_cooldown.saturating_sub(1);
        self.remaining_seconds -= 1;
        if self.remaining_seconds < 0 {
            self.issued_code = None;
            self.verified = false;
            self.phase = VerificationPhase::Failed;
            Tick::Expired
        } else {
            Tick::Running
        }
    }

    /// Check a user-submitted code against the issued one.
    ///
    /// Succeeds only while the window is open; failure leaves the session
    /// untouched so the user may retry with remaining time.
    pub fn confirm(&mut self, code: &str) -> Result<(), FlowError> {
        if code.chars().count() != AUTH_CODE_LEN {
            return Err(FlowError::validation(MSG_NEED_SIX_DIGITS));
        }
        match &self.issued_code {
            Some(issued) if issued == code && self.remaining_seconds >= 0 => {
                self.verified = true;
                self.phase = VerificationPhase::Verified;
                Ok(())
            }
            _ => Err(FlowError::validation(MSG_CODE_MISMATCH)),
        }
    }

    /// Whether the resend control is currently unlocked.
    pub fn can_resend(&self) -> bool {
        self.phase == VerificationPhase::CodeSent && self.resend_cooldown == 0
    }

    /// Guard a resend attempt against the cool-down.
    pub fn check_resend_allowed(&self) -> Result<(), FlowError> {
        if self.phase == VerificationPhase::CodeSent && self.resend_cooldown > 0 {
            return Err(FlowError::validation(MSG_RESEND_COOLDOWN));
        }
        Ok(())
    }

    /// Drop everything back to the initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
