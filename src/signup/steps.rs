//! Wizard step state machine — tracks which step is active, validates
//! before advancing, and mirrors the step-indicator row.

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::FlowError;

use super::experience::SkillKey;
use super::payload::{Gender, Nationality};

pub const STEP_COUNT: usize = 7;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

const MSG_REQUIRED: &str = "필수 항목을 모두 입력해주세요.";
const MSG_NEED_VERIFICATION: &str = "전화번호 인증을 완료해주세요.";
const MSG_NEED_NATIONALITY: &str = "국적을 선택해주세요.";
const MSG_NEED_SKILL: &str = "최소 하나 이상의 기술을 선택해주세요.";
const MSG_ACCOUNT_DIGITS: &str = "계좌번호는 숫자만 입력해주세요.";
const MSG_ACCOUNT_HOLDER: &str = "예금주명을 정확히 입력해주세요.";
const MSG_BAD_EMAIL: &str = "올바른 이메일 형식을 입력해주세요.";
const MSG_PASSWORD_LEN: &str = "비밀번호는 8자 이상이어야 합니다.";
const MSG_PASSWORD_MISMATCH: &str = "비밀번호가 일치하지 않습니다.";
const MSG_NEED_TERMS: &str = "이용약관에 동의해주세요.";

/// The steps of the signup wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    PhoneVerification,
    PersonalInfo,
    Address,
    Skills,
    BankAccount,
    Introduction,
    Account,
}

impl WizardStep {
    pub const ALL: [WizardStep; STEP_COUNT] = [
        Self::PhoneVerification,
        Self::PersonalInfo,
        Self::Address,
        Self::Skills,
        Self::BankAccount,
        Self::Introduction,
        Self::Account,
    ];

    /// 1-indexed position, as shown to the user.
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0) + 1
    }

    /// The following step in the linear progression, if any.
    pub fn next(&self) -> Option<WizardStep> {
        Self::ALL.get(self.index()).copied()
    }

    /// The preceding step, if any.
    pub fn prev(&self) -> Option<WizardStep> {
        self.index().checked_sub(2).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn is_last(&self) -> bool {
        matches!(self, Self::Account)
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PhoneVerification => "phone_verification",
            Self::PersonalInfo => "personal_info",
            Self::Address => "address",
            Self::Skills => "skills",
            Self::BankAccount => "bank_account",
            Self::Introduction => "introduction",
            Self::Account => "account",
        };
        write!(f, "{s}")
    }
}

/// State of one dot in the step-indicator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorState {
    Inactive,
    Active,
    Completed,
}

/// Raw field values accumulated while walking the wizard.
#[derive(Debug)]
pub struct WizardFields {
    /// Phone number as typed (hyphen-formatted).
    pub phone: String,
    pub worker_name: String,
    /// Birth date, `YYYYMMDD`.
    pub birth: String,
    pub gender: Option<Gender>,
    pub nationality: Option<Nationality>,
    pub address: String,
    /// Trades selected on the skills step.
    pub skills: Vec<SkillKey>,
    pub bank: String,
    pub account_number: String,
    pub account_holder: String,
    pub self_introduction: String,
    pub email: String,
    pub password: SecretString,
    pub password_confirm: SecretString,
    pub terms_accepted: bool,
}

impl Default for WizardFields {
    fn default() -> Self {
        Self {
            phone: String::new(),
            worker_name: String::new(),
            birth: String::new(),
            gender: None,
            nationality: None,
            address: String::new(),
            skills: Vec::new(),
            bank: String::new(),
            account_number: String::new(),
            account_holder: String::new(),
            self_introduction: String::new(),
            email: String::new(),
            password: SecretString::from(""),
            password_confirm: SecretString::from(""),
            terms_accepted: false,
        }
    }
}

/// Partial update of wizard fields, as sent by the front end.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldsPatch {
    pub phone: Option<String>,
    pub worker_name: Option<String>,
    pub birth: Option<String>,
    pub gender: Option<Gender>,
    pub nationality: Option<Nationality>,
    pub address: Option<String>,
    pub skills: Option<Vec<SkillKey>>,
    pub bank: Option<String>,
    pub account_number: Option<String>,
    pub account_holder: Option<String>,
    pub self_introduction: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
    pub terms_accepted: Option<bool>,
}

impl FieldsPatch {
    /// Merge the set fields into `fields`.
    pub fn apply(self, fields: &mut WizardFields) {
        if let Some(v) = self.phone {
            fields.phone = v;
        }
        if let Some(v) = self.worker_name {
            fields.worker_name = v;
        }
        if let Some(v) = self.birth {
            fields.birth = v;
        }
        if let Some(v) = self.gender {
            fields.gender = Some(v);
        }
        if let Some(v) = self.nationality {
            fields.nationality = Some(v);
        }
        if let Some(v) = self.address {
            fields.address = v;
        }
        if let Some(v) = self.skills {
            fields.skills = v;
        }
        if let Some(v) = self.bank {
            fields.bank = v;
        }
        if let Some(v) = self.account_number {
            fields.account_number = v;
        }
        if let Some(v) = self.account_holder {
            fields.account_holder = v;
        }
        if let Some(v) = self.self_introduction {
            fields.self_introduction = v;
        }
        if let Some(v) = self.email {
            fields.email = v;
        }
        if let Some(v) = self.password {
            fields.password = SecretString::from(v);
        }
        if let Some(v) = self.password_confirm {
            fields.password_confirm = SecretString::from(v);
        }
        if let Some(v) = self.terms_accepted {
            fields.terms_accepted = v;
        }
    }
}

/// Tracks the active step and the indicator row, and gates advancement on
/// per-step validation. Owns no network calls.
#[derive(Debug)]
pub struct FormStepController {
    current: WizardStep,
    indicators: [IndicatorState; STEP_COUNT],
    email_re: Regex,
    digits_re: Regex,
}

impl Default for FormStepController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormStepController {
    pub fn new() -> Self {
        let mut indicators = [IndicatorState::Inactive; STEP_COUNT];
        indicators[0] = IndicatorState::Active;
        Self {
            current: WizardStep::PhoneVerification,
            indicators,
            email_re: Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
                .expect("email pattern is valid"),
            digits_re: Regex::new(r"^\d+$").expect("digits pattern is valid"),
        }
    }

    pub fn current(&self) -> WizardStep {
        self.current
    }

    pub fn indicators(&self) -> &[IndicatorState; STEP_COUNT] {
        &self.indicators
    }

    /// Move to the next step if the current one validates.
    ///
    /// At the last step this is a no-op. Step 1 additionally requires the
    /// phone to have been verified, regardless of field contents.
    pub fn advance(
        &mut self,
        fields: &WizardFields,
        phone_verified: bool,
    ) -> Result<WizardStep, FlowError> {
        if self.current == WizardStep::PhoneVerification && !phone_verified {
            return Err(FlowError::validation(MSG_NEED_VERIFICATION));
        }
        self.validate_step(self.current, fields)?;

        if let Some(next) = self.current.next() {
            self.indicators[self.current.index() - 1] = IndicatorState::Completed;
            self.indicators[next.index() - 1] = IndicatorState::Active;
            self.current = next;
        }
        Ok(self.current)
    }

    /// Move back one step. No-op at step 1. The re-entered step loses its
    /// "completed" mark.
    pub fn retreat(&mut self) -> WizardStep {
        if let Some(prev) = self.current.prev() {
            self.indicators[self.current.index() - 1] = IndicatorState::Inactive;
            self.indicators[prev.index() - 1] = IndicatorState::Active;
            self.current = prev;
        }
        self.current
    }

    /// Return to step 1 with a fresh indicator row.
    pub fn reset(&mut self) {
        self.current = WizardStep::PhoneVerification;
        self.indicators = [IndicatorState::Inactive; STEP_COUNT];
        self.indicators[0] = IndicatorState::Active;
    }

    /// Validate the fields a step requires before it can be left.
    pub fn validate_step(&self, step: WizardStep, fields: &WizardFields) -> Result<(), FlowError> {
        let required: Vec<&str> = match step {
            WizardStep::PhoneVerification => vec![fields.phone.as_str()],
            WizardStep::PersonalInfo => {
                vec![fields.worker_name.as_str(), fields.birth.as_str()]
            }
            WizardStep::Address => vec![fields.address.as_str()],
            WizardStep::Skills | WizardStep::Introduction => vec![],
            WizardStep::BankAccount => vec![
                fields.bank.as_str(),
                fields.account_number.as_str(),
                fields.account_holder.as_str(),
            ],
            WizardStep::Account => vec![fields.email.as_str()],
        };
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(FlowError::validation(MSG_REQUIRED));
        }

        match step {
            WizardStep::PersonalInfo => {
                if fields.nationality.is_none() {
                    return Err(FlowError::validation(MSG_NEED_NATIONALITY));
                }
            }
            WizardStep::Skills => {
                if fields.skills.is_empty() {
                    return Err(FlowError::validation(MSG_NEED_SKILL));
                }
            }
            WizardStep::BankAccount => {
                if !self.digits_re.is_match(&fields.account_number) {
                    return Err(FlowError::validation(MSG_ACCOUNT_DIGITS));
                }
                if fields.account_holder.trim().chars().count() < 2 {
                    return Err(FlowError::validation(MSG_ACCOUNT_HOLDER));
                }
            }
            WizardStep::Account => {
                if !self.email_re.is_match(&fields.email) {
                    return Err(FlowError::validation(MSG_BAD_EMAIL));
                }
                let password = fields.password.expose_secret();
                if password.chars().count() < MIN_PASSWORD_LEN {
                    return Err(FlowError::validation(MSG_PASSWORD_LEN));
                }
                if password != fields.password_confirm.expose_secret() {
                    return Err(FlowError::validation(MSG_PASSWORD_MISMATCH));
                }
                if !fields.terms_accepted {
                    return Err(FlowError::validation(MSG_NEED_TERMS));
                }
            }
            _ => {}
        }
        Ok(())
    }

}
