//! Final signup payload assembly.
//!
//! The payload is derived once at submission time from the wizard fields,
//! the experience registry, and the verified phone number. It is immutable
//! after construction and sent exactly once per submit action.

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::experience::{ExperienceRegistry, SkillKey};
use super::steps::WizardFields;

/// Months per experience year in the backend's vocabulary.
const MONTHS_PER_YEAR: u32 = 12;

/// Development fallbacks for payload fields the wizard left empty.
///
/// The original product fills these sample values instead of failing
/// validation; preserved as documented placeholder behavior.
pub mod fallback {
    pub const WORKER_NAME: &str = "홍길동";
    pub const BIRTH: &str = "19750101";
    pub const BANK: &str = "국민은행";
    pub const ACCOUNT: &str = "12341234123412";
    pub const ADDRESS: &str = "부산광역시 사하구 낙동대로 550번길 37";
    pub const LATITUDE: f64 = 35.116777388697734;
    pub const LONGITUDE: f64 = 128.9685393114043;
    pub const DEVICE_TOKEN: &str = "token";
    pub const EXPERIENCE_MONTHS: u32 = 24;
}

/// The backend's trade vocabulary for `workExperienceRequest.tech`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TechCode {
    Normal,
    Foreman,
    SkilledLaborer,
    Helper,
    Scaffolder,
    FormworkCarpenter,
    RebarWorker,
    SteelStructure,
    Welder,
    ConcreteWorker,
    Bricklayer,
    DrywallFinisher,
    ConstructionCarpenter,
    WindowDoorInstaller,
    Glazier,
    WaterproofingWorker,
    Plasterer,
    Tile,
    Painter,
    InteriorFinisher,
    WallpaperInstaller,
    Polisher,
    Stonemason,
    GroutWorker,
    PanelAssembler,
    Roofer,
    Landscaper,
    Caulker,
    Plumber,
    BoilerTechnician,
    SanitaryTechnician,
    DuctInstaller,
    InsulationWorker,
    MechanicalEquipmentTechnician,
    Electrician,
    TelecommunicationsInstaller,
    TelecommunicationsEquipmentInstaller,
}

impl TechCode {
    /// Resolve a trade display name (the job-board vocabulary) to its code.
    pub fn from_label(label: &str) -> Option<Self> {
        let code = match label {
            "보통인부" => Self::Normal,
            "작업반장" => Self::Foreman,
            "특별인부" => Self::SkilledLaborer,
            "조력공" => Self::Helper,
            "비계공" => Self::Scaffolder,
            "형틀목공" => Self::FormworkCarpenter,
            "철근공" => Self::RebarWorker,
            "철골공" => Self::SteelStructure,
            "용접공" => Self::Welder,
            "콘크리트공" => Self::ConcreteWorker,
            "조적공" => Self::Bricklayer,
            "견출공" => Self::DrywallFinisher,
            "건축목공" => Self::ConstructionCarpenter,
            "창호공" => Self::WindowDoorInstaller,
            "유리공" => Self::Glazier,
            "방수공" => Self::WaterproofingWorker,
            "미장공" => Self::Plasterer,
            "타일공" => Self::Tile,
            "도장공" => Self::Painter,
            "내장공" => Self::InteriorFinisher,
            "도배공" => Self::WallpaperInstaller,
            "연마공" => Self::Polisher,
            "석공" => Self::Stonemason,
            "줄눈공" => Self::GroutWorker,
            "판넬조립공" => Self::PanelAssembler,
            "지붕잇기공" => Self::Roofer,
            "조경공" => Self::Landscaper,
            "코킹공" => Self::Caulker,
            "배관공" => Self::Plumber,
            "보일러공" => Self::BoilerTechnician,
            "위생공" => Self::SanitaryTechnician,
            "덕트공" => Self::DuctInstaller,
            "보온공" => Self::InsulationWorker,
            "기계설비공" => Self::MechanicalEquipmentTechnician,
            "내선전공" => Self::Electrician,
            "통신내선공" => Self::TelecommunicationsInstaller,
            "통신설비공" => Self::TelecommunicationsEquipmentInstaller,
            _ => return None,
        };
        Some(code)
    }
}

impl From<SkillKey> for TechCode {
    fn from(skill: SkillKey) -> Self {
        match skill {
            SkillKey::Concrete => Self::ConcreteWorker,
            SkillKey::Rebar => Self::RebarWorker,
            SkillKey::Carpenter => Self::ConstructionCarpenter,
            SkillKey::Electric => Self::Electrician,
            SkillKey::Plumber => Self::Plumber,
            SkillKey::Tile => Self::Tile,
            SkillKey::Painter => Self::Painter,
            SkillKey::General => Self::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Nationality {
    Korean,
    Foreigner,
}

/// One experience record in the join request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperienceRequest {
    pub tech: TechCode,
    pub experience_months: u32,
}

/// The join request body, JSON-encoded under the `request` multipart part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub login_id: String,
    pub password: String,
    pub phone: String,
    pub email: String,
    pub role: String,
    pub privacy_consent: bool,
    pub device_token: String,
    pub is_notification: bool,
    pub worker_name: String,
    pub birth: String,
    pub gender: Gender,
    pub nationality: Nationality,
    pub account_holder: String,
    pub account: String,
    pub bank: String,
    pub worker_card_number: Option<String>,
    pub credential_liability_consent: bool,
    pub work_experience_request: Vec<WorkExperienceRequest>,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl SignupPayload {
    /// Assemble the payload from the wizard's accumulated state.
    ///
    /// `phone_digits` is the verified phone with separators stripped; it
    /// doubles as the login id. Empty optional fields fall back to the
    /// development placeholders, and an empty experience list is padded
    /// with a single NORMAL / 24-month entry.
    pub fn collect(
        fields: &WizardFields,
        experience: &ExperienceRegistry,
        phone_digits: &str,
    ) -> Self {
        let worker_name = non_empty_or(&fields.worker_name, fallback::WORKER_NAME);

        let mut work_experience_request: Vec<WorkExperienceRequest> = experience
            .list()
            .iter()
            .map(|entry| WorkExperienceRequest {
                tech: entry.skill.into(),
                experience_months: entry.years.years() * MONTHS_PER_YEAR,
            })
            .collect();
        if work_experience_request.is_empty() {
            work_experience_request.push(WorkExperienceRequest {
                tech: TechCode::Normal,
                experience_months: fallback::EXPERIENCE_MONTHS,
            });
        }

        Self {
            login_id: phone_digits.to_string(),
            password: fields.password.expose_secret().to_string(),
            phone: phone_digits.to_string(),
            email: fields.email.clone(),
            role: "ROLE_WORKER".to_string(),
            privacy_consent: fields.terms_accepted,
            device_token: fallback::DEVICE_TOKEN.to_string(),
            is_notification: true,
            worker_name: worker_name.clone(),
            birth: non_empty_or(&fields.birth, fallback::BIRTH),
            gender: fields.gender.unwrap_or(Gender::Male),
            nationality: fields.nationality.unwrap_or(Nationality::Korean),
            account_holder: non_empty_or(&fields.account_holder, &worker_name),
            account: non_empty_or(&fields.account_number, fallback::ACCOUNT),
            bank: non_empty_or(&fields.bank, fallback::BANK),
            worker_card_number: None,
            credential_liability_consent: true,
            work_experience_request,
            address: non_empty_or(&fields.address, fallback::ADDRESS),
            latitude: fallback::LATITUDE,
            longitude: fallback::LONGITUDE,
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
