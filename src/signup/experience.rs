//! Work-experience registry — (skill, years) entries collected by the wizard.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FlowError;

const MSG_DUPLICATE_SKILL: &str = "이미 해당 직종의 경력이 추가되어 있습니다.";

/// The trades selectable on the wizard's skill step.
///
/// Serialized with the same keys the signup form uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKey {
    Concrete,
    Rebar,
    Carpenter,
    Electric,
    Plumber,
    Tile,
    Painter,
    General,
}

impl SkillKey {
    /// Display name shown in the wizard.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Concrete => "콘크리트공",
            Self::Rebar => "철근공",
            Self::Carpenter => "목수",
            Self::Electric => "전기공",
            Self::Plumber => "배관공",
            Self::Tile => "타일공",
            Self::Painter => "도장공",
            Self::General => "일반인부",
        }
    }
}

impl std::fmt::Display for SkillKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The fixed ordinal scale of career length offered by the wizard.
///
/// Each bucket carries the representative year count the backend multiplies
/// into months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum YearsBucket {
    UnderOne,
    OneToTwo,
    TwoToThree,
    ThreeToFour,
    FourToFive,
    FiveToSeven,
    SevenToTen,
    TenToFifteen,
    FifteenToTwenty,
    TwentyPlus,
}

impl YearsBucket {
    /// Representative number of years for this bucket.
    pub fn years(&self) -> u32 {
        match self {
            Self::UnderOne => 1,
            Self::OneToTwo => 2,
            Self::TwoToThree => 3,
            Self::ThreeToFour => 4,
            Self::FourToFive => 5,
            Self::FiveToSeven => 6,
            Self::SevenToTen => 8,
            Self::TenToFifteen => 11,
            Self::FifteenToTwenty => 16,
            Self::TwentyPlus => 21,
        }
    }

    /// Label shown in the experience dialog.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnderOne => "1년 미만",
            Self::OneToTwo => "1년 이상 ~ 2년 미만",
            Self::TwoToThree => "2년 이상 ~ 3년 미만",
            Self::ThreeToFour => "3년 이상 ~ 4년 미만",
            Self::FourToFive => "4년 이상 ~ 5년 미만",
            Self::FiveToSeven => "5년 이상 ~ 7년 미만",
            Self::SevenToTen => "7년 이상 ~ 10년 미만",
            Self::TenToFifteen => "10년 이상 ~ 15년 미만",
            Self::FifteenToTwenty => "15년 이상 ~ 20년 미만",
            Self::TwentyPlus => "20년 이상",
        }
    }
}

impl From<YearsBucket> for u32 {
    fn from(bucket: YearsBucket) -> Self {
        bucket.years()
    }
}

impl TryFrom<u32> for YearsBucket {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::UnderOne),
            2 => Ok(Self::OneToTwo),
            3 => Ok(Self::TwoToThree),
            4 => Ok(Self::ThreeToFour),
            5 => Ok(Self::FourToFive),
            6 => Ok(Self::FiveToSeven),
            8 => Ok(Self::SevenToTen),
            11 => Ok(Self::TenToFifteen),
            16 => Ok(Self::FifteenToTwenty),
            21 => Ok(Self::TwentyPlus),
            other => Err(format!("unknown years bucket: {other}")),
        }
    }
}

/// One entry in the experience list.
#[derive(Debug, Clone, Serialize)]
pub struct ExperienceEntry {
    pub id: Uuid,
    pub skill: SkillKey,
    pub years: YearsBucket,
}

/// In-memory list of experience entries, one per skill, insertion-ordered.
#[derive(Debug, Default)]
pub struct ExperienceRegistry {
    entries: Vec<ExperienceEntry>,
}

impl ExperienceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new entry. A skill already present is rejected, leaving the
    /// existing entry (and its years value) untouched.
    pub fn add(&mut self, skill: SkillKey, years: YearsBucket) -> Result<Uuid, FlowError> {
        if self.entries.iter().any(|e| e.skill == skill) {
            return Err(FlowError::validation(MSG_DUPLICATE_SKILL));
        }
        let id = Uuid::new_v4();
        self.entries.push(ExperienceEntry { id, skill, years });
        Ok(id)
    }

    /// Remove the entry with the given id. No-op when absent.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Current entries in insertion order.
    pub fn list(&self) -> &[ExperienceEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_insertion_order() {
        let mut registry = ExperienceRegistry::new();
        registry.add(SkillKey::Tile, YearsBucket::TwoToThree).unwrap();
        registry.add(SkillKey::Painter, YearsBucket::UnderOne).unwrap();
        registry.add(SkillKey::General, YearsBucket::TwentyPlus).unwrap();

        let skills: Vec<SkillKey> = registry.list().iter().map(|e| e.skill).collect();
        assert_eq!(skills, vec![SkillKey::Tile, SkillKey::Painter, SkillKey::General]);
    }

    #[test]
    fn duplicate_skill_is_rejected_and_original_survives() {
        let mut registry = ExperienceRegistry::new();
        registry.add(SkillKey::Tile, YearsBucket::TwoToThree).unwrap();

        let err = registry.add(SkillKey::Tile, YearsBucket::FourToFive).unwrap_err();
        assert_eq!(err.to_string(), "이미 해당 직종의 경력이 추가되어 있습니다.");

        assert_eq!(registry.list().len(), 1);
        assert_eq!(registry.list()[0].years, YearsBucket::TwoToThree);
    }

    #[test]
    fn remove_by_id() {
        let mut registry = ExperienceRegistry::new();
        let id = registry.add(SkillKey::Rebar, YearsBucket::OneToTwo).unwrap();
        registry.add(SkillKey::Electric, YearsBucket::SevenToTen).unwrap();

        assert!(registry.remove(id));
        assert_eq!(registry.list().len(), 1);
        assert_eq!(registry.list()[0].skill, SkillKey::Electric);

        // Removing again is a no-op.
        assert!(!registry.remove(id));
        assert_eq!(registry.list().len(), 1);
    }

    #[test]
    fn years_bucket_roundtrips_through_value() {
        for value in [1u32, 2, 3, 4, 5, 6, 8, 11, 16, 21] {
            let bucket = YearsBucket::try_from(value).unwrap();
            assert_eq!(u32::from(bucket), value);
        }
        assert!(YearsBucket::try_from(7).is_err());
        assert!(YearsBucket::try_from(0).is_err());
    }

    #[test]
    fn years_bucket_serde_uses_numeric_value() {
        let json = serde_json::to_string(&YearsBucket::SevenToTen).unwrap();
        assert_eq!(json, "8");
        let parsed: YearsBucket = serde_json::from_str("11").unwrap();
        assert_eq!(parsed, YearsBucket::TenToFifteen);
    }

    #[test]
    fn skill_labels_match_form() {
        assert_eq!(SkillKey::Concrete.label(), "콘크리트공");
        assert_eq!(SkillKey::General.label(), "일반인부");
        let json = serde_json::to_string(&SkillKey::Painter).unwrap();
        assert_eq!(json, "\"painter\"");
    }
}
