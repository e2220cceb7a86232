use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PreferencesError;

pub const MIN_DURATION_DAYS: u32 = 1;
pub const MAX_DURATION_DAYS: u32 = 14;
pub const MAX_INTERESTS: usize = 5;

/// Interests offered by the form. Input outside this list is accepted, not rejected.
pub const INTEREST_CATALOG: [&str; 10] = [
    "历史文化",
    "美食探店",
    "自然徒步",
    "冒险运动",
    "休闲疗养",
    "购物买买买",
    "夜生活",
    "摄影打卡",
    "艺术展览",
    "小众秘境",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetLevel {
    Budget,
    Moderate,
    Luxury,
}

impl BudgetLevel {
    pub const ALL: [BudgetLevel; 3] = [
        BudgetLevel::Budget,
        BudgetLevel::Moderate,
        BudgetLevel::Luxury,
    ];

    /// Value sent to the generation service.
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetLevel::Budget => "Budget",
            BudgetLevel::Moderate => "Moderate",
            BudgetLevel::Luxury => "Luxury",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetLevel::Budget => "经济型",
            BudgetLevel::Moderate => "舒适型",
            BudgetLevel::Luxury => "豪华型",
        }
    }
}

impl fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetLevel {
    type Err = PreferencesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BudgetLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PreferencesError::UnknownBudgetLevel(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelerGroup {
    #[serde(rename = "Solo Traveler")]
    Solo,
    #[serde(rename = "Couple")]
    Couple,
    #[serde(rename = "Family with Kids")]
    Family,
    #[serde(rename = "Group of Friends")]
    Friends,
}

impl TravelerGroup {
    pub const ALL: [TravelerGroup; 4] = [
        TravelerGroup::Solo,
        TravelerGroup::Couple,
        TravelerGroup::Family,
        TravelerGroup::Friends,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelerGroup::Solo => "Solo Traveler",
            TravelerGroup::Couple => "Couple",
            TravelerGroup::Family => "Family with Kids",
            TravelerGroup::Friends => "Group of Friends",
        }
    }

    /// Short CLI spelling.
    pub fn keyword(&self) -> &'static str {
        match self {
            TravelerGroup::Solo => "solo",
            TravelerGroup::Couple => "couple",
            TravelerGroup::Family => "family",
            TravelerGroup::Friends => "friends",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TravelerGroup::Solo => "独自一人",
            TravelerGroup::Couple => "情侣/夫妻",
            TravelerGroup::Family => "亲子游",
            TravelerGroup::Friends => "朋友结伴",
        }
    }
}

impl fmt::Display for TravelerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelerGroup {
    type Err = PreferencesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        TravelerGroup::ALL
            .into_iter()
            .find(|group| {
                group.as_str().eq_ignore_ascii_case(needle)
                    || group.keyword().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| PreferencesError::UnknownTravelerGroup(s.to_string()))
    }
}

/// Form input for one generation cycle. Consumed by the gateway, then dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub destination: String,
    pub duration: u32,
    pub budget_level: BudgetLevel,
    pub interests: Vec<String>,
    pub travelers: TravelerGroup,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            destination: String::new(),
            duration: 3,
            budget_level: BudgetLevel::Moderate,
            interests: Vec::new(),
            travelers: TravelerGroup::Couple,
        }
    }
}

impl UserPreferences {
    pub fn new(destination: impl Into<String>, duration: u32) -> Self {
        Self {
            destination: destination.into(),
            duration,
            ..Self::default()
        }
    }

    pub fn with_budget_level(mut self, budget_level: BudgetLevel) -> Self {
        self.budget_level = budget_level;
        self
    }

    pub fn with_travelers(mut self, travelers: TravelerGroup) -> Self {
        self.travelers = travelers;
        self
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), PreferencesError> {
        if self.destination.trim().is_empty() {
            return Err(PreferencesError::EmptyDestination);
        }

        if !(MIN_DURATION_DAYS..=MAX_DURATION_DAYS).contains(&self.duration) {
            return Err(PreferencesError::DurationOutOfRange {
                got: self.duration,
                min: MIN_DURATION_DAYS,
                max: MAX_DURATION_DAYS,
            });
        }

        if self.interests.len() > MAX_INTERESTS {
            return Err(PreferencesError::TooManyInterests {
                got: self.interests.len(),
                max: MAX_INTERESTS,
            });
        }

        for interest in &self.interests {
            if !INTEREST_CATALOG.contains(&interest.as_str()) {
                debug!(
                    target: "wander::preferences",
                    interest = %interest,
                    "interest outside catalog"
                );
            }
        }

        Ok(())
    }

    /// Select or deselect an interest the way the form chips do. Adding a sixth interest is
    /// ignored. Returns whether the interest ends up selected.
    pub fn toggle_interest(&mut self, interest: &str) -> bool {
        if let Some(position) = self.interests.iter().position(|item| item == interest) {
            self.interests.remove(position);
            return false;
        }

        if self.interests.len() >= MAX_INTERESTS {
            return false;
        }

        self.interests.push(interest.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_form() {
        let prefs = UserPreferences::default();
        assert_eq!(prefs.duration, 3);
        assert_eq!(prefs.budget_level, BudgetLevel::Moderate);
        assert_eq!(prefs.travelers, TravelerGroup::Couple);
        assert!(prefs.validate().is_err());
    }

    #[test]
    fn test_duration_bounds() {
        assert!(UserPreferences::new("京都", 1).validate().is_ok());
        assert!(UserPreferences::new("京都", 14).validate().is_ok());
        assert_eq!(
            UserPreferences::new("京都", 15).validate(),
            Err(PreferencesError::DurationOutOfRange {
                got: 15,
                min: 1,
                max: 14
            })
        );
        assert!(UserPreferences::new("京都", 0).validate().is_err());
    }

    #[test]
    fn test_blank_destination_rejected() {
        assert_eq!(
            UserPreferences::new("   ", 3).validate(),
            Err(PreferencesError::EmptyDestination)
        );
    }

    #[test]
    fn test_interest_cap() {
        let prefs = UserPreferences::new("巴黎", 3)
            .with_interests(INTEREST_CATALOG.iter().take(6).copied());
        assert!(matches!(
            prefs.validate(),
            Err(PreferencesError::TooManyInterests { got: 6, max: 5 })
        ));
    }

    #[test]
    fn test_off_catalog_interest_accepted() {
        let prefs = UserPreferences::new("巴黎", 3).with_interests(["观鸟"]);
        assert!(prefs.validate().is_ok());
    }

    #[test]
    fn test_toggle_interest_caps_at_five() {
        let mut prefs = UserPreferences::new("三亚", 4);
        for interest in INTEREST_CATALOG.iter().take(5) {
            assert!(prefs.toggle_interest(interest));
        }
        assert!(!prefs.toggle_interest("小众秘境"));
        assert_eq!(prefs.interests.len(), 5);

        assert!(!prefs.toggle_interest("历史文化"));
        assert_eq!(prefs.interests.len(), 4);
        assert!(prefs.toggle_interest("小众秘境"));
    }

    #[test]
    fn test_enum_parsing_and_wire_names() {
        assert_eq!("luxury".parse::<BudgetLevel>().unwrap(), BudgetLevel::Luxury);
        assert!("cheap".parse::<BudgetLevel>().is_err());
        assert_eq!("family".parse::<TravelerGroup>().unwrap(), TravelerGroup::Family);
        assert_eq!(
            "Group of Friends".parse::<TravelerGroup>().unwrap(),
            TravelerGroup::Friends
        );

        let json = serde_json::to_value(UserPreferences::new("京都", 2)).unwrap();
        assert_eq!(json["budgetLevel"], "Moderate");
        assert_eq!(json["travelers"], "Couple");
    }
}
