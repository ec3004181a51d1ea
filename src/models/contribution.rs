use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Quartile bucket GitHub assigns to a day of the contribution calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributionLevel {
    #[default]
    None,
    FirstQuartile,
    SecondQuartile,
    ThirdQuartile,
    FourthQuartile,
}

impl ContributionLevel {
    pub fn level_class(self) -> LevelClass {
        match self {
            ContributionLevel::None => LevelClass::Level0,
            ContributionLevel::FirstQuartile => LevelClass::Level1,
            ContributionLevel::SecondQuartile => LevelClass::Level2,
            ContributionLevel::ThirdQuartile => LevelClass::Level3,
            ContributionLevel::FourthQuartile => LevelClass::Level4,
        }
    }
}

/// Discrete rendering class of a calendar cell, `contribution-level-0` to `-4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LevelClass {
    #[default]
    #[serde(rename = "contribution-level-0")]
    Level0,
    #[serde(rename = "contribution-level-1")]
    Level1,
    #[serde(rename = "contribution-level-2")]
    Level2,
    #[serde(rename = "contribution-level-3")]
    Level3,
    #[serde(rename = "contribution-level-4")]
    Level4,
}

impl LevelClass {
    /// Position in a five-colour palette
    pub fn index(self) -> usize {
        match self {
            LevelClass::Level0 => 0,
            LevelClass::Level1 => 1,
            LevelClass::Level2 => 2,
            LevelClass::Level3 => 3,
            LevelClass::Level4 => 4,
        }
    }
}

/// A single day as reported by the upstream calendar
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub value: u32,
    pub level: ContributionLevel,
}

/// Calendar payload of `/api/contributions`.
///
/// `total_contributions` comes straight from GitHub and is not recomputed from
/// the individual days.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: u32,
    pub contributions: Vec<ContributionDay>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDay {
    pub date: NaiveDate,
    pub value: u32,
    pub level_class: LevelClass,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridWeek {
    pub days: Vec<GridDay>,
}

/// Fixed 53 x 7 calendar surface, weeks starting on Sunday
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarGrid {
    pub weeks: Vec<GridWeek>,
}

impl CalendarGrid {
    pub fn days(&self) -> impl Iterator<Item = &GridDay> {
        self.weeks.iter().flat_map(|week| week.days.iter())
    }
}

#[cfg(test)]
impl CalendarGrid {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days().next().map(|day| day.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days().last().map(|day| day.date)
    }
}

/// Inclusive time window forwarded to `contributionsCollection(from:, to:)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn from_rfc3339(&self) -> String {
        self.from.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    pub fn to_rfc3339(&self) -> String {
        self.to.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_serialization_matches_github_names() {
        assert_eq!(
            serde_json::to_string(&ContributionLevel::FourthQuartile).unwrap(),
            "\"FOURTH_QUARTILE\""
        );
        let level: ContributionLevel = serde_json::from_str("\"NONE\"").unwrap();
        assert_eq!(level, ContributionLevel::None);
    }

    #[test]
    fn test_level_class_mapping_is_bijective() {
        let levels = [
            ContributionLevel::None,
            ContributionLevel::FirstQuartile,
            ContributionLevel::SecondQuartile,
            ContributionLevel::ThirdQuartile,
            ContributionLevel::FourthQuartile,
        ];
        let indices: Vec<usize> = levels.iter().map(|l| l.level_class().index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(
            serde_json::to_string(&ContributionLevel::ThirdQuartile.level_class()).unwrap(),
            "\"contribution-level-3\""
        );
    }

    #[test]
    fn test_grid_day_uses_camel_case_and_iso_dates() {
        let day = GridDay {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            value: 5,
            level_class: LevelClass::Level3,
        };
        assert_eq!(
            serde_json::to_value(&day).unwrap(),
            serde_json::json!({
                "date": "2024-01-01",
                "value": 5,
                "levelClass": "contribution-level-3"
            })
        );
    }

    #[test]
    fn test_date_range_keeps_subsecond_precision() {
        let range = DateRange {
            from: DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            to: DateTime::parse_from_rfc3339("2024-12-31T23:59:59.999Z")
                .unwrap()
                .with_timezone(&Utc),
        };
        assert_eq!(range.from_rfc3339(), "2024-01-01T00:00:00Z");
        assert_eq!(range.to_rfc3339(), "2024-12-31T23:59:59.999Z");
    }
}
