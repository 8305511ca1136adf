#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Case record types for the epidemic dashboard.
//!
//! A [`CaseRecord`] is one `(region, date)` observation from the tabular
//! source. Field names are canonical: they are what the source header row
//! uses and what an export writes back out. The Chinese column headers of
//! the Hong Kong district dataset are accepted as aliases.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Date-only formats accepted for `report_date`.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Timestamp formats accepted for `report_date`. The time part is dropped.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// A column of the case record schema: canonical name plus the header
/// alias used by the district spreadsheet export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseField {
    /// Canonical (English) column name.
    pub name: &'static str,
    /// Alternate header accepted on input.
    pub alias: &'static str,
}

impl CaseField {
    /// Whether `header` names this field, by canonical name or alias.
    #[must_use]
    pub fn matches(&self, header: &str) -> bool {
        header == self.name || header == self.alias
    }
}

/// Every column a case record source must provide, in canonical order.
pub const CASE_FIELDS: &[CaseField] = &[
    CaseField {
        name: "region_name",
        alias: "地区名称",
    },
    CaseField {
        name: "report_date",
        alias: "报告日期",
    },
    CaseField {
        name: "new_confirmed",
        alias: "新增确诊",
    },
    CaseField {
        name: "cumulative_confirmed",
        alias: "累计确诊",
    },
    CaseField {
        name: "new_recovered",
        alias: "新增康复",
    },
    CaseField {
        name: "cumulative_recovered",
        alias: "累计康复",
    },
    CaseField {
        name: "new_deaths",
        alias: "新增死亡",
    },
    CaseField {
        name: "cumulative_deaths",
        alias: "累计死亡",
    },
    CaseField {
        name: "population",
        alias: "人口",
    },
];

/// One observation of a region's case counts on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Region (district) name in its local language.
    #[serde(alias = "地区名称")]
    pub region_name: String,
    /// Date the figures were reported for.
    #[serde(alias = "报告日期", deserialize_with = "deserialize_report_date")]
    pub report_date: NaiveDate,
    /// Confirmed cases newly reported on this date.
    #[serde(alias = "新增确诊", deserialize_with = "deserialize_count")]
    pub new_confirmed: u64,
    /// Running total of confirmed cases.
    #[serde(alias = "累计确诊", deserialize_with = "deserialize_count")]
    pub cumulative_confirmed: u64,
    /// Recoveries newly reported on this date.
    #[serde(alias = "新增康复", deserialize_with = "deserialize_count")]
    pub new_recovered: u64,
    /// Running total of recoveries.
    #[serde(alias = "累计康复", deserialize_with = "deserialize_count")]
    pub cumulative_recovered: u64,
    /// Deaths newly reported on this date.
    #[serde(alias = "新增死亡", deserialize_with = "deserialize_count")]
    pub new_deaths: u64,
    /// Running total of deaths.
    #[serde(alias = "累计死亡", deserialize_with = "deserialize_count")]
    pub cumulative_deaths: u64,
    /// Resident population of the region. Kept signed and optional so a
    /// bad value reaches the aggregation step, which rejects it.
    #[serde(
        alias = "人口",
        default,
        deserialize_with = "deserialize_population"
    )]
    pub population: Option<i64>,
}

/// Active cases from the three cumulative counts.
///
/// Signed so that inconsistent source data shows up as a negative value
/// instead of wrapping.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn active_cases(confirmed: u64, recovered: u64, deaths: u64) -> i64 {
    confirmed as i64 - recovered as i64 - deaths as i64
}

/// Parses a report date in any of the accepted formats.
///
/// Returns `None` if the string matches none of them.
#[must_use]
pub fn parse_report_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

fn deserialize_report_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_report_date(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid report_date '{raw}': expected YYYY-MM-DD"
        ))
    })
}

/// Accepts an integer, or a float with no fractional part (`100000.0`, as
/// written by spreadsheet tools once a column holds a blank). A blank cell
/// yields `None`.
struct WholeNumberVisitor;

impl<'de> Visitor<'de> for WholeNumberVisitor {
    type Value = Option<i128>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a whole number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.into()))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Self::Value, E> {
        i128::try_from(v)
            .map(Some)
            .map_err(|_| E::invalid_value(Unexpected::Other("out of range integer"), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        whole_from_float(v)
            .map(Some)
            .ok_or_else(|| E::invalid_value(Unexpected::Float(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if let Ok(n) = trimmed.parse::<i128>() {
            return Ok(Some(n));
        }
        trimmed
            .parse::<f64>()
            .ok()
            .and_then(whole_from_float)
            .map(Some)
            .ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn whole_from_float(v: f64) -> Option<i128> {
    (v.is_finite() && v.fract() == 0.0 && v.abs() < 1e30).then_some(v as i128)
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let n = deserializer
        .deserialize_any(WholeNumberVisitor)?
        .ok_or_else(|| de::Error::custom("missing count"))?;
    u64::try_from(n).map_err(|_| {
        de::Error::custom(format!(
            "invalid count {n}: expected a non-negative whole number"
        ))
    })
}

fn deserialize_population<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer
        .deserialize_any(WholeNumberVisitor)?
        .map(|n| {
            i64::try_from(n)
                .map_err(|_| de::Error::custom(format!("population {n} is out of range")))
        })
        .transpose()
}
