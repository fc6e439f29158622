//! Literal formatting for filter operands.

use std::fmt::Debug;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::dialect::Dialect;
use crate::error::{Result, StepSqlError};
use crate::types::ColumnType;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FRACTION_FORMAT: &str = "%.f";

/// Turns a raw operand into a SQL literal of the column's type.
pub trait ValueFormatter: Debug + Send + Sync {
    fn format(&self, dialect: &dyn Dialect, raw: &str, column_type: ColumnType) -> Result<String>;
}

/// A parsed temporal operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl Temporal {
    /// Parses `raw` as a value of `column_type`. A `Date` operand that
    /// carries a time of day other than midnight is rejected, never
    /// truncated.
    pub fn parse(raw: &str, column_type: ColumnType) -> Result<Self> {
        let raw = raw.trim();
        let invalid = || {
            StepSqlError::ContractViolation(format!(
                "'{raw}' is not a valid {} value",
                column_type.name()
            ))
        };
        match column_type {
            ColumnType::Date => {
                if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                    return Ok(Temporal::Date(date));
                }
                let dt = parse_date_time(raw).ok_or_else(invalid)?;
                if dt.time() != NaiveTime::MIN {
                    return Err(StepSqlError::ContractViolation(format!(
                        "'{raw}' carries a time of day; a {} value cannot hold it",
                        column_type.name()
                    )));
                }
                Ok(Temporal::Date(dt.date()))
            }
            ColumnType::Time => ["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"]
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
                .map(Temporal::Time)
                .ok_or_else(invalid),
            ColumnType::DateTime => parse_date_time(raw)
                .or_else(|| {
                    NaiveDate::parse_from_str(raw, DATE_FORMAT)
                        .ok()
                        .map(|d| d.and_time(NaiveTime::MIN))
                })
                .map(Temporal::DateTime)
                .ok_or_else(invalid),
            other => Err(StepSqlError::unsupported(format!(
                "{} literal",
                other.name()
            ))),
        }
    }

    /// Sub-second part in nanoseconds.
    pub fn nanosecond(&self) -> u32 {
        match self {
            Temporal::Date(_) => 0,
            Temporal::Time(t) => t.nanosecond(),
            Temporal::DateTime(dt) => dt.nanosecond(),
        }
    }

    /// `YYYY-MM-DD`, `HH:MM:SS[.fff]` or `YYYY-MM-DD HH:MM:SS[.fff]`. The
    /// fraction is written only when it is non-zero.
    pub fn canonical(&self) -> String {
        let fraction = if self.nanosecond() == 0 { "" } else { FRACTION_FORMAT };
        match self {
            Temporal::Date(d) => d.format(DATE_FORMAT).to_string(),
            Temporal::Time(t) => t.format(&format!("{TIME_FORMAT}{fraction}")).to_string(),
            Temporal::DateTime(dt) => dt
                .format(&format!("{DATE_TIME_FORMAT}{fraction}"))
                .to_string(),
        }
    }
}

/// Canonical text of a temporal value, fractional seconds included.
pub fn normalize_temporal(raw: &str, column_type: ColumnType) -> Result<String> {
    Temporal::parse(raw, column_type).map(|t| t.canonical())
}

fn parse_date_time(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// ANSI typed literals: `DATE '...'`, `TIME '...'`, `TIMESTAMP '...'`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiValueFormatter;

impl AnsiValueFormatter {
    /// Numbers unquoted, everything else as a string literal.
    pub fn format_plain(
        &self,
        dialect: &dyn Dialect,
        raw: &str,
        column_type: ColumnType,
    ) -> Result<String> {
        if column_type.is_numeric() {
            let trimmed = raw.trim();
            return match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(trimmed.to_string()),
                _ => Err(StepSqlError::ContractViolation(format!(
                    "'{raw}' is not a valid {} value",
                    column_type.name()
                ))),
            };
        }
        Ok(dialect.quote_literal(raw))
    }
}

impl ValueFormatter for AnsiValueFormatter {
    fn format(&self, dialect: &dyn Dialect, raw: &str, column_type: ColumnType) -> Result<String> {
        let keyword = match column_type {
            ColumnType::Date => "DATE",
            ColumnType::Time => "TIME",
            ColumnType::DateTime => "TIMESTAMP",
            ColumnType::Interval => {
                return Err(StepSqlError::unsupported("interval literal"));
            }
            _ => return self.format_plain(dialect, raw, column_type),
        };
        let canonical = normalize_temporal(raw, column_type)?;
        Ok(format!("{keyword} {}", dialect.quote_literal(&canonical)))
    }
}

/// Oracle temporal literals go through `TO_DATE` with an explicit mask, so
/// they do not depend on the session's `NLS_DATE_FORMAT`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleValueFormatter;

impl ValueFormatter for OracleValueFormatter {
    fn format(&self, dialect: &dyn Dialect, raw: &str, column_type: ColumnType) -> Result<String> {
        let mask = match column_type {
            ColumnType::Date => "YYYY-MM-DD",
            ColumnType::Time => "HH24:MI:SS",
            ColumnType::DateTime => "YYYY-MM-DD HH24:MI:SS",
            t if t.is_temporal() => {
                return Err(StepSqlError::unsupported(format!(
                    "{} literal in dialect {}",
                    t.name(),
                    dialect.id()
                )));
            }
            _ => return AnsiValueFormatter.format_plain(dialect, raw, column_type),
        };
        let value = Temporal::parse(raw, column_type)?;
        // TO_DATE has no fractional-second field.
        if value.nanosecond() != 0 {
            return Err(StepSqlError::ContractViolation(format!(
                "'{}' has fractional seconds, which TO_DATE cannot represent",
                raw.trim()
            )));
        }
        let canonical = value.canonical();
        Ok(format!(
            "TO_DATE({}, {})",
            dialect.quote_literal(&canonical),
            dialect.quote_literal(mask)
        ))
    }
}
