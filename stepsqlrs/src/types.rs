//! Column domain types.
//!
//! Rendering decisions (literal formatting, trimming, aggregate output types)
//! depend on a column's domain category rather than on the exact database
//! type name. `ColumnType::classify` maps a stored type name to its category.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Nominal,
    Integer,
    Real,
    Numeric,
    Date,
    Time,
    DateTime,
    /// Temporal family member with no literal pattern (e.g. `INTERVAL DAY TO SECOND`).
    Interval,
    Binary,
    /// Unknown type, e.g. a computed expression whose type was never resolved.
    #[default]
    AttributeValue,
}

impl ColumnType {
    pub fn is_nominal(self) -> bool {
        matches!(self, ColumnType::Nominal)
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ColumnType::Integer | ColumnType::Real | ColumnType::Numeric
        )
    }

    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            ColumnType::Date | ColumnType::Time | ColumnType::DateTime | ColumnType::Interval
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Nominal => "nominal",
            ColumnType::Integer => "integer",
            ColumnType::Real => "real",
            ColumnType::Numeric => "numeric",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
            ColumnType::DateTime => "date_time",
            ColumnType::Interval => "interval",
            ColumnType::Binary => "binary",
            ColumnType::AttributeValue => "attribute_value",
        }
    }

    /// Classify a database type name such as `VARCHAR2(255)`, `NUMBER(10,0)`
    /// or `TIMESTAMP(6) WITH TIME ZONE`. Unrecognised names are `AttributeValue`.
    pub fn classify(stored_type: &str) -> ColumnType {
        let upper = stored_type.trim().to_ascii_uppercase();
        let (base, args) = split_type_args(&upper);

        if base.starts_with("INTERVAL") {
            return ColumnType::Interval;
        }
        if base.starts_with("TIMESTAMP") || base.starts_with("DATETIME") {
            return ColumnType::DateTime;
        }
        if base == "TIME" || base.starts_with("TIME ") {
            return ColumnType::Time;
        }
        if base == "DATE" {
            return ColumnType::Date;
        }

        match base.as_str() {
            "CHAR" | "NCHAR" | "VARCHAR" | "VARCHAR2" | "NVARCHAR" | "NVARCHAR2" | "TEXT"
            | "CLOB" | "NCLOB" | "STRING" | "CHARACTER" | "CHARACTER VARYING" | "LONG" => {
                ColumnType::Nominal
            }
            "TINYINT" | "SMALLINT" | "INT" | "INTEGER" | "BIGINT" => ColumnType::Integer,
            "REAL" | "FLOAT" | "DOUBLE" | "DOUBLE PRECISION" | "BINARY_FLOAT" | "BINARY_DOUBLE" => {
                ColumnType::Real
            }
            "NUMBER" | "NUMERIC" | "DECIMAL" | "DEC" => match args.as_slice() {
                [_, scale] if scale.trim() == "0" => ColumnType::Integer,
                _ => ColumnType::Numeric,
            },
            "BLOB" | "RAW" | "LONG RAW" | "BYTEA" | "BINARY" | "VARBINARY" => ColumnType::Binary,
            _ => ColumnType::AttributeValue,
        }
    }
}

/// Split `NUMBER(10,0) SUFFIX` into (`NUMBER SUFFIX`, ["10", "0"]).
fn split_type_args(upper: &str) -> (String, Vec<String>) {
    match (upper.find('('), upper.find(')')) {
        (Some(open), Some(close)) if open < close => {
            let args = upper[open + 1..close]
                .split(',')
                .map(|a| a.trim().to_string())
                .collect();
            let base = format!("{} {}", upper[..open].trim(), upper[close + 1..].trim());
            (base.trim().to_string(), args)
        }
        _ => (upper.to_string(), Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_columns_default_to_attribute_value() {
        assert_eq!(ColumnType::default(), ColumnType::AttributeValue);
    }

    #[test]
    fn classifies_oracle_type_names() {
        assert_eq!(ColumnType::classify("VARCHAR2(255)"), ColumnType::Nominal);
        assert_eq!(ColumnType::classify("number(10,0)"), ColumnType::Integer);
        assert_eq!(ColumnType::classify("NUMBER(10,2)"), ColumnType::Numeric);
        assert_eq!(ColumnType::classify("NUMBER"), ColumnType::Numeric);
        assert_eq!(ColumnType::classify("DATE"), ColumnType::Date);
        assert_eq!(
            ColumnType::classify("TIMESTAMP(6) WITH TIME ZONE"),
            ColumnType::DateTime
        );
        assert_eq!(
            ColumnType::classify("INTERVAL DAY(2) TO SECOND(6)"),
            ColumnType::Interval
        );
        assert_eq!(ColumnType::classify("BINARY_DOUBLE"), ColumnType::Real);
        assert_eq!(ColumnType::classify("SDO_GEOMETRY"), ColumnType::AttributeValue);
    }

    #[test]
    fn time_is_not_timestamp() {
        assert_eq!(ColumnType::classify("TIME"), ColumnType::Time);
        assert_eq!(ColumnType::classify("time with time zone"), ColumnType::Time);
        assert_eq!(ColumnType::classify("TIMESTAMP"), ColumnType::DateTime);
    }

    #[test]
    fn temporal_family_includes_interval() {
        assert!(ColumnType::Interval.is_temporal());
        assert!(!ColumnType::Nominal.is_temporal());
        assert!(ColumnType::Numeric.is_numeric());
    }
}
