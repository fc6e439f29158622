use crate::config::RenderingConfig;
use crate::error::{Result, StepSqlError};
use crate::steps::{JoinSide, JoinType, Step, StepKind};

use super::{mismatch, StepRenderer, StepSyntax};

/// Keyword for each logical join type.
pub trait JoinKeyword: Send + Sync {
    fn join_keyword(&self, join_type: JoinType) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiJoinKeyword;

impl JoinKeyword for AnsiJoinKeyword {
    fn join_keyword(&self, join_type: JoinType) -> &'static str {
        match join_type {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT OUTER JOIN",
            JoinType::Right => "RIGHT OUTER JOIN",
            JoinType::Outer => "OUTER JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

/// Oracle spells the logical outer join `FULL OUTER JOIN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleJoinKeyword;

impl JoinKeyword for OracleJoinKeyword {
    fn join_keyword(&self, join_type: JoinType) -> &'static str {
        match join_type {
            JoinType::Outer => "FULL OUTER JOIN",
            other => AnsiJoinKeyword.join_keyword(other),
        }
    }
}

/// `SELECT "t1"."a", "t2"."b" AS "x" FROM <left> "t1" <KW> <right> "t2" ON ...`
#[derive(Debug, Clone)]
pub struct JoinSql<K> {
    keyword: K,
    left_alias: String,
    right_alias: String,
}

impl<K: JoinKeyword> JoinSql<K> {
    pub fn new(keyword: K, settings: &RenderingConfig) -> Self {
        Self {
            keyword,
            left_alias: settings.subquery_alias.clone(),
            right_alias: settings.join_right_alias.clone(),
        }
    }

    fn qualified(&self, ctx: &StepRenderer<'_>, side: JoinSide, name: &str) -> String {
        let alias = match side {
            JoinSide::Left => &self.left_alias,
            JoinSide::Right => &self.right_alias,
        };
        format!("{}.{}", ctx.quote(alias), ctx.quote(name))
    }
}

impl<K: JoinKeyword> StepSyntax for JoinSql<K> {
    fn to_sql(&self, ctx: &StepRenderer<'_>, step: &Step) -> Result<String> {
        let Step::Join(join) = step else {
            return Err(mismatch(StepKind::Join, step));
        };
        if join.columns.is_empty() {
            return Err(StepSqlError::ContractViolation(
                "join needs at least one output column".to_string(),
            ));
        }
        match (join.join_type, join.on.is_empty()) {
            (JoinType::Cross, false) => {
                return Err(StepSqlError::ContractViolation(
                    "cross join takes no join keys".to_string(),
                ))
            }
            (JoinType::Cross, true) | (_, false) => {}
            (other, true) => {
                return Err(StepSqlError::ContractViolation(format!(
                    "{other:?} join needs at least one join key"
                )))
            }
        }

        let items: Vec<String> = join
            .columns
            .iter()
            .map(|c| {
                let column = self.qualified(ctx, c.side, &c.name);
                match &c.alias {
                    Some(alias) => format!("{column} AS {}", ctx.quote(alias)),
                    None => column,
                }
            })
            .collect();

        let mut sql = format!(
            "SELECT {} FROM {} {} {}",
            items.join(", "),
            ctx.from_clause(&join.left, &self.left_alias)?,
            self.keyword.join_keyword(join.join_type),
            ctx.from_clause(&join.right, &self.right_alias)?
        );
        if !join.on.is_empty() {
            let keys: Vec<String> = join
                .on
                .iter()
                .map(|key| {
                    format!(
                        "{} = {}",
                        self.qualified(ctx, JoinSide::Left, &key.left),
                        self.qualified(ctx, JoinSide::Right, &key.right)
                    )
                })
                .collect();
            sql.push_str(" ON ");
            sql.push_str(&keys.join(" AND "));
        }
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_only_changes_outer() {
        for join_type in [JoinType::Inner, JoinType::Left, JoinType::Right, JoinType::Cross] {
            assert_eq!(
                OracleJoinKeyword.join_keyword(join_type),
                AnsiJoinKeyword.join_keyword(join_type)
            );
        }
        assert_eq!(AnsiJoinKeyword.join_keyword(JoinType::Outer), "OUTER JOIN");
        assert_eq!(
            OracleJoinKeyword.join_keyword(JoinType::Outer),
            "FULL OUTER JOIN"
        );
    }
}
