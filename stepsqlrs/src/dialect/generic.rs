use crate::catalog::AggregateCatalog;
use crate::config::RenderingConfig;
use crate::provider::DialectProvider;
use crate::steps::{FilterCondition, StepKind};
use crate::syntax::filter::ansi;
use crate::syntax::{
    AggregateSql, AnsiJoinKeyword, AnsiValueFormatter, FilterSql, JoinSql, LimitOffsetSample,
    SelectSql, SortSql,
};

use super::Dialect;

/// ANSI SQL; every [`Dialect`] default applies unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDialect;

impl Dialect for GenericDialect {
    fn id(&self) -> &str {
        "generic"
    }
}

/// Provider with a rule for every step kind and filter condition. Used as
/// the fallback of every other provider.
pub fn generic_provider(settings: &RenderingConfig) -> DialectProvider {
    DialectProvider::builder(GenericDialect)
        .aggregates(AggregateCatalog::generic())
        .step(StepKind::Select, SelectSql::new(settings))
        .step(StepKind::Join, JoinSql::new(AnsiJoinKeyword, settings))
        .step(StepKind::Filter, FilterSql::new(settings))
        .step(StepKind::Sample, LimitOffsetSample::new(settings))
        .step(StepKind::Aggregate, AggregateSql::new(settings))
        .step(StepKind::Sort, SortSql::new(settings))
        .filter(FilterCondition::Equals, ansi::equals)
        .filter(FilterCondition::NotEquals, ansi::not_equals)
        .filter(FilterCondition::LessThan, ansi::less_than)
        .filter(FilterCondition::LessOrEqual, ansi::less_or_equal)
        .filter(FilterCondition::GreaterThan, ansi::greater_than)
        .filter(FilterCondition::GreaterOrEqual, ansi::greater_or_equal)
        .filter(FilterCondition::IsMissing, ansi::is_missing)
        .filter(FilterCondition::IsNotMissing, ansi::is_not_missing)
        .filter(FilterCondition::Contains, ansi::contains)
        .filter(FilterCondition::DoesNotContain, ansi::does_not_contain)
        .filter(FilterCondition::StartsWith, ansi::starts_with)
        .filter(FilterCondition::EndsWith, ansi::ends_with)
        .filter(FilterCondition::Matches, ansi::matches)
        .values(AnsiValueFormatter)
        .build()
}
