//! Dialect providers.
//!
//! A [`DialectProvider`] bundles a [`Dialect`] with its aggregate catalog and
//! the rendering rules where it deviates from the generic dialect. Anything it
//! does not override is looked up in its fallback provider at render time.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::catalog::AggregateCatalog;
use crate::config::RenderingConfig;
use crate::dialect::{generic_provider, Dialect};
use crate::error::Result;
use crate::metadata::MetadataQuery;
use crate::steps::{FilterCondition, Step, StepKind};
use crate::syntax::{FilterRenderer, StepRenderer, StepSyntax, ValueFormatter};

static GENERIC: Lazy<DialectProvider> =
    Lazy::new(|| generic_provider(&RenderingConfig::default()));

pub struct DialectProvider {
    dialect: Arc<dyn Dialect>,
    aggregates: AggregateCatalog,
    steps: HashMap<StepKind, Arc<dyn StepSyntax>>,
    filters: HashMap<FilterCondition, FilterRenderer>,
    values: Option<Arc<dyn ValueFormatter>>,
    fallback: Option<Arc<DialectProvider>>,
}

impl fmt::Debug for DialectProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut filters: Vec<&str> = self.filters.keys().map(|c| c.name()).collect();
        filters.sort_unstable();
        f.debug_struct("DialectProvider")
            .field("dialect", &self.dialect.id())
            .field("aggregates", &self.aggregates.names())
            .field("steps", &self.overridden_steps())
            .field("filters", &filters)
            .field("values", &self.values)
            .field("fallback", &self.fallback.as_ref().map(|p| p.id()))
            .finish()
    }
}

impl DialectProvider {
    pub fn builder<D: Dialect + 'static>(dialect: D) -> DialectProviderBuilder {
        DialectProviderBuilder {
            dialect: Arc::new(dialect),
            aggregates: AggregateCatalog::new(),
            steps: HashMap::new(),
            filters: HashMap::new(),
            values: None,
            fallback: None,
        }
    }

    /// Built-in generic provider with default rendering settings.
    pub fn generic() -> &'static DialectProvider {
        &GENERIC
    }

    pub fn id(&self) -> &str {
        self.dialect.id()
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn quote_ident(&self, ident: &str) -> String {
        self.dialect.quote_ident(ident)
    }

    pub fn quote_literal(&self, value: &str) -> String {
        self.dialect.quote_literal(value)
    }

    pub fn supports_drop_if_exists(&self) -> bool {
        self.dialect.supports_drop_if_exists()
    }

    pub fn aggregate_functions(&self) -> &AggregateCatalog {
        &self.aggregates
    }

    /// This provider's own strategy for `kind`, ignoring the fallback.
    pub fn step_syntax(&self, kind: StepKind) -> Option<&dyn StepSyntax> {
        self.steps.get(&kind).map(|s| s.as_ref())
    }

    /// Kinds with a strategy registered on this provider.
    pub fn overridden_steps(&self) -> Vec<StepKind> {
        StepKind::ALL
            .into_iter()
            .filter(|k| self.steps.contains_key(k))
            .collect()
    }

    pub fn filter_renderer(&self, condition: FilterCondition) -> Option<FilterRenderer> {
        self.filters.get(&condition).copied()
    }

    pub fn value_formatter(&self) -> Option<&dyn ValueFormatter> {
        self.values.as_deref()
    }

    /// Provider consulted for everything this one does not override.
    pub fn fallback(&self) -> &DialectProvider {
        self.fallback.as_deref().unwrap_or_else(|| DialectProvider::generic())
    }

    pub fn renderer(&self) -> StepRenderer<'_> {
        StepRenderer::with_fallback(self, self.fallback())
    }

    pub fn to_sql(&self, step: &Step) -> Result<String> {
        self.renderer().render(step)
    }

    /// Lists the tables of `schema`.
    pub fn table_names_query(&self, schema: &str) -> MetadataQuery {
        tracing::debug!(dialect = self.id(), schema, "finding tables in schema");
        MetadataQuery::new(self.dialect.table_names_sql(), vec![schema.to_string()])
    }

    /// Returns no rows but the column metadata of `schema.table`.
    pub fn column_metadata_query(&self, schema: Option<&str>, table: &str) -> MetadataQuery {
        tracing::debug!(dialect = self.id(), ?schema, table, "finding columns in table");
        let qualified = self.dialect.qualify_table(schema, table);
        MetadataQuery::new(self.dialect.column_metadata_sql(&qualified), Vec::new())
    }

    /// `DROP TABLE [IF EXISTS]`, depending on the dialect's capability.
    pub fn drop_table_sql(&self, schema: Option<&str>, table: &str) -> String {
        let qualified = self.dialect.qualify_table(schema, table);
        if self.supports_drop_if_exists() {
            format!("DROP TABLE IF EXISTS {qualified}")
        } else {
            format!("DROP TABLE {qualified}")
        }
    }
}

pub struct DialectProviderBuilder {
    dialect: Arc<dyn Dialect>,
    aggregates: AggregateCatalog,
    steps: HashMap<StepKind, Arc<dyn StepSyntax>>,
    filters: HashMap<FilterCondition, FilterRenderer>,
    values: Option<Arc<dyn ValueFormatter>>,
    fallback: Option<Arc<DialectProvider>>,
}

impl DialectProviderBuilder {
    pub fn aggregates(mut self, catalog: AggregateCatalog) -> Self {
        self.aggregates = catalog;
        self
    }

    pub fn step<S: StepSyntax + 'static>(mut self, kind: StepKind, syntax: S) -> Self {
        self.steps.insert(kind, Arc::new(syntax));
        self
    }

    pub fn filter(mut self, condition: FilterCondition, renderer: FilterRenderer) -> Self {
        self.filters.insert(condition, renderer);
        self
    }

    pub fn values<V: ValueFormatter + 'static>(mut self, formatter: V) -> Self {
        self.values = Some(Arc::new(formatter));
        self
    }

    pub fn fallback(mut self, provider: Arc<DialectProvider>) -> Self {
        self.fallback = Some(provider);
        self
    }

    pub fn build(self) -> DialectProvider {
        DialectProvider {
            dialect: self.dialect,
            aggregates: self.aggregates,
            steps: self.steps,
            filters: self.filters,
            values: self.values,
            fallback: self.fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{oracle_provider, GenericDialect};

    #[test]
    fn generic_overrides_every_kind() {
        assert_eq!(DialectProvider::generic().overridden_steps(), StepKind::ALL.to_vec());
        for condition in FilterCondition::ALL {
            assert!(DialectProvider::generic().filter_renderer(condition).is_some());
        }
    }

    #[test]
    fn oracle_overrides_only_join_and_sample() {
        let oracle = oracle_provider(&RenderingConfig::default());
        assert_eq!(oracle.overridden_steps(), vec![StepKind::Join, StepKind::Sample]);
        assert!(oracle.filter_renderer(FilterCondition::Equals).is_none());
        assert!(oracle.filter_renderer(FilterCondition::Contains).is_some());
    }

    #[test]
    fn drop_table_follows_capability() {
        let oracle = oracle_provider(&RenderingConfig::default());
        assert_eq!(
            oracle.drop_table_sql(Some("S"), "T"),
            "DROP TABLE \"S\".\"T\""
        );
        assert_eq!(
            DialectProvider::generic().drop_table_sql(None, "T"),
            "DROP TABLE IF EXISTS \"T\""
        );
    }

    #[test]
    fn bare_provider_falls_back_to_generic() {
        let bare = DialectProvider::builder(GenericDialect).build();
        assert!(bare.step_syntax(StepKind::Select).is_none());
        assert_eq!(bare.fallback().id(), "generic");
    }
}
