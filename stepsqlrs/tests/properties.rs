//! Property tests for pattern escaping, row windows and catalog ordering.

use proptest::prelude::*;

use stepsql::catalog::{AggregateCatalog, AggregateFunctionDef, OutputTypeRule};
use stepsql::config::RenderingConfig;
use stepsql::dialect::oracle_provider;
use stepsql::steps::{SampleStep, Source, Step};
use stepsql::syntax::{escape_like, unique_alias, RowWindow, LIKE_ESCAPE};

fn unescape(escaped: &str) -> String {
    let mut out = String::new();
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c == LIKE_ESCAPE {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

proptest! {
    #[test]
    fn escaped_pattern_has_no_bare_wildcards(raw in "[a-z%_\\\\ ]{0,24}") {
        let escaped = escape_like(&raw, LIKE_ESCAPE);
        prop_assert_eq!(unescape(&escaped), raw);

        let mut chars = escaped.chars();
        while let Some(c) = chars.next() {
            prop_assert!(c != '%' && c != '_', "bare wildcard in {}", escaped);
            if c == LIKE_ESCAPE {
                let next = chars.next();
                prop_assert!(matches!(next, Some('%') | Some('_') | Some('\\')));
            }
        }
    }

    #[test]
    fn window_selects_rows_after_offset(limit in 0i64..200, offset in 0i64..200, available in 0u64..500) {
        let window = RowWindow::new(limit, offset).unwrap();
        let expected = (1..=available)
            .filter(|r| *r > window.offset && *r <= window.upper())
            .count() as u64;
        prop_assert_eq!(window.rows_selected(available), expected);
    }

    #[test]
    fn rownum_bounds_follow_offset_and_limit(limit in 0i64..1_000_000, offset in 0i64..1_000_000) {
        let provider = oracle_provider(&RenderingConfig::default());
        let step = Step::Sample(SampleStep {
            from: Source::query("SELECT A FROM T"),
            columns: vec!["A".to_string()],
            limit,
            offset,
        });
        let sql = provider.to_sql(&step).unwrap();
        let upper = format!("WHERE ROWNUM <= {})", limit + offset);
        let lower = format!("WHERE \"rownumalias\" > {offset}");
        prop_assert!(sql.contains(&upper));
        prop_assert!(sql.ends_with(&lower));
    }

    #[test]
    fn negative_bounds_never_render(limit in i64::MIN..0, offset in i64::MIN..0) {
        prop_assert!(RowWindow::new(limit, 0).is_err());
        prop_assert!(RowWindow::new(0, offset).is_err());
    }

    #[test]
    fn unique_alias_never_collides(columns in proptest::collection::vec("(rn|RN|Rn)(_[0-9])?|[a-z]{1,3}", 0..8)) {
        let alias = unique_alias("rn", &columns);
        prop_assert!(columns.iter().all(|c| !c.eq_ignore_ascii_case(&alias)));
    }

    #[test]
    fn catalog_order_ignores_insertion_order(names in proptest::collection::vec("[A-Za-z_]{1,8}", 0..16)) {
        let defs = |ns: &[String]| {
            ns.iter()
                .map(|n| AggregateFunctionDef::new(n.clone(), "F({expr})", "", OutputTypeRule::SameAsInput))
                .collect::<Vec<_>>()
        };
        let forward: AggregateCatalog = defs(names.as_slice()).into_iter().collect();
        let mut reversed_names = names.clone();
        reversed_names.reverse();
        let backward: AggregateCatalog = defs(reversed_names.as_slice()).into_iter().collect();

        let listed = forward.names();
        prop_assert_eq!(&listed, &backward.names());
        let mut sorted = listed.clone();
        sorted.sort_unstable();
        prop_assert_eq!(listed, sorted);
    }

    #[test]
    fn merging_twice_is_idempotent(extra in proptest::collection::vec("[A-Z]{3,6}", 0..6)) {
        let defs: Vec<AggregateFunctionDef> = extra
            .iter()
            .map(|n| AggregateFunctionDef::new(n.clone(), "G({expr})", "", OutputTypeRule::SameAsInput))
            .collect();
        let once = AggregateCatalog::merge(&AggregateCatalog::generic(), defs.clone());
        let twice = AggregateCatalog::merge(&once, defs);
        prop_assert_eq!(once, twice);
    }
}
