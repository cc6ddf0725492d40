// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use yare::parameterized;

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn sized(bytes: u64) -> Fields {
    Fields {
        image_size: bytes,
        ..Fields::default()
    }
}

fn run(rules: &[&str], fields: &Fields) -> Result<bool> {
    Engine::new(rules)?.process(fields)
}

// ─────────────────────────────────────────────────────────────────────────────
// Compilation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn new_compiles_valid_rules() {
    let engine = Engine::new(&["Now() >= CreatedAt", "Repository matches '.*secret-souce.*'"]);
    assert!(engine.is_ok());
}

#[test]
fn new_rejects_invalid_regex() {
    let err = Engine::new(&["Repository matches '*secret-souce$'"]).unwrap_err();
    assert!(matches!(err, Error::Compile(_)));
}

#[test]
fn new_rejects_empty_rules() {
    let rules: [&str; 0] = [];
    assert!(matches!(Engine::new(&rules), Err(Error::EmptyRules)));
}

#[test]
fn rules_are_grouped_and_joined() {
    let engine = Engine::new(&["a == 1 || true", "false"]);
    let err = engine.unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown name a (1:2)\n | (a == 1 || true) || (false)\n | .^"
    );
    let engine = Engine::new(&["true", "false"]).unwrap();
    assert_eq!(engine.source(), "(true) || (false)");
}

#[test]
fn unknown_name_message() {
    let err = Engine::new(&["whoami"]).unwrap_err();
    assert_eq!(err.to_string(), "unknown name whoami (1:2)\n | (whoami)\n | .^");
}

#[test]
fn mismatched_membership_is_compile_error() {
    let err = Engine::new(&[r#"50 in ["halo"]"#]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid operation: in (mismatched types int and [string]) (1:5)\n | (50 in [\"halo\"])\n | ....^"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Evaluation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn matches_any_rule() {
    let rules = ["1 != 1", "5 < 4", "'strongman' matches '.*man$'"];
    assert!(run(&rules, &Fields::default()).unwrap());
}

#[test]
fn no_rule_matches() {
    assert!(!run(&["1 != 1", "5 < 4"], &Fields::default()).unwrap());
}

#[test]
fn tags_membership() {
    let fields = Fields {
        tags: vec!["latest".into(), "release-abc".into()],
        ..Fields::default()
    };
    assert!(run(&[r#""latest" in Tags"#], &fields).unwrap());
    assert!(!run(&[r#""dev" in Tags"#], &fields).unwrap());
}

#[test]
fn date_helper() {
    let fields = Fields {
        created_at: date(1991, 6, 15),
        ..Fields::default()
    };
    let rules = ["1 + 1 == 2 && CreatedAt >= Date('1991-06-13')"];
    assert!(run(&rules, &fields).unwrap());
}

#[test]
fn now_and_duration_helpers() {
    let fields = Fields {
        created_at: date(1991, 6, 15),
        ..Fields::default()
    };
    let rules = ["Duration('1h') > Duration('3h') || Now() + Duration('1h') > CreatedAt || true"];
    assert!(run(&rules, &fields).unwrap());
}

#[parameterized(
    days = { "Duration('1d') == Duration('24h')" },
    months = { "Duration('3M') == Duration('2160h')" },
    years = { "Duration('1Y') == Duration('8640h')" },
    combination = { "Duration('2d3M1Y1h') == Duration('10849h')" },
)]
fn coarse_duration_units(rule: &str) {
    assert!(run(&[rule], &Fields::default()).unwrap());
}

#[test]
fn invalid_duration_is_located_at_call() {
    let err = run(&["Duration('wrong') > Duration('1h')"], &Fields::default()).unwrap_err();
    assert!(matches!(err, Error::Eval(ref d) if d.kind() == DiagnosticKind::Literal));
    assert_eq!(
        err.to_string(),
        "invalid duration \"wrong\" (1:2)\n | (Duration('wrong') > Duration('1h'))\n | .^"
    );
}

#[test]
fn unknown_duration_unit() {
    let err = run(&["Duration('1x') == Duration('1h')"], &Fields::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown unit \"x\" in duration \"1x\" (1:2)\n | (Duration('1x') == Duration('1h'))\n | .^"
    );
}

#[test]
fn wrong_date_pattern() {
    let err = run(&["Date('13-06-1991') < Now()"], &Fields::default()).unwrap_err();
    let text = err.to_string();
    assert!(text.starts_with("parsing time \"13-06-1991\" as \"YYYY-MM-DD\": "));
    assert!(text.ends_with("(1:2)\n | (Date('13-06-1991') < Now())\n | .^"));
}

#[test]
fn time_and_duration_operators() {
    let fields = Fields {
        created_at: date(1991, 6, 13),
        uploaded_at: date(1991, 6, 15),
        ..Fields::default()
    };
    let falsy = [
        "Duration('1h') < Duration('1s') || Duration('3h') >= Duration('5h')",
        "UploadedAt < CreatedAt && UploadedAt - CreatedAt <= Duration('3s')",
        "Duration('1m') <= Duration('1s')",
        "UploadedAt <= CreatedAt",
    ];
    assert!(!run(&falsy, &fields).unwrap());

    let mut rules = falsy.to_vec();
    rules.push("UploadedAt - CreatedAt == Duration('48h')");
    assert!(run(&rules, &fields).unwrap());
}

#[test]
fn equal_dates() {
    assert!(run(&["Date('2020-02-02') == Date('2020-02-02')"], &Fields::default()).unwrap());
}

#[parameterized(
    equal = { "ImageSize == SizeStr('1 KiB')", 1024, true },
    gte = { "ImageSize >= SizeStr('1 MiB')", 1024 * 1024, true },
    gte_not_match = { "ImageSize >= SizeStr('1 MiB')", 1024 * 1024 - 1, false },
    gt = { "ImageSize > SizeStr('2 MiB')", 1024 * 1024 * 2 + 1, true },
    lte = { "ImageSize <= SizeStr('10 MiB')", 1024 * 1024 * 10, true },
    lte_not_match = { "ImageSize <= SizeStr('10 MiB')", 1024 * 1024 * 10 + 1, false },
    lt = { "ImageSize < SizeStr('10 MiB')", 1024 * 1024 * 10 - 1, true },
    lt_not_match = { "ImageSize < SizeStr('10 MiB')", 1024 * 1024 * 10, false },
)]
fn size_comparisons(rule: &str, size: u64, expected: bool) {
    assert_eq!(run(&[rule], &sized(size)).unwrap(), expected);
}

#[test]
fn size_str_wrong_pattern() {
    let err = run(&["ImageSize < SizeStr('not valid')"], &sized(1024 * 1024 * 10)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown pattern not valid (1:14)\n | (ImageSize < SizeStr('not valid'))\n | .............^"
    );
}

#[test]
fn size_literals_are_cached_per_engine() {
    let engine = Engine::new(&["ImageSize < SizeStr('1 MiB') || ImageSize > SizeStr('1 GiB')"]).unwrap();
    assert!(engine.size_cache().is_empty());
    engine.process(&sized(10)).unwrap();
    engine.process(&sized(20)).unwrap();
    assert_eq!(engine.size_cache().len(), 1);

    let other = Engine::new(&["ImageSize < SizeStr('1 MiB')"]).unwrap();
    assert!(other.size_cache().is_empty());
}

#[test]
fn process_at_pins_now() {
    let engine = Engine::new(&["UploadedAt < Now() - Duration('30d')"]).unwrap();
    let fields = Fields {
        uploaded_at: date(2021, 1, 1),
        ..Fields::default()
    };
    assert!(engine.process_at(&fields, date(2021, 3, 1)).unwrap());
    assert!(!engine.process_at(&fields, date(2021, 1, 15)).unwrap());
}

#[test]
fn short_circuit_skips_failing_branch() {
    let rules = ["true || Duration('wrong') > Duration('1h')"];
    assert!(run(&rules, &Fields::default()).unwrap());
    let rules = ["false && Duration('wrong') > Duration('1h')"];
    assert!(!run(&rules, &Fields::default()).unwrap());
}

#[test]
fn runtime_arithmetic_error_is_eval_error() {
    let err = run(&["ImageSize % 0 == 1"], &sized(5)).unwrap_err();
    let Error::Eval(diag) = err else {
        unreachable!("expected eval error");
    };
    assert_eq!(diag.kind(), DiagnosticKind::Runtime);
    assert_eq!(diag.message(), "integer divide by zero");
}

#[test]
fn index_from_end() {
    let fields = Fields {
        tags: vec!["v1".into(), "latest".into()],
        ..Fields::default()
    };
    assert!(run(&["Tags[-1] == 'latest'"], &fields).unwrap());
    let err = run(&["Tags[5] == 'latest'"], &fields).unwrap_err();
    assert!(err.to_string().starts_with("index out of range: 5"));
}

#[test]
fn word_operators_and_string_predicates() {
    let fields = Fields {
        repository: "asia.gcr.io/proj/app-dev".into(),
        ..Fields::default()
    };
    let rules = [
        "Repository startsWith 'asia.gcr.io/' and not (Repository endsWith '-prod')",
    ];
    assert!(run(&rules, &fields).unwrap());
    assert!(run(&["Repository contains 'proj' and len(Tags) == 0"], &fields).unwrap());
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = Engine::new(&["ImageSize > SizeStr('1 KiB')"]).unwrap();
    std::thread::scope(|s| {
        for size in [10u64, 4096] {
            let engine = &engine;
            s.spawn(move || {
                assert_eq!(engine.process(&sized(size)).unwrap(), size > 1024);
            });
        }
    });
}

#[test]
fn engine_as_trait_object() {
    let engine = Engine::new(&["true"]).unwrap();
    let dyn_engine: &dyn FilterEngine = &engine;
    assert!(dyn_engine.process(&Fields::default()).unwrap());
}

#[test]
fn many_rules_compile_and_evaluate() {
    let rules: Vec<String> = (0..20_000).map(|i| format!("ImageSize == {i}")).collect();
    let engine = Engine::new(&rules).unwrap();
    assert!(engine.process(&sized(19_999)).unwrap());
    assert!(!engine.process(&sized(20_000)).unwrap());
}

#[test]
fn long_arithmetic_chain_is_rejected() {
    let rule = format!("{}1 > 0", "1 + ".repeat(100_000));
    let err = Engine::new(&[rule]).unwrap_err();
    assert!(matches!(err, Error::Compile(ref d) if d.message() == "expression nested too deeply"));
}
