//! Integration tests for the engine, hooks and scanner public APIs.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;
use vibe_codex::config::{Catalogue, Config};
use vibe_codex::engine::{validate_project, ValidateOptions};
use vibe_codex::hooks::{dispatch_event, HookEvent};
use vibe_codex::modules::{ModuleRegistrar, ModuleRegistry, RuleModule};
use vibe_codex::rules::{Finding, Level, ProjectFile, Rule, Severity, ValidationContext};
use vibe_codex::scanner::{api_key_pattern, estimate_coverage, scan};

struct CustomModule {
    late_hook_runs: Arc<AtomicUsize>,
}

impl RuleModule for CustomModule {
    fn name(&self) -> &str {
        "custom"
    }

    fn initialize(&self, registrar: &mut ModuleRegistrar<'_>) -> vibe_codex::Result<()> {
        registrar.register_rule(Rule::new(
            "cus-001",
            "Always passes",
            Level::new(1).unwrap(),
            "custom",
            Severity::Error,
            |_: &ValidationContext| Ok(vec![]),
        ))?;
        registrar.register_rule(Rule::new(
            "cus-002",
            "Warns about notes",
            Level::new(2).unwrap(),
            "custom",
            Severity::Warning,
            |ctx: &ValidationContext| {
                Ok(ctx
                    .files()
                    .iter()
                    .filter(|f| f.content.contains("NOTE"))
                    .map(|f| Finding::new("note left in file").in_file(&f.path))
                    .collect())
            },
        ))?;
        registrar.register_rule(Rule::new(
            "cus-003",
            "Blows up",
            Level::new(3).unwrap(),
            "custom",
            Severity::Error,
            |_: &ValidationContext| anyhow::bail!("backend unavailable"),
        ))?;

        registrar.register_hook(HookEvent::PrePush, "first", |_| Ok(true));
        registrar.register_hook(HookEvent::PrePush, "second", |_| Ok(false));
        let runs = self.late_hook_runs.clone();
        registrar.register_hook(HookEvent::PrePush, "third", move |_| {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        });
        Ok(())
    }
}

fn setup() -> (ModuleRegistry, Arc<AtomicUsize>) {
    let runs = Arc::new(AtomicUsize::new(0));
    let mut registry = ModuleRegistry::new(Arc::new(Catalogue::builtin().unwrap()));
    registry
        .register(CustomModule {
            late_hook_runs: runs.clone(),
        })
        .unwrap();
    (registry, runs)
}

fn config() -> Config {
    let mut config = Config::default();
    for id in ["cus-001", "cus-002", "cus-003"] {
        config.enable_rule(id);
    }
    config
}

#[test]
fn custom_module_rules_are_classified() {
    let (mut registry, _) = setup();
    let ctx = ValidationContext::new("/project", config())
        .with_files(vec![ProjectFile::new("notes.txt", "NOTE: revisit\n")]);

    let report =
        validate_project(&mut registry, &ctx, &ValidateOptions::with_modules(["custom"])).unwrap();

    let summary = report.summary();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.warnings, 2);
    assert_eq!(summary.violations, 0);
    assert_eq!(summary.score, 33);
    assert!(!report.has_violations());
    assert!(report
        .warnings()
        .iter()
        .any(|w| w.message.contains("backend unavailable")));
}

#[test]
fn disabled_rules_do_not_run() {
    let (mut registry, _) = setup();
    let mut config = config();
    config.disable_rule("cus-003");
    let ctx = ValidationContext::new("/project", config);

    let report =
        validate_project(&mut registry, &ctx, &ValidateOptions::with_modules(["custom"])).unwrap();
    assert_eq!(report.summary().total, 2);
    assert_eq!(report.summary().score, 100);
}

#[test]
fn hooks_stop_at_first_rejection() {
    let (mut registry, runs) = setup();
    let ctx = ValidationContext::new("/project", config());

    let outcome = dispatch_event(
        &mut registry,
        "pre-push",
        &ctx,
        &ValidateOptions::with_modules(["custom"]),
    )
    .unwrap();

    assert!(!outcome.accepted);
    assert_eq!(outcome.rejected_by.as_deref(), Some("custom"));
    assert_eq!(outcome.hook.as_deref(), Some("second"));
    assert_eq!(outcome.hooks_run, 2);
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[test]
fn events_without_hooks_are_accepted() {
    let (mut registry, _) = setup();
    let ctx = ValidationContext::new("/project", config());
    let outcome = dispatch_event(
        &mut registry,
        "post-merge",
        &ctx,
        &ValidateOptions::with_modules(["custom"]),
    )
    .unwrap();
    assert!(outcome.accepted);
    assert_eq!(outcome.hooks_run, 0);
}

#[test]
fn scanner_finds_api_key_line() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("config.js"),
        "const x = 1;\nconst api_key = \"sk-1234567890abcdef\";\n",
    )
    .unwrap();
    fs::create_dir_all(temp.path().join("node_modules/dep")).unwrap();
    fs::write(
        temp.path().join("node_modules/dep/index.js"),
        "const api_key = \"sk-abcdefabcdefabcd\";\n",
    )
    .unwrap();

    let matches = scan(temp.path(), &[api_key_pattern()], &["**/*.js"], &[]).unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].file, std::path::PathBuf::from("config.js"));
    assert_eq!(matches[0].line, 2);
}

#[test]
fn coverage_estimate_rounds() {
    let files = vec![
        ProjectFile::new("src/a.ts", ""),
        ProjectFile::new("src/b.ts", ""),
        ProjectFile::new("src/c.ts", ""),
        ProjectFile::new("src/a.test.ts", ""),
    ];
    let estimate = estimate_coverage(&files);
    assert_eq!(estimate.source_files, 3);
    assert_eq!(estimate.percentage, 33);
    assert_eq!(estimate.untested.len(), 2);
}
