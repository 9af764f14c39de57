//! The `deployment` module: deployment configuration and lockfiles.

use crate::error::Result;
use crate::modules::module::{ModuleRegistrar, RuleModule};
use crate::rules::{Finding, ValidationContext};

const DEPLOY_FILES: [&str; 7] = [
    "Dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
    "vercel.json",
    "netlify.toml",
    "fly.toml",
    "Procfile",
];

/// Manifest, the lockfiles that satisfy it, and the lockfile to suggest.
const MANIFESTS: [(&str, &[&str], &str); 3] = [
    (
        "package.json",
        &["package-lock.json", "yarn.lock", "pnpm-lock.yaml", "bun.lockb"],
        "package-lock.json",
    ),
    ("Gemfile", &["Gemfile.lock"], "Gemfile.lock"),
    ("Pipfile", &["Pipfile.lock"], "Pipfile.lock"),
];

/// Deployment readiness checks.
pub struct DeploymentModule;

impl RuleModule for DeploymentModule {
    fn name(&self) -> &str {
        "deployment"
    }

    fn description(&self) -> &str {
        "Deployment configuration and committed lockfiles"
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["core".to_string()]
    }

    fn initialize(&self, registrar: &mut ModuleRegistrar<'_>) -> Result<()> {
        registrar.register_catalogued("dep-001", check_deploy_config)?;
        registrar.register_catalogued("dep-002", check_lockfiles)?;
        Ok(())
    }
}

fn check_deploy_config(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    let has_workflow = ctx
        .files()
        .iter()
        .any(|f| f.path.starts_with(".github/workflows"));
    if has_workflow || ctx.has_root_file(&DEPLOY_FILES) {
        Ok(vec![])
    } else {
        Ok(vec![Finding::new(
            "No deployment configuration found (Dockerfile, CI workflow or platform config)",
        )])
    }
}

fn check_lockfiles(ctx: &ValidationContext) -> anyhow::Result<Vec<Finding>> {
    let mut findings = Vec::new();

    for (manifest, lockfiles, suggested) in MANIFESTS {
        if ctx.has_root_file(&[manifest]) && !ctx.has_root_file(lockfiles) {
            findings.push(
                Finding::new(format!("{} has no committed lockfile ({})", manifest, suggested))
                    .in_file(manifest),
            );
        }
    }

    // Libraries conventionally leave Cargo.lock out; binaries commit it.
    let is_binary_crate = ctx.has_root_file(&["Cargo.toml"]) && ctx.file("src/main.rs").is_some();
    if is_binary_crate && !ctx.has_root_file(&["Cargo.lock"]) {
        findings.push(
            Finding::new("Cargo.toml has no committed lockfile (Cargo.lock)").in_file("Cargo.toml"),
        );
    }

    Ok(findings)
}
