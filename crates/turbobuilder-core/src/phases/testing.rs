//! Test phase: run the unit test suites configured on the setup

use super::ProjectContext;
use crate::config::{Tool, SETUP_FILE};
use crate::console;
use crate::runtime::{check_tools, ToolCommand};
use crate::setup::model::{JasmineTest, PhpUnitTest, TestEntry};
use anyhow::{bail, Result};

const PHPUNIT_SETUP_FILE: &str = "PhpUnitSetup.xml";

/// Run every enabled test entry, stopping at the first failing suite
pub async fn test(ctx: &ProjectContext) -> Result<()> {
    console::text("\ntest start");

    if ctx.setup.test.is_empty() {
        bail!(
            "Nothing to test. Please setup some tests on test section in {}",
            SETUP_FILE
        );
    }

    for entry in &ctx.setup.test {
        match entry {
            TestEntry::PhpUnit(php) if php.enabled => run_php_unit(ctx, php).await?,
            TestEntry::Jasmine(jasmine) if jasmine.enabled => run_jasmine(ctx, jasmine).await?,
            _ => {}
        }
    }

    console::success("test done");
    Ok(())
}

fn php_unit_command(ctx: &ProjectContext, php: &PhpUnitTest) -> ToolCommand {
    let mut command = ToolCommand::for_tool(&ctx.toolchain, Tool::PhpUnit).current_dir(ctx.paths.root());
    if php.coverage_report {
        command = command
            .arg("--coverage-html")
            .arg(ctx.target_folder().join("reports/coverage/php"));
    }
    command
        .arg("--configuration")
        .arg(ctx.paths.root().join(&php.tests_root).join(PHPUNIT_SETUP_FILE))
}

async fn run_php_unit(ctx: &ProjectContext, php: &PhpUnitTest) -> Result<()> {
    check_tools(&ctx.toolchain, &[Tool::PhpUnit])?;

    if php.coverage_report {
        console::warning("Warning: Enabling Php coverage report in unit tests is many times slower");
    }

    console::text("\nLaunching phpunit tests");
    let passed = php_unit_command(ctx, php).stream().await?;

    if php.coverage_report && php.coverage_report_open_after_tests {
        let index = ctx.target_folder().join("reports/coverage/php/index.html");
        if let Err(e) = open::that(&index) {
            console::warning(format!("Could not open {}: {}", index.display(), e));
        }
    }

    if !passed {
        bail!("There are PHP unit test failures");
    }
    Ok(())
}

async fn run_jasmine(ctx: &ProjectContext, jasmine: &JasmineTest) -> Result<()> {
    check_tools(&ctx.toolchain, &[Tool::Jasmine])?;

    console::text("\nLaunching jasmine tests");
    let passed = ToolCommand::for_tool(&ctx.toolchain, Tool::Jasmine)
        .arg(format!("--config={}", jasmine.jasmine_config))
        .current_dir(ctx.paths.root())
        .stream()
        .await?;

    if !passed {
        bail!("There are jasmine test failures");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::context;
    use super::*;
    use crate::setup::ProjectType;
    use serde_json::json;

    #[tokio::test]
    async fn test_nothing_to_test() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), ProjectType::AppAngular, json!({}));

        let err = test(&ctx).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Nothing to test. Please setup some tests on test section in turbobuilder.json"
        );
    }

    #[tokio::test]
    async fn test_disabled_entries_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(
            dir.path(),
            ProjectType::LibPhp,
            json!({ "test": [{ "type": "phpUnit", "enabled": false }] }),
        );

        test(&ctx).await.unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_php_unit_command_with_coverage() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(
            dir.path(),
            ProjectType::LibPhp,
            json!({ "metadata": { "name": "lib" } }),
        );
        let php = PhpUnitTest {
            enabled: true,
            tests_root: "src/test/php".to_string(),
            coverage_report: true,
            coverage_report_open_after_tests: false,
        };

        let line = php_unit_command(&ctx, &php).command_line();
        let root = dir.path().display();
        assert_eq!(
            line,
            format!(
                "phpunit --coverage-html {root}/target/lib/reports/coverage/php --configuration {root}/src/test/php/PhpUnitSetup.xml"
            )
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_jasmine_suite() {
        use super::super::test_support::fake_tool;

        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(
            dir.path(),
            ProjectType::LibJs,
            json!({ "test": [{ "type": "jasmine" }] }),
        );
        let jasmine = fake_tool(
            dir.path(),
            "fake-jasmine",
            "case \"$1\" in --config=*) echo failed; exit 1;; esac\necho 4.0.0\n",
        );
        ctx.toolchain = ctx.toolchain.clone().with_program(Tool::Jasmine, jasmine);

        let err = test(&ctx).await.unwrap_err();
        assert_eq!(err.to_string(), "There are jasmine test failures");
    }
}
