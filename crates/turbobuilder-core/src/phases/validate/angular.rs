//! Angular application rules

use super::ValidationReport;
use crate::config::Tool;
use crate::console;
use crate::fs_utils::read_text_lossy;
use crate::phases::ProjectContext;
use crate::runtime::{check_tools, ToolCommand};
use crate::setup::ProjectType;
use anyhow::Result;

const HTTPS_REWRITE_RULE: &str = "RewriteRule ^(.*)$ https://%{HTTP_HOST}%{REQUEST_URI} [L,R=301]";

pub(super) async fn validate_angular(
    ctx: &ProjectContext,
    report: &mut ValidationReport,
) -> Result<()> {
    let rules = ctx.setup.validate.angular_app.as_ref();

    if ctx.project_type == ProjectType::AppAngular {
        if let Some(rules) = rules {
            let index = ctx.paths.src().join("index.html");
            match read_text_lossy(&index) {
                Ok(html) => {
                    if rules.no_legacy_favicon && html.contains("favicon.ico") {
                        report.error("Deprecated favicon.ico metadata is not allowed. Please remove it from index.html");
                    }
                    if rules.force_overscroll_contain && !html.contains("overscroll-behavior: contain") {
                        report.error("style=\"overscroll-behavior: contain\" is mandatory on index.html <body> tag to prevent scroll reloading on mobile browsers");
                    }
                    if rules.force_mobile_web_app_capable
                        && !html.contains("name=\"mobile-web-app-capable\" content=\"yes\"")
                    {
                        report.error("<meta name=\"mobile-web-app-capable\" content=\"yes\"> is mandatory on index.html to enable app-like features on mobile browsers");
                    }
                }
                Err(_) => report.error(format!("Could not find {}", index.display())),
            }

            if rules.force_https_with_htaccess {
                let htaccess = std::fs::read_to_string(ctx.paths.src().join("htaccess.txt")).unwrap_or_default();
                if !htaccess.contains(HTTPS_REWRITE_RULE) {
                    report.error(format!(
                        "src/htaccess.txt must exist and redirect all urls from http to https with the following code:\nRewriteCond %{{HTTPS}} off\n{}",
                        HTTPS_REWRITE_RULE
                    ));
                }
            }
        }
    }

    let lint = match ctx.project_type {
        ProjectType::AppAngular => rules.is_some_and(|rules| rules.lint_enabled),
        ProjectType::LibAngular => true,
        _ => false,
    };

    if lint {
        check_tools(&ctx.toolchain, &[Tool::Ng])?;
        console::text("\nLaunching ng lint");
        let passed = ToolCommand::for_tool(&ctx.toolchain, Tool::Ng)
            .arg("lint")
            .current_dir(ctx.paths.root())
            .stream()
            .await?;
        if !passed {
            report.error("angular lint validate failed");
        }
    }

    Ok(())
}
