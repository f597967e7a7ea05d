//! PHP rules: namespaces and web service output

use super::ValidationReport;
use crate::fs_utils::{find_files_with_extension, is_excluded, read_text_lossy, relative_slash_path};
use crate::phases::ProjectContext;
use crate::setup::ProjectType;
use anyhow::Result;
use regex::Regex;
use std::path::Path;

/// Namespace declared by a php file, if any
fn declared_namespace(contents: &str) -> Option<&str> {
    let (_, after) = contents.split_once("namespace")?;
    Some(after.split(';').next().unwrap_or_default().trim())
}

/// Expand `$path` with the folder of `relative_to_src` using php namespace separators
fn expand_must_contain(must_contain: &str, relative_to_src: &str) -> String {
    let folder = relative_to_src
        .rsplit_once('/')
        .map(|(folder, _)| folder)
        .unwrap_or_default();
    must_contain.replace("$path", &folder.replace('/', "\\"))
}

pub(super) fn validate_php(ctx: &ProjectContext, report: &mut ValidationReport) -> Result<()> {
    let Some(namespaces) = ctx
        .setup
        .validate
        .php
        .as_ref()
        .and_then(|php| php.namespaces.as_ref())
        .filter(|namespaces| namespaces.enabled)
    else {
        return Ok(());
    };

    let src = ctx.paths.src();
    for file in find_files_with_extension(&ctx.paths.main(), &["php"]) {
        let relative = relative_slash_path(&file, &src);
        if relative.contains("libs/") || is_excluded(&relative, &namespaces.excludes) {
            continue;
        }

        let contents = read_text_lossy(&file)?;
        match declared_namespace(&contents) {
            Some(namespace) => {
                let missing = namespaces
                    .must_contain
                    .iter()
                    .map(|must_contain| expand_must_contain(must_contain, &relative))
                    .find(|expected| !namespace.contains(expected.as_str()));
                if let Some(expected) = missing {
                    report.error(format!(
                        "Namespace error: \"{}\" Must contain \"{}\" on file:\n{}",
                        namespace,
                        expected,
                        file.display()
                    ));
                }
            }
            None if namespaces.mandatory => {
                report.error(format!(
                    "File does not contain a namespace declaration: {}",
                    file.display()
                ));
            }
            None => {}
        }
    }

    Ok(())
}

/// Web services must not write output themselves: a warning on builds, an error on releases
pub(super) fn validate_site_php(ctx: &ProjectContext, report: &mut ValidationReport) -> Result<()> {
    let forbidden = ctx
        .setup
        .validate
        .site_php
        .as_ref()
        .is_some_and(|site| site.echo_and_print_forbidden);
    if ctx.project_type != ProjectType::SitePhp || !forbidden {
        return Ok(());
    }

    let output_call = Regex::new(r"\b(echo|print_r)\b")?;
    for file in find_files_with_extension(&ctx.paths.main().join("api"), &["php"]) {
        if uses_output_call(&file, &output_call)? {
            let message = format!(
                "echo and print_r are not allowed on web services: {}",
                file.display()
            );
            if ctx.is_release {
                report.error(message);
            } else {
                report.warning(format!("Warning: {}", message));
            }
        }
    }

    Ok(())
}

fn uses_output_call(file: &Path, output_call: &Regex) -> Result<bool> {
    Ok(output_call.is_match(&read_text_lossy(file)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::test_support::{context, write};
    use serde_json::json;

    #[test]
    fn test_namespace_helpers() {
        assert_eq!(
            declared_namespace("<?php\n\nnamespace org\\lib\\src\\main\\php\\model;\n"),
            Some("org\\lib\\src\\main\\php\\model")
        );
        assert_eq!(declared_namespace("<?php echo 1;"), None);
        assert_eq!(
            expand_must_contain("src\\$path", "main/php/model/User.php"),
            "src\\main\\php\\model"
        );
    }

    #[test]
    fn test_namespace_rules() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "src/main/php/model/Good.php",
            "<?php\n\nnamespace org\\lib\\src\\main\\php\\model;\n",
        );
        write(
            dir.path(),
            "src/main/php/model/Wrong.php",
            "<?php\n\nnamespace org\\lib\\src\\main\\php;\n",
        );
        write(dir.path(), "src/main/php/Missing.php", "<?php\n");
        write(dir.path(), "src/main/php/autoloader.php", "<?php\n");
        let ctx = context(dir.path(), ProjectType::LibPhp, json!({}));
        let mut report = ValidationReport::default();

        validate_php(&ctx, &mut report).unwrap();
        assert_eq!(report.errors.len(), 2, "{:?}", report.errors);
        assert!(report.errors.iter().any(|e| e.starts_with("Namespace error") && e.ends_with("Wrong.php")));
        assert!(report.errors.iter().any(|e| e.starts_with("File does not contain a namespace")));
    }

    #[test]
    fn test_echo_in_web_service() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main/api/Service.php", "<?php\necho 'x';\n");
        let mut ctx = context(dir.path(), ProjectType::SitePhp, json!({}));
        let mut report = ValidationReport::default();

        validate_site_php(&ctx, &mut report).unwrap();
        assert!(report.is_ok());
        assert_eq!(report.warnings.len(), 1);

        ctx.is_release = true;
        let mut report = ValidationReport::default();
        validate_site_php(&ctx, &mut report).unwrap();
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_latin1_php_files_are_still_checked() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main/php/model/Latin.php", "");
        std::fs::write(
            dir.path().join("src/main/php/model/Latin.php"),
            b"<?php\n// caf\xe9\nnamespace org\\lib\\src\\main\\php;\n",
        )
        .unwrap();
        write(dir.path(), "src/main/api/Service.php", "");
        std::fs::write(
            dir.path().join("src/main/api/Service.php"),
            b"<?php\necho 'caf\xe9';\n",
        )
        .unwrap();
        let ctx = context(dir.path(), ProjectType::SitePhp, json!({}));
        let mut report = ValidationReport::default();

        validate_php(&ctx, &mut report).unwrap();
        validate_site_php(&ctx, &mut report).unwrap();
        assert!(report.errors.iter().any(|e| e.starts_with("Namespace error") && e.ends_with("Latin.php")));
        assert_eq!(report.warnings.len(), 1);
    }
}
