//! `turbosite.json` shape and web service rules

use super::ValidationReport;
use crate::config::TURBOSITE_SETUP_FILE;
use crate::phases::ProjectContext;
use anyhow::Result;
use serde::Deserialize;

/// The part of `turbosite.json` the builder relies on
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TurbositeSetup {
    web_services: WebServices,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebServices {
    #[serde(default)]
    api: Vec<WebServiceApi>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebServiceApi {
    uri: String,
}

/// `turbosite.json` is mandatory for site and server projects, and checked whenever present
pub(super) fn validate_turbosite_setup(
    ctx: &ProjectContext,
    report: &mut ValidationReport,
) -> Result<()> {
    let path = ctx.paths.turbosite_setup_file();

    if !ctx.project_type.is_turbosite() && !path.is_file() {
        return Ok(());
    }

    if !path.is_file() {
        report.error(format!(
            "Could not find {} at {}",
            TURBOSITE_SETUP_FILE,
            path.display()
        ));
        return Ok(());
    }

    let content = std::fs::read_to_string(&path)?;
    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            report.error(format!("Corrupted JSON for {}:\n{}", TURBOSITE_SETUP_FILE, e));
            return Ok(());
        }
    };

    let setup: TurbositeSetup = match serde_json::from_value(value) {
        Ok(setup) => setup,
        Err(e) => {
            report.error(format!("Invalid JSON schema for {}:\n{}", TURBOSITE_SETUP_FILE, e));
            return Ok(());
        }
    };

    for api in &setup.web_services.api {
        if !api.uri.starts_with("api/") {
            report.error(format!(
                "All URIs defined inside the api section on {} must start with api/ (found: {})",
                TURBOSITE_SETUP_FILE, api.uri
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::test_support::{context, write};
    use crate::setup::ProjectType;
    use serde_json::json;

    #[test]
    fn test_missing_turbosite_setup_on_site_project() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), ProjectType::SitePhp, json!({}));
        let mut report = ValidationReport::default();

        validate_turbosite_setup(&ctx, &mut report).unwrap();
        assert!(report.errors[0].starts_with("Could not find turbosite.json"));
    }

    #[test]
    fn test_not_required_for_libraries() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), ProjectType::LibPhp, json!({}));
        let mut report = ValidationReport::default();

        validate_turbosite_setup(&ctx, &mut report).unwrap();
        assert!(report.is_ok());
    }

    #[test]
    fn test_api_uris_must_start_with_api() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "turbosite.json",
            r#"{ "webServices": { "api": [ { "uri": "api/site/ok" }, { "uri": "site/bad" } ] } }"#,
        );
        let ctx = context(dir.path(), ProjectType::ServerPhp, json!({}));
        let mut report = ValidationReport::default();

        validate_turbosite_setup(&ctx, &mut report).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("(found: site/bad)"));
    }

    #[test]
    fn test_shape_errors() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "turbosite.json", r#"{ "baseURL": "" }"#);
        let ctx = context(dir.path(), ProjectType::SitePhp, json!({}));
        let mut report = ValidationReport::default();

        validate_turbosite_setup(&ctx, &mut report).unwrap();
        assert!(report.errors[0].starts_with("Invalid JSON schema for turbosite.json"));
    }
}
