//! Version comparison for builder and template compatibility

use anyhow::Result;
use semver::Version;

/// Compare the builder version against the version a template was written for.
/// Returns a warning message if the builder is older than the template expects
pub fn check_compatibility(builder_version: &str, template_version: &str) -> Option<String> {
    let builder_ver = parse_version(builder_version).ok()?;
    let template_ver = parse_version(template_version).ok()?;

    if builder_ver < template_ver {
        Some(format!(
            "Warning: This template was designed for turbobuilder {} or newer. \
             You are running version {}.",
            template_version, builder_version
        ))
    } else {
        None
    }
}

/// Parse version string, handling a leading 'v' as used on git tags
pub fn parse_version(version_str: &str) -> Result<Version> {
    let trimmed = version_str.trim();
    let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}
