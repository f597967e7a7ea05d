//! JavaScript rules

use super::{files_from_include_list, ValidationReport};
use crate::fs_utils::read_text_lossy;
use crate::phases::ProjectContext;
use anyhow::Result;

/// How far into a file with a `#!/usr/bin` line the strict directive may appear
const MAX_STRICT_OFFSET_AFTER_SHEBANG: usize = 24;

#[derive(Debug, PartialEq, Eq)]
enum StrictMode {
    Ok,
    MissingAfterShebang,
    Missing,
}

fn strict_mode(contents: &str) -> StrictMode {
    if contents.starts_with("#!/usr/bin") {
        let position = contents
            .find("use strict")
            .into_iter()
            .chain(contents.find("'use strict'"))
            .min();
        match position {
            Some(position) if position <= MAX_STRICT_OFFSET_AFTER_SHEBANG => StrictMode::Ok,
            _ => StrictMode::MissingAfterShebang,
        }
    } else if contents.starts_with("\"use strict\"") || contents.starts_with("'use strict'") {
        StrictMode::Ok
    } else {
        StrictMode::Missing
    }
}

pub(super) fn validate_javascript(
    ctx: &ProjectContext,
    report: &mut ValidationReport,
) -> Result<()> {
    let Some(javascript) = &ctx.setup.validate.javascript else {
        return Ok(());
    };
    let use_strict = &javascript.use_strict;
    if !use_strict.enabled {
        return Ok(());
    }

    for file in files_from_include_list(ctx, &ctx.paths.src(), &use_strict.includes, &use_strict.excludes) {
        let contents = read_text_lossy(&file)?;
        match strict_mode(&contents) {
            StrictMode::Ok => {}
            StrictMode::MissingAfterShebang => report.error(format!(
                "File must have \"use strict\" after #!/usr/bin:\n{}",
                file.display()
            )),
            StrictMode::Missing => report.error(format!(
                "File must start with \"use strict\": {}",
                file.display()
            )),
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
    fn test_strict_mode() {
        assert_eq!(strict_mode("\"use strict\";\nlet a;"), StrictMode::Ok);
        assert_eq!(strict_mode("'use strict';"), StrictMode::Ok);
        assert_eq!(strict_mode("#!/usr/bin/env node\n'use strict';"), StrictMode::Ok);
        assert_eq!(
            strict_mode("#!/usr/bin/env node\n\n// a comment that is long\n'use strict';"),
            StrictMode::MissingAfterShebang
        );
        assert_eq!(strict_mode("let a;\n\"use strict\";"), StrictMode::Missing);
    }

    #[test]
    fn test_validate_javascript_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main/js/index.js", "\"use strict\";\n");
        write(dir.path(), "src/main/js/bad.js", "var a = 1;\n");
        write(dir.path(), "src/main/js/vendor.min.js", "var a=1;");
        write(dir.path(), "src/main/libs/lib.js", "var a=1;");
        let ctx = context(dir.path(), ProjectType::LibJs, json!({}));
        let mut report = ValidationReport::default();

        validate_javascript(&ctx, &mut report).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].ends_with("bad.js"));
    }

    #[test]
    fn test_latin1_file_is_still_checked() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main/js/index.js", "\"use strict\";\n");
        std::fs::write(dir.path().join("src/main/js/latin.js"), b"var caf\xe9 = 1;\n").unwrap();
        let ctx = context(dir.path(), ProjectType::LibJs, json!({}));
        let mut report = ValidationReport::default();

        validate_javascript(&ctx, &mut report).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].ends_with("latin.js"));
    }
}
