//! External tool programs
//!
//! Every tool the phases shell out to has a default program name that can be replaced
//! with an environment variable, e.g. `TURBOBUILDER_TSC_BIN=./node_modules/.bin/tsc`.

use std::collections::HashMap;
use std::fmt;

/// External tools invoked by the phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Tsc,
    Webpack,
    Php,
    PhpUnit,
    Git,
    WinScp,
    UglifyJs,
    TypeDoc,
    PhpDoc,
    Jscpd,
    Ng,
    Jasmine,
    ImageMinifier,
}

impl Tool {
    pub const ALL: [Tool; 13] = [
        Tool::Tsc,
        Tool::Webpack,
        Tool::Php,
        Tool::PhpUnit,
        Tool::Git,
        Tool::WinScp,
        Tool::UglifyJs,
        Tool::TypeDoc,
        Tool::PhpDoc,
        Tool::Jscpd,
        Tool::Ng,
        Tool::Jasmine,
        Tool::ImageMinifier,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::Tsc => "TypeScript compiler",
            Tool::Webpack => "webpack",
            Tool::Php => "PHP",
            Tool::PhpUnit => "PHPUnit",
            Tool::Git => "Git",
            Tool::WinScp => "WinSCP",
            Tool::UglifyJs => "UglifyJS",
            Tool::TypeDoc => "TypeDoc",
            Tool::PhpDoc => "phpDocumentor",
            Tool::Jscpd => "jscpd",
            Tool::Ng => "Angular CLI",
            Tool::Jasmine => "Jasmine",
            Tool::ImageMinifier => "OptiPNG",
        }
    }

    /// Program used when no override is configured
    pub fn default_program(&self) -> &'static str {
        match self {
            Tool::Tsc => "tsc",
            Tool::Webpack => "webpack",
            Tool::Php => "php",
            Tool::PhpUnit => "phpunit",
            Tool::Git => "git",
            Tool::WinScp => "winscp",
            Tool::UglifyJs => "uglifyjs",
            Tool::TypeDoc => "typedoc",
            Tool::PhpDoc => "phpdoc",
            Tool::Jscpd => "jscpd",
            Tool::Ng => "ng",
            Tool::Jasmine => "jasmine",
            Tool::ImageMinifier => "optipng",
        }
    }

    /// Environment variable that overrides the program
    pub fn env_var(&self) -> &'static str {
        match self {
            Tool::Tsc => "TURBOBUILDER_TSC_BIN",
            Tool::Webpack => "TURBOBUILDER_WEBPACK_BIN",
            Tool::Php => "TURBOBUILDER_PHP_BIN",
            Tool::PhpUnit => "TURBOBUILDER_PHPUNIT_BIN",
            Tool::Git => "TURBOBUILDER_GIT_BIN",
            Tool::WinScp => "TURBOBUILDER_WINSCP_BIN",
            Tool::UglifyJs => "TURBOBUILDER_UGLIFYJS_BIN",
            Tool::TypeDoc => "TURBOBUILDER_TYPEDOC_BIN",
            Tool::PhpDoc => "TURBOBUILDER_PHPDOC_BIN",
            Tool::Jscpd => "TURBOBUILDER_JSCPD_BIN",
            Tool::Ng => "TURBOBUILDER_NG_BIN",
            Tool::Jasmine => "TURBOBUILDER_JASMINE_BIN",
            Tool::ImageMinifier => "TURBOBUILDER_IMAGE_MINIFIER_BIN",
        }
    }

    /// Arguments that make the tool print its version and exit successfully
    pub fn version_args(&self) -> &'static [&'static str] {
        match self {
            Tool::WinScp => &["/info"],
            Tool::Ng => &["version"],
            Tool::ImageMinifier => &["-v"],
            _ => &["--version"],
        }
    }

    /// Where to get the tool from, shown when it is missing
    pub fn install_hint(&self) -> &'static str {
        match self {
            Tool::Tsc => "npm install -g typescript",
            Tool::Webpack => "npm install -g webpack webpack-cli",
            Tool::Php => "https://www.php.net/downloads",
            Tool::PhpUnit => "https://phpunit.de",
            Tool::Git => "https://git-scm.com",
            Tool::WinScp => "https://winscp.net",
            Tool::UglifyJs => "npm install -g uglify-js",
            Tool::TypeDoc => "npm install -g typedoc",
            Tool::PhpDoc => "https://phpdoc.org",
            Tool::Jscpd => "npm install -g jscpd",
            Tool::Ng => "npm install -g @angular/cli",
            Tool::Jasmine => "npm install -g jasmine",
            Tool::ImageMinifier => "https://optipng.sourceforge.net",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Resolved program names for every external tool
#[derive(Debug, Clone, Default)]
pub struct Toolchain {
    overrides: HashMap<Tool, String>,
}

impl Toolchain {
    /// Read overrides from `TURBOBUILDER_<TOOL>_BIN` environment variables
    pub fn from_env() -> Self {
        let overrides = Tool::ALL
            .iter()
            .filter_map(|tool| {
                std::env::var(tool.env_var())
                    .ok()
                    .filter(|value| !value.trim().is_empty())
                    .map(|value| (*tool, value))
            })
            .collect();

        Self { overrides }
    }

    /// Replace the program used for a tool
    pub fn with_program(mut self, tool: Tool, program: impl Into<String>) -> Self {
        self.overrides.insert(tool, program.into());
        self
    }

    /// Program to launch for the given tool
    pub fn program(&self, tool: Tool) -> &str {
        self.overrides
            .get(&tool)
            .map(String::as_str)
            .unwrap_or_else(|| tool.default_program())
    }
}
