//! Typed view of a merged `turbobuilder.json`
//!
//! Every struct denies unknown fields, so deserializing the merged setup doubles as its
//! schema validation. Keys are camelCase except the project type keys of `build`.

use super::project_type::ProjectType;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Setup {
    #[serde(rename = "$schema", default)]
    pub schema: Option<String>,

    pub metadata: Metadata,

    #[serde(default)]
    pub validate: ValidateSetup,

    pub build: BuildSetup,

    #[serde(default)]
    pub release: ReleaseSetup,

    /// `[]` or missing means the project does not sync anywhere
    #[serde(default, deserialize_with = "deserialize_sync")]
    pub sync: Option<SyncSetup>,

    #[serde(default)]
    pub test: Vec<TestEntry>,
}

impl Setup {
    /// The single project type enabled on the build section
    pub fn project_type(&self) -> Option<ProjectType> {
        self.build.project_types().into_iter().next()
    }
}

fn deserialize_sync<'de, D>(deserializer: D) -> Result<Option<SyncSetup>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Array(items) if items.is_empty() => Ok(None),
        other => SyncSetup::deserialize(other)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub builder_version: String,
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ValidateSetup {
    #[serde(default)]
    pub run_before_build: bool,

    #[serde(default)]
    pub project_structure: ProjectStructureRules,

    #[serde(default)]
    pub files_content: FilesContentRules,

    #[serde(default)]
    pub style_sheets: StyleSheetRules,

    #[serde(default)]
    pub php: Option<PhpRules>,

    #[serde(default)]
    pub javascript: Option<JavascriptRules>,

    #[serde(default)]
    pub site_php: Option<SitePhpRules>,

    #[serde(default)]
    pub angular_app: Option<AngularAppRules>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectStructureRules {
    #[serde(default)]
    pub readme_file_mandatory: bool,

    #[serde(default)]
    pub extras_folder_mandatory: bool,

    #[serde(default)]
    pub extras_sub_folders_mandatory: Vec<String>,

    #[serde(default)]
    pub extras_todo_extension: bool,

    #[serde(default)]
    pub strict_src_folders: StrictSrcFolders,

    #[serde(default)]
    pub strict_file_extension_case: Option<PathRule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StrictSrcFolders {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub excludes: Vec<String>,
}

/// A rule applied to every file below some project-relative paths
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PathRule {
    #[serde(default)]
    pub affected_paths: Vec<String>,

    #[serde(default)]
    pub excludes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FilesContentRules {
    #[serde(default)]
    pub tabs_forbidden: TabsForbidden,

    #[serde(default)]
    pub copy_paste_detect: Vec<CopyPasteDetect>,

    #[serde(default)]
    pub copyright_headers: Vec<CopyrightHeader>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TabsForbidden {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub affected_paths: Vec<String>,

    #[serde(default)]
    pub excludes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CopyPasteDetect {
    pub path: String,

    /// Negative values disable the entry
    pub max_percent_error_level: f64,

    #[serde(default = "default_disabled_difference")]
    pub max_percent_error_difference: f64,

    /// Extra jscpd reporter (e.g. `html`), empty for console only
    #[serde(default)]
    pub report: String,
}

fn default_disabled_difference() -> f64 {
    -1.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CopyrightHeader {
    /// Project-relative path of the file holding the expected header
    pub path: String,

    pub affected_paths: Vec<String>,

    #[serde(default)]
    pub includes: Vec<String>,

    #[serde(default)]
    pub excludes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StyleSheetRules {
    #[serde(default)]
    pub only_scss: bool,

    #[serde(default)]
    pub css_hardcoded_color_forbid: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhpRules {
    #[serde(default)]
    pub namespaces: Option<PhpNamespaces>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhpNamespaces {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub mandatory: bool,

    /// Fragments every namespace must contain; `$path` expands to the file folder
    /// relative to `src`, with `\` separators
    #[serde(default)]
    pub must_contain: Vec<String>,

    #[serde(default)]
    pub excludes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JavascriptRules {
    #[serde(default)]
    pub use_strict: UseStrict,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UseStrict {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub includes: Vec<String>,

    #[serde(default)]
    pub excludes: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SitePhpRules {
    /// `echo` and `print_r` inside web services: warning on build, error on release
    #[serde(default)]
    pub echo_and_print_forbidden: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AngularAppRules {
    #[serde(default)]
    pub lint_enabled: bool,

    #[serde(default)]
    pub no_legacy_favicon: bool,

    #[serde(default)]
    pub force_overscroll_contain: bool,

    #[serde(default)]
    pub force_mobile_web_app_capable: bool,

    #[serde(default)]
    pub force_https_with_htaccess: bool,
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildSetup {
    #[serde(default)]
    pub keep_unpacked_src_files: bool,

    #[serde(default)]
    pub replace_version: ReplaceVersion,

    #[serde(rename = "lib_php", default)]
    pub lib_php: Option<EmptyBuild>,

    #[serde(rename = "lib_ts", default)]
    pub lib_ts: Option<LibTsBuild>,

    #[serde(rename = "lib_js", default)]
    pub lib_js: Option<LibJsBuild>,

    #[serde(rename = "site_php", default)]
    pub site_php: Option<EmptyBuild>,

    #[serde(rename = "server_php", default)]
    pub server_php: Option<EmptyBuild>,

    #[serde(rename = "app_angular", default)]
    pub app_angular: Option<EmptyBuild>,

    #[serde(rename = "lib_angular", default)]
    pub lib_angular: Option<EmptyBuild>,

    #[serde(rename = "app_node_cmd", default)]
    pub app_node_cmd: Option<EmptyBuild>,
}

impl BuildSetup {
    /// Project types present on this build section, in declaration order
    pub fn project_types(&self) -> Vec<ProjectType> {
        [
            (self.lib_php.is_some(), ProjectType::LibPhp),
            (self.lib_ts.is_some(), ProjectType::LibTs),
            (self.lib_js.is_some(), ProjectType::LibJs),
            (self.site_php.is_some(), ProjectType::SitePhp),
            (self.server_php.is_some(), ProjectType::ServerPhp),
            (self.app_angular.is_some(), ProjectType::AppAngular),
            (self.lib_angular.is_some(), ProjectType::LibAngular),
            (self.app_node_cmd.is_some(), ProjectType::AppNodeCmd),
        ]
        .into_iter()
        .filter_map(|(present, project_type)| present.then_some(project_type))
        .collect()
    }
}

/// Build section for project types without options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmptyBuild {}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReplaceVersion {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub wild_card: String,

    #[serde(default)]
    pub extensions: Vec<String>,
}

impl Default for ReplaceVersion {
    fn default() -> Self {
        Self {
            enabled: false,
            wild_card: "@@--build-version--@@".to_string(),
            extensions: vec!["php".to_string(), "js".to_string(), "json".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LibTsBuild {
    #[serde(default)]
    pub compiler_strict: bool,

    #[serde(default)]
    pub compiler_declaration_file: bool,

    #[serde(default)]
    pub compiler_source_map: bool,

    #[serde(default)]
    pub targets: Vec<TsTarget>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TsTarget {
    /// Output folder below dist
    pub folder: String,

    /// tsc `--target` value (ES5, ES6...)
    pub js_target: String,

    /// Merged file name without extension, empty for the project name
    #[serde(default)]
    pub merged_file: String,

    /// Global variable exposing the library
    #[serde(default)]
    pub global_var: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LibJsBuild {
    #[serde(default = "default_true")]
    pub create_merged_file: bool,

    /// Merged file name without extension, empty for the project name
    #[serde(default)]
    pub merged_file_name: String,

    #[serde(default = "default_true")]
    pub delete_non_merged_js: bool,
}

impl Default for LibJsBuild {
    fn default() -> Self {
        Self {
            create_merged_file: true,
            merged_file_name: String::new(),
            delete_non_merged_js: true,
        }
    }
}

// ---------------------------------------------------------------------------
// release / sync / test
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReleaseSetup {
    #[serde(default)]
    pub print_todo_file: bool,

    #[serde(default)]
    pub optimize_js: bool,

    #[serde(default)]
    pub optimize_pictures: bool,

    #[serde(default)]
    pub generate_code_documentation: bool,

    #[serde(default)]
    pub git_change_log: bool,

    #[serde(default)]
    pub git_change_log_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncKind {
    FileSystem,
    Ftp,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SyncSetup {
    #[serde(default)]
    pub run_after_build: bool,

    #[serde(rename = "type")]
    pub kind: SyncKind,

    #[serde(default)]
    pub excludes: Vec<String>,

    /// Path relative to the build or release folder
    #[serde(default)]
    pub source_path: String,

    #[serde(default)]
    pub dest_path: String,

    #[serde(default)]
    pub remote_url: String,

    #[serde(default)]
    pub delete_dest_path_contents: bool,

    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub user: String,

    #[serde(default)]
    pub psw: String,

    #[serde(default)]
    pub remote_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TestEntry {
    PhpUnit(PhpUnitTest),
    Jasmine(JasmineTest),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhpUnitTest {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_php_tests_root")]
    pub tests_root: String,

    #[serde(default)]
    pub coverage_report: bool,

    #[serde(default)]
    pub coverage_report_open_after_tests: bool,
}

fn default_php_tests_root() -> String {
    "src/test/php".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JasmineTest {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_jasmine_config")]
    pub jasmine_config: String,
}

fn default_jasmine_config() -> String {
    "src/test/js/jasmine.json".to_string()
}
