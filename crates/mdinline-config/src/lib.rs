//! Configuration management for mdinline.
//!
//! Parses `mdinline.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`]. Validation runs
//! after CLI settings are applied, so a document list given on the command
//! line satisfies the "at least one document" rule.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `working_dir`
//! - `diagrams.caption`
//! - `renderer.command`

mod expand;

use mdinline_diagrams::consts::{
    DEFAULT_ARGS, DEFAULT_BACKGROUND, DEFAULT_CAPTION, DEFAULT_IMAGE_DIR, DEFAULT_JOBS,
    DEFAULT_PROGRAM, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER,
};
use mdinline_diagrams::{DiagramFormat, DiagramLanguage, check_documents};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the working directory.
    pub working_dir: Option<PathBuf>,
    /// Override the document list.
    pub documents: Option<Vec<String>>,
    /// Override the number of documents processed in parallel.
    pub jobs: Option<usize>,
    /// Override the renderer program (replaces `renderer.command`).
    pub renderer: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdinline.toml";

/// Fence tags accepted in `diagrams.language`, for error messages.
const SUPPORTED_LANGUAGES: &[&str] = &["mermaid", "plantuml", "graphviz", "dot"];

/// Values accepted in `diagrams.format`, for error messages.
const SUPPORTED_FORMATS: &[&str] = &["png", "svg"];

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Working directory as written in TOML (relative to the config file).
    working_dir: Option<String>,
    /// Documents to process, relative to the working directory.
    pub documents: Vec<String>,
    /// Diagram extraction and output configuration.
    pub diagrams: DiagramsConfig,
    /// External renderer configuration.
    pub renderer: RendererConfig,
    /// Run configuration.
    pub run: RunConfig,

    /// Resolved working directory (set after loading).
    #[serde(skip)]
    pub working_dir_resolved: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Diagram extraction and output configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
    /// Fence tag marking diagram blocks.
    pub language: String,
    /// Image directory relative to the working directory.
    pub image_dir: String,
    /// Alt text of the generated image embeds.
    pub caption: String,
    /// Output image format.
    pub format: String,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            language: DiagramLanguage::default().tag().to_owned(),
            image_dir: DEFAULT_IMAGE_DIR.to_owned(),
            caption: DEFAULT_CAPTION.to_owned(),
            format: DiagramFormat::default().extension().to_owned(),
        }
    }
}

/// External renderer configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Program followed by any leading arguments.
    pub command: Vec<String>,
    /// Argument template with `{input}`, `{output}` and `{background}` placeholders.
    pub args: Vec<String>,
    /// Background requested from the renderer.
    pub background: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            command: vec![DEFAULT_PROGRAM.to_owned()],
            args: DEFAULT_ARGS.iter().map(|&arg| arg.to_owned()).collect(),
            background: DEFAULT_BACKGROUND.to_owned(),
        }
    }
}

/// Run configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of documents processed in parallel.
    pub jobs: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { jobs: DEFAULT_JOBS }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`working_dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a string field to be accepted by `parse`.
fn require_parsed<T>(
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
    allowed: &[&str],
    field: &str,
) -> Result<(), ConfigError> {
    if parse(value).is_none() {
        return Err(ConfigError::Validation(format!(
            "{field} must be one of: {} (got '{value}')",
            allowed.join(", ")
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdinline.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The result is
    /// validated last.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(working_dir) = &settings.working_dir {
            self.working_dir_resolved.clone_from(working_dir);
        }
        if let Some(documents) = &settings.documents
            && !documents.is_empty()
        {
            self.documents.clone_from(documents);
        }
        if let Some(jobs) = settings.jobs {
            self.run.jobs = jobs;
        }
        if let Some(renderer) = &settings.renderer {
            self.renderer.command = vec![renderer.clone()];
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            working_dir: None,
            documents: Vec::new(),
            diagrams: DiagramsConfig::default(),
            renderer: RendererConfig::default(),
            run: RunConfig::default(),
            working_dir_resolved: base.to_path_buf(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_documents()?;
        self.validate_diagrams()?;
        self.validate_renderer()?;
        self.validate_run()?;
        Ok(())
    }

    /// Validate the document list and working directory.
    fn validate_documents(&self) -> Result<(), ConfigError> {
        if self.documents.is_empty() {
            return Err(ConfigError::Validation(
                "no documents configured (set `documents` or pass them as arguments)".to_owned(),
            ));
        }
        for document in &self.documents {
            require_non_empty(document, "documents")?;
        }

        let dir = &self.working_dir_resolved;
        if !dir.is_dir() {
            return Err(ConfigError::Validation(format!(
                "working directory {} does not exist or is not a directory",
                dir.display()
            )));
        }

        check_documents(dir, &self.diagrams.image_dir, &self.documents)
            .map_err(|conflict| ConfigError::Validation(conflict.to_string()))
    }

    /// Validate diagrams configuration.
    fn validate_diagrams(&self) -> Result<(), ConfigError> {
        require_parsed(
            &self.diagrams.language,
            DiagramLanguage::parse,
            SUPPORTED_LANGUAGES,
            "diagrams.language",
        )?;
        require_parsed(
            &self.diagrams.format,
            DiagramFormat::parse,
            SUPPORTED_FORMATS,
            "diagrams.format",
        )?;
        require_non_empty(&self.diagrams.image_dir, "diagrams.image_dir")?;

        if Path::new(&self.diagrams.image_dir).is_absolute() {
            return Err(ConfigError::Validation(
                "diagrams.image_dir must be relative to the working directory".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate renderer configuration.
    fn validate_renderer(&self) -> Result<(), ConfigError> {
        let Some(program) = self.renderer.command.first() else {
            return Err(ConfigError::Validation(
                "renderer.command cannot be empty".to_owned(),
            ));
        };
        require_non_empty(program, "renderer.command")?;

        for placeholder in [INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER] {
            if !self.renderer.args.iter().any(|a| a.contains(placeholder)) {
                return Err(ConfigError::Validation(format!(
                    "renderer.args must contain the {placeholder} placeholder"
                )));
            }
        }

        Ok(())
    }

    /// Validate run configuration.
    fn validate_run(&self) -> Result<(), ConfigError> {
        if self.run.jobs == 0 {
            return Err(ConfigError::Validation(
                "run.jobs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.working_dir {
            self.working_dir = Some(expand::expand_env(dir, "working_dir")?);
        }

        self.diagrams.caption = expand::expand_env(&self.diagrams.caption, "diagrams.caption")?;

        self.renderer.command = self
            .renderer
            .command
            .iter()
            .map(|part| expand::expand_env(part, "renderer.command"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(())
    }

    /// Resolve the working directory relative to the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.working_dir_resolved = config_dir.join(self.working_dir.as_deref().unwrap_or("."));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn valid_config(dir: &Path) -> Config {
        let mut config = Config::default_with_base(dir);
        config.documents = vec!["guide.md".to_owned()];
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.working_dir_resolved, PathBuf::from("/test"));
        assert!(config.documents.is_empty());
        assert_eq!(config.diagrams.language, "mermaid");
        assert_eq!(config.diagrams.image_dir, "image");
        assert_eq!(config.diagrams.caption, "流程图");
        assert_eq!(config.diagrams.format, "png");
        assert_eq!(config.renderer.command, vec!["mmdc".to_owned()]);
        assert_eq!(
            config.renderer.args,
            vec!["-i", "{input}", "-o", "{output}", "-b", "{background}"]
        );
        assert_eq!(config.renderer.background, "transparent");
        assert_eq!(config.run.jobs, 1);
        // Same values the inliner falls back to
        assert_eq!(config.renderer.args, DEFAULT_ARGS);
        assert_eq!(config.diagrams.caption, DEFAULT_CAPTION);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.documents.is_empty());
        assert_eq!(config.diagrams.language, "mermaid");
        assert_eq!(config.run.jobs, 1);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
working_dir = "docs"
documents = ["guide.md", "api.md"]

[diagrams]
language = "plantuml"
image_dir = "assets"
caption = "Diagram"
format = "svg"

[renderer]
command = ["npx", "mmdc"]
args = ["{input}", "{output}"]
background = "white"

[run]
jobs = 4
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.working_dir.as_deref(), Some("docs"));
        assert_eq!(config.documents, vec!["guide.md", "api.md"]);
        assert_eq!(config.diagrams.language, "plantuml");
        assert_eq!(config.diagrams.image_dir, "assets");
        assert_eq!(config.diagrams.caption, "Diagram");
        assert_eq!(config.diagrams.format, "svg");
        assert_eq!(config.renderer.command, vec!["npx", "mmdc"]);
        assert_eq!(config.renderer.args, vec!["{input}", "{output}"]);
        assert_eq!(config.renderer.background, "white");
        assert_eq!(config.run.jobs, 4);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let toml = r#"
[diagrams]
caption = "Flow"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.diagrams.caption, "Flow");
        assert_eq!(config.diagrams.language, "mermaid");
        assert_eq!(config.diagrams.image_dir, "image");
    }

    #[test]
    fn test_resolve_paths() {
        let mut config: Config = toml::from_str(r#"working_dir = "docs/specs""#).unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.working_dir_resolved,
            PathBuf::from("/project/docs/specs")
        );
    }

    #[test]
    fn test_resolve_paths_defaults_to_config_dir() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.working_dir_resolved, PathBuf::from("/project/."));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let settings = CliSettings {
            working_dir: Some(PathBuf::from("/other")),
            documents: Some(vec!["a.md".to_owned()]),
            jobs: Some(3),
            renderer: Some("/usr/local/bin/mmdc".to_owned()),
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.working_dir_resolved, PathBuf::from("/other"));
        assert_eq!(config.documents, vec!["a.md"]);
        assert_eq!(config.run.jobs, 3);
        assert_eq!(config.renderer.command, vec!["/usr/local/bin/mmdc"]);
    }

    #[test]
    fn test_apply_cli_settings_empty_documents_keeps_config() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.documents = vec!["kept.md".to_owned()];
        let settings = CliSettings {
            documents: Some(Vec::new()),
            ..Default::default()
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.documents, vec!["kept.md"]);
        assert_eq!(config.run.jobs, 1); // Unchanged
    }

    #[test]
    fn test_validate_ok() {
        let dir = tempfile::tempdir().unwrap();
        valid_config(dir.path()).validate().unwrap();
    }

    #[test]
    fn test_validate_requires_documents() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default_with_base(dir.path());

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("no documents"));
    }

    #[test]
    fn test_validate_duplicate_documents() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(dir.path());
        config.documents.push("guide.md".to_owned());

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("same file"));
    }

    #[test]
    fn test_validate_aliased_documents() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(dir.path());
        config.documents.push("./guide.md".to_owned());
        config
            .documents
            .push(dir.path().join("guide.md").display().to_string());

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("'./guide.md' is the same file as 'guide.md'"));
    }

    #[test]
    fn test_validate_documents_sharing_image_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(dir.path());
        config.documents = vec!["a/guide.md".to_owned(), "b/guide.md".to_owned()];

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("share the image directory image/guide"));
    }

    #[test]
    fn test_validate_missing_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = valid_config(&dir.path().join("missing"));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_validate_unknown_language() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(dir.path());
        config.diagrams.language = "d2".to_owned();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("diagrams.language"));
        assert!(err.to_string().contains("'d2'"));
    }

    #[test]
    fn test_validate_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(dir.path());
        config.diagrams.format = "jpeg".to_owned();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("diagrams.format"));
    }

    #[test]
    fn test_validate_absolute_image_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(dir.path());
        config.diagrams.image_dir = "/tmp/images".to_owned();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("diagrams.image_dir"));
    }

    #[test]
    fn test_validate_empty_command() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(dir.path());
        config.renderer.command.clear();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("renderer.command"));
    }

    #[test]
    fn test_validate_args_require_output_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(dir.path());
        config.renderer.args = vec!["-i".to_owned(), "{input}".to_owned()];

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("{output}"));
    }

    #[test]
    fn test_validate_zero_jobs() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = valid_config(dir.path());
        config.run.jobs = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("run.jobs"));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdinline.toml");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        let path = dir.path().join("mdinline.toml");
        std::fs::write(
            &path,
            "working_dir = \"docs\"\ndocuments = [\"guide.md\"]\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.working_dir_resolved, dir.path().join("docs"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_expands_working_dir_before_resolving() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("specs")).unwrap();
        let path = dir.path().join("mdinline.toml");
        std::fs::write(
            &path,
            "working_dir = \"${MDINLINE_TEST_LOAD_DIR}\"\ndocuments = [\"guide.md\"]\n",
        )
        .unwrap();
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MDINLINE_TEST_LOAD_DIR", "specs");
        }

        let result = Config::load(Some(&path), None);
        unsafe {
            std::env::remove_var("MDINLINE_TEST_LOAD_DIR");
        }

        let config = result.unwrap();
        assert_eq!(config.working_dir_resolved, dir.path().join("specs"));
    }

    #[test]
    fn test_load_unset_working_dir_var() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdinline.toml");
        std::fs::write(
            &path,
            "working_dir = \"${MDINLINE_TEST_LOAD_UNSET}\"\ndocuments = [\"guide.md\"]\n",
        )
        .unwrap();
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MDINLINE_TEST_LOAD_UNSET");
        }

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "working_dir"));
    }

    #[test]
    fn test_load_cli_documents_satisfy_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdinline.toml");
        std::fs::write(&path, "[run]\njobs = 2\n").unwrap();
        let settings = CliSettings {
            documents: Some(vec!["guide.md".to_owned()]),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.documents, vec!["guide.md"]);
        assert_eq!(config.run.jobs, 2);
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mdinline.toml");
        std::fs::write(&path, "documents = [unclosed").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
