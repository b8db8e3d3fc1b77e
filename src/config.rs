use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".i18nrc.json";

/// Placeholder replaced by the language key in `langFileName`.
pub const LANG_PLACEHOLDER: &str = "{lang}";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOptions {
    /// Name of the translation function, e.g. `$t`.
    #[serde(default = "default_translate_key")]
    pub translate_key: String,
    /// Wrapper component used in JSX element mode.
    #[serde(default = "default_jsx_element")]
    pub jsx_element: String,
    /// Emit `<Trans id=".." />` elements instead of calls for JSX text.
    #[serde(default)]
    pub jsx: bool,
    /// Rewrite sources in place and merge new keys into the source locale.
    /// When off, keys are only collected and stale locale entries are pruned.
    #[serde(default)]
    pub rewrite: bool,
    /// Extract plain strings, template chunks and JSX text (translation calls
    /// are always processed).
    #[serde(default = "default_true")]
    pub extract_from_text: bool,
    #[serde(default = "default_true")]
    pub auto_import_i18n: bool,
    #[serde(default = "default_true")]
    pub auto_translate: bool,
    #[serde(default = "default_true")]
    pub clean_translate: bool,
    /// Use the raw text itself as the key.
    #[serde(default)]
    pub keep_raw: bool,
    /// Keep the source text as a second, default-message argument.
    #[serde(default)]
    pub keep_default_msg: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Flush the aggregated map to disk from the host transform hook.
    #[serde(default = "default_true")]
    pub output_json_in_plugin: bool,
    #[serde(default = "default_output_json_debounce_ms")]
    pub output_json_debounce_ms: u64,
    /// Delay between target locales, in milliseconds.
    #[serde(default = "default_translate_interval")]
    pub translate_interval: u64,
    #[serde(default)]
    pub excluded_call: Vec<String>,
    #[serde(default = "default_include_path")]
    pub include_path: Vec<String>,
    #[serde(default)]
    pub excluded_path: Vec<String>,
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default = "default_from_lang")]
    pub from_lang: String,
    #[serde(default = "default_translate_lang_keys")]
    pub translate_lang_keys: Vec<String>,
    #[serde(default = "default_i18n_pkg_import_path")]
    pub i18n_pkg_import_path: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    /// Locale file name template, `{lang}` is replaced by the language key.
    #[serde(default = "default_lang_file_name")]
    pub lang_file_name: String,
    #[serde(default = "default_key_length")]
    pub key_length: usize,
    /// Extra `language -> regex` matchers for text detection.
    #[serde(default)]
    pub lang_patterns: BTreeMap<String, String>,
    /// Formatter run on each rewritten file; the file path is appended.
    #[serde(default)]
    pub format_command: Option<Vec<String>>,
    #[serde(default)]
    pub translator: TranslatorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TranslatorConfig {
    #[serde(rename_all = "camelCase")]
    Google {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        proxy: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Openai {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
        #[serde(default = "default_openai_model")]
        model: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Baidu {
        app_id: String,
        app_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        proxy: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
        /// Milliseconds between two requests.
        #[serde(default = "default_signed_api_interval")]
        interval: u64,
    },
    #[serde(rename_all = "camelCase")]
    Youdao {
        app_id: String,
        app_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        proxy: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
        #[serde(default = "default_signed_api_interval")]
        interval: u64,
    },
    Empty,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig::Google {
            proxy: None,
            base_url: None,
        }
    }
}

fn default_signed_api_interval() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_translate_key() -> String {
    "$t".to_string()
}

fn default_jsx_element() -> String {
    "Trans".to_string()
}

fn default_output_json_debounce_ms() -> u64 {
    2000
}

fn default_translate_interval() -> u64 {
    1000
}

fn default_include_path() -> Vec<String> {
    vec!["src/".to_string()]
}

fn default_allowed_extensions() -> Vec<String> {
    [".vue", ".nvue", ".uvue", ".tsx", ".ts", ".jsx", ".js"]
        .map(String::from)
        .to_vec()
}

fn default_from_lang() -> String {
    "zh-cn".to_string()
}

fn default_translate_lang_keys() -> Vec<String> {
    vec!["zh-tw".to_string(), "en".to_string()]
}

fn default_i18n_pkg_import_path() -> String {
    "@/i18n".to_string()
}

fn default_output_path() -> String {
    "src/i18n".to_string()
}

fn default_lang_file_name() -> String {
    LANG_PLACEHOLDER.to_string()
}

fn default_key_length() -> usize {
    crate::core::key::DEFAULT_KEY_LENGTH
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            translate_key: default_translate_key(),
            jsx_element: default_jsx_element(),
            jsx: false,
            rewrite: false,
            extract_from_text: true,
            auto_import_i18n: true,
            auto_translate: true,
            clean_translate: true,
            keep_raw: false,
            keep_default_msg: false,
            enabled: true,
            output_json_in_plugin: true,
            output_json_debounce_ms: default_output_json_debounce_ms(),
            translate_interval: default_translate_interval(),
            excluded_call: Vec::new(),
            include_path: default_include_path(),
            excluded_path: Vec::new(),
            allowed_extensions: default_allowed_extensions(),
            from_lang: default_from_lang(),
            translate_lang_keys: default_translate_lang_keys(),
            i18n_pkg_import_path: default_i18n_pkg_import_path(),
            output_path: default_output_path(),
            lang_file_name: default_lang_file_name(),
            key_length: default_key_length(),
            lang_patterns: BTreeMap::new(),
            format_command: None,
            translator: TranslatorConfig::default(),
        }
    }
}

impl ExtractionOptions {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.translate_key.trim().is_empty() {
            bail!("'translateKey' must not be empty");
        }
        if !(4..=16).contains(&self.key_length) {
            bail!(
                "'keyLength' must be between 4 and 16, got {}",
                self.key_length
            );
        }
        if !self.lang_file_name.contains(LANG_PLACEHOLDER) {
            bail!(
                "'langFileName' must contain {}: \"{}\"",
                LANG_PLACEHOLDER,
                self.lang_file_name
            );
        }

        // Patterns without wildcards are literal path prefixes.
        for pattern in &self.excluded_path {
            if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'excludedPath': \"{}\"", pattern)
                })?;
            }
        }

        for (lang, pattern) in &self.lang_patterns {
            Regex::new(pattern).with_context(|| {
                format!("Invalid regex in 'langPatterns' for '{}': \"{}\"", lang, pattern)
            })?;
        }

        if let Some(command) = &self.format_command
            && command.is_empty()
        {
            bail!("'formatCommand' must name a program");
        }

        Ok(())
    }

    /// Path of the locale file for `lang`, relative to `root`.
    pub fn lang_json_path(&self, root: &Path, lang: &str) -> PathBuf {
        let file_name = self.lang_file_name.replace(LANG_PLACEHOLDER, lang);
        root.join(&self.output_path).join(format!("{}.json", file_name))
    }

    /// Whether the file extension of `path` is in `allowedExtensions`.
    pub fn is_allowed_file(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

pub fn default_config_json() -> Result<String> {
    let config = ExtractionOptions::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: ExtractionOptions,
    /// Directory holding the config file; paths in the config are relative to it.
    pub root: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: ExtractionOptions = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                root,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: ExtractionOptions::default(),
            root: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use pretty_assertions::assert_eq;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_options() {
        let options = ExtractionOptions::default();
        assert_eq!(options.translate_key, "$t");
        assert_eq!(options.from_lang, "zh-cn");
        assert_eq!(options.i18n_pkg_import_path, "@/i18n");
        assert_eq!(options.translate_lang_keys, vec!["zh-tw", "en"]);
        assert!(!options.rewrite);
        assert!(options.extract_from_text);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let json = r#"{
              "translateKey": "t",
              "rewrite": true,
              "excludedCall": ["logger.info"],
              "translator": { "type": "empty" }
          }"#;
        let options: ExtractionOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.translate_key, "t");
        assert!(options.rewrite);
        assert_eq!(options.excluded_call, vec!["logger.info"]);
        assert_eq!(options.translator, TranslatorConfig::Empty);
        assert_eq!(options.output_path, "src/i18n");
    }

    #[test]
    fn test_parse_openai_translator() {
        let json = r#"{ "translator": { "type": "openai", "apiKey": "sk-test" } }"#;
        let options: ExtractionOptions = serde_json::from_str(json).unwrap();
        assert_eq!(
            options.translator,
            TranslatorConfig::Openai {
                api_key: Some("sk-test".to_string()),
                model: "gpt-4o-mini".to_string(),
                base_url: None,
            }
        );
    }

    #[test]
    fn test_parse_signed_translators() {
        let json = r#"{ "translator": { "type": "baidu", "appId": "id", "appKey": "key" } }"#;
        let options: ExtractionOptions = serde_json::from_str(json).unwrap();
        assert_eq!(
            options.translator,
            TranslatorConfig::Baidu {
                app_id: "id".to_string(),
                app_key: "key".to_string(),
                proxy: None,
                base_url: None,
                interval: 1000,
            }
        );

        let json = r#"{ "translator": { "type": "youdao", "appId": "id", "appKey": "key", "interval": 0 } }"#;
        let options: ExtractionOptions = serde_json::from_str(json).unwrap();
        assert!(matches!(
            options.translator,
            TranslatorConfig::Youdao { interval: 0, .. }
        ));

        let missing_key = r#"{ "translator": { "type": "baidu", "appId": "id" } }"#;
        assert!(serde_json::from_str::<ExtractionOptions>(missing_key).is_err());
    }

    #[test]
    fn test_default_config_round_trips() {
        let json = default_config_json().unwrap();
        assert!(json.contains("\"translateKey\": \"$t\""));
        assert!(json.contains("\"type\": \"google\""));
        let parsed: ExtractionOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ExtractionOptions::default());
    }

    #[test]
    fn test_lang_json_path() {
        let options = ExtractionOptions {
            lang_file_name: "messages.{lang}".to_string(),
            ..Default::default()
        };
        assert_eq!(
            options.lang_json_path(Path::new("/app"), "en"),
            PathBuf::from("/app/src/i18n/messages.en.json")
        );
    }

    #[test]
    fn test_is_allowed_file() {
        let options = ExtractionOptions::default();
        assert!(options.is_allowed_file(Path::new("src/App.vue")));
        assert!(options.is_allowed_file(Path::new("src/main.TS")));
        assert!(!options.is_allowed_file(Path::new("src/style.css")));
        assert!(!options.is_allowed_file(Path::new("Makefile")));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty_key = ExtractionOptions {
            translate_key: " ".to_string(),
            ..Default::default()
        };
        assert!(empty_key.validate().is_err());

        let short_key = ExtractionOptions {
            key_length: 2,
            ..Default::default()
        };
        assert!(short_key.validate().is_err());

        let bad_glob = ExtractionOptions {
            excluded_path: vec!["src/**/[invalid".to_string()],
            ..Default::default()
        };
        let err = bad_glob.validate().unwrap_err();
        assert!(err.to_string().contains("excludedPath"));

        let bad_regex = ExtractionOptions {
            lang_patterns: BTreeMap::from([("th".to_string(), "[".to_string())]),
            ..Default::default()
        };
        assert!(bad_regex.validate().is_err());

        let no_placeholder = ExtractionOptions {
            lang_file_name: "messages".to_string(),
            ..Default::default()
        };
        assert!(no_placeholder.validate().is_err());
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("components");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_stops_at_git_root() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        assert!(find_config_file(dir.path()).is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "fromLang": "en", "translateLangKeys": ["ja"] }"#,
        )
        .unwrap();
        let sub_dir = dir.path().join("src");
        fs::create_dir(&sub_dir).unwrap();

        let result = load_config(&sub_dir).unwrap();
        assert!(result.from_file);
        assert_eq!(result.root, dir.path());
        assert_eq!(result.config.from_lang, "en");
        assert_eq!(result.config.translate_lang_keys, vec!["ja"]);
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file);
        assert_eq!(result.config, ExtractionOptions::default());
    }

    #[test]
    fn test_load_config_with_invalid_value_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "keyLength": 1 }"#).unwrap();

        assert!(load_config(dir.path()).is_err());
    }
}
