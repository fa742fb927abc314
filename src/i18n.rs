//! Internationalization (i18n) module
//!
//! Provides language detection and localized strings for the CLI interface.
//! Supports English and Japanese.
//! Note: Log messages remain in English for consistency.

use std::sync::OnceLock;

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Japanese,
}

/// Global language instance
static LANGUAGE: OnceLock<Language> = OnceLock::new();

/// Initialize and get the current language based on system locale
pub fn get_language() -> Language {
    *LANGUAGE.get_or_init(detect_language)
}

/// Detect system language from environment variables
fn detect_language() -> Language {
    let locale = std::env::var("LC_ALL")
        .or_else(|_| std::env::var("LC_MESSAGES"))
        .or_else(|_| std::env::var("LANG"))
        .unwrap_or_default();

    language_from_locale(&locale)
}

/// Map a locale string such as `ja_JP.UTF-8` to a supported language
pub fn language_from_locale(locale: &str) -> Language {
    let locale = locale.to_lowercase();
    if locale.starts_with("ja") || locale.contains("japanese") {
        Language::Japanese
    } else {
        Language::English
    }
}

/// Localized strings for the CLI interface
pub struct Strings;

impl Strings {
    pub fn input_output_required() -> &'static str {
        match get_language() {
            Language::English => "Please specify both an input folder and an output folder.",
            Language::Japanese => "入力フォルダと出力フォルダを指定してください。",
        }
    }

    pub fn sorting_complete() -> &'static str {
        match get_language() {
            Language::English => "Sorting complete",
            Language::Japanese => "振り分け処理が完了しました",
        }
    }

    pub fn sorting_failed() -> &'static str {
        match get_language() {
            Language::English => "An error occurred during sorting:",
            Language::Japanese => "振り分け処理中にエラーが発生しました:",
        }
    }

    pub fn stat_total() -> &'static str {
        match get_language() {
            Language::English => "Files found",
            Language::Japanese => "検出ファイル数",
        }
    }

    pub fn stat_dated() -> &'static str {
        match get_language() {
            Language::English => "Sorted by date",
            Language::Japanese => "撮影日で振り分け",
        }
    }

    pub fn stat_no_date() -> &'static str {
        match get_language() {
            Language::English => "No capture date",
            Language::Japanese => "撮影日なし",
        }
    }

    pub fn stat_failed() -> &'static str {
        match get_language() {
            Language::English => "Failed",
            Language::Japanese => "失敗",
        }
    }

    pub fn failed_files(n: usize) -> String {
        match get_language() {
            Language::English => format!("{} file(s) could not be moved:", n),
            Language::Japanese => format!("{} 件のファイルを移動できませんでした:", n),
        }
    }

    pub fn detailed_results() -> &'static str {
        match get_language() {
            Language::English => "Detailed results:",
            Language::Japanese => "詳細結果:",
        }
    }

    pub fn config_written() -> &'static str {
        match get_language() {
            Language::English => "Configuration file written:",
            Language::Japanese => "設定ファイルを書き出しました:",
        }
    }

    pub fn stat_skipped() -> &'static str {
        match get_language() {
            Language::English => "Already sorted",
            Language::Japanese => "振り分け済み",
        }
    }

    pub fn log_file() -> &'static str {
        match get_language() {
            Language::English => "Log file",
            Language::Japanese => "ログファイル",
        }
    }
}
