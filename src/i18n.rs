// src/i18n.rs
//
// Lightweight runtime i18n:
// - Strings live in assets/i18n/<lang>.json
// - Load order: selected lang -> fallback en
// - Lookup: tr("key") / tr_with("key", [("name", "...")]) with {name} placeholders
//
// Language selection:
// - CLI: --lang <code> (e.g. en, zh-Hans)
// - Env: DOME_LANG
// - Default: en

use once_cell::sync::OnceCell;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::RwLock,
};

const FALLBACK_LANG: &str = "en";

#[derive(Debug, Clone)]
pub struct I18n {
    pub lang: String,
    map: HashMap<String, String>,
    fallback_map: HashMap<String, String>,
}

static I18N: OnceCell<RwLock<I18n>> = OnceCell::new();

fn load_json_map(path: &Path) -> Option<HashMap<String, String>> {
    let text = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&text) {
        Ok(map) => Some(map),
        Err(e) => {
            log::warn!("i18n: {} is not a string table: {}", path.display(), e);
            None
        }
    }
}

/// Look for `assets/<rel>` next to the executable, then in the working directory.
fn find_asset(rel: &Path) -> Option<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let p = dir.join("assets").join(rel);
            if p.exists() {
                return Some(p);
            }
        }
    }

    let p = PathBuf::from("assets").join(rel);
    p.exists().then_some(p)
}

fn load_lang(lang: &str) -> HashMap<String, String> {
    let per_lang = Path::new("i18n").join(format!("{}.json", lang));
    find_asset(&per_lang)
        .and_then(|p| load_json_map(&p))
        .unwrap_or_else(|| {
            log::debug!("i18n: no strings for {}", lang);
            HashMap::new()
        })
}

/// Initialize global i18n. Safe to call multiple times; later calls overwrite current lang maps.
pub fn init(lang: impl Into<String>) {
    let lang = lang.into();

    let map = load_lang(&lang);
    let fallback_map = if lang == FALLBACK_LANG {
        map.clone()
    } else {
        load_lang(FALLBACK_LANG)
    };

    let i = I18n {
        lang,
        map,
        fallback_map,
    };

    if let Some(lock) = I18N.get() {
        if let Ok(mut w) = lock.write() {
            *w = i;
        }
    } else {
        let _ = I18N.set(RwLock::new(i));
    }
}

fn get_locked() -> Option<std::sync::RwLockReadGuard<'static, I18n>> {
    I18N.get().and_then(|l| l.read().ok())
}

/// Get localized text by key. If key missing, returns key itself.
pub fn tr(key: &str) -> String {
    let Some(i) = get_locked() else {
        return key.to_string();
    };

    i.map
        .get(key)
        .or_else(|| i.fallback_map.get(key))
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

/// Get localized text and substitute `{name}` placeholders.
/// Any placeholder not provided is kept as-is.
pub fn tr_with(key: &str, args: &[(&str, String)]) -> String {
    substitute(tr(key), args)
}

fn substitute(mut s: String, args: &[(&str, String)]) -> String {
    for (k, v) in args {
        let placeholder = format!("{{{}}}", k);
        s = s.replace(&placeholder, v);
    }
    s
}

/// Choose language from CLI/env.
pub fn resolve_lang_from_args() -> String {
    let mut it = std::env::args();
    while let Some(a) = it.next() {
        if a == "--lang" {
            if let Some(v) = it.next() {
                return v;
            }
        }
    }

    if let Ok(v) = std::env::var("DOME_LANG") {
        if !v.trim().is_empty() {
            return v;
        }
    }

    FALLBACK_LANG.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_placeholders_only() {
        let s = substitute(
            "Loaded {count} images from {dir}".to_string(),
            &[("count", "3".to_string())],
        );
        assert_eq!(s, "Loaded 3 images from {dir}");
    }

    #[test]
    fn shipped_tables_load_per_language() {
        let en = load_lang("en");
        assert_eq!(en.get("app.title").map(String::as_str), Some("Dome Gallery"));
        let zh = load_lang("zh-Hans");
        assert!(zh.contains_key("status.no_images"));
        assert!(load_lang("xx-none").is_empty());
    }

    #[test]
    fn shipped_tables_share_keys() {
        let mut en: Vec<_> = load_lang("en").into_keys().collect();
        let mut zh: Vec<_> = load_lang("zh-Hans").into_keys().collect();
        en.sort();
        zh.sort();
        assert_eq!(en, zh);
    }

    #[test]
    fn missing_key_falls_back_to_key() {
        assert_eq!(tr("no.such.key"), "no.such.key");
    }
}
