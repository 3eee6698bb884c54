use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde_yaml::Value;

const LOCALES: &[&str] = &["en", "zh-CN"];

fn flatten(prefix: &str, value: &Value, out: &mut BTreeSet<String>) {
    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                let key = match k {
                    Value::String(s) => s.clone(),
                    other => panic!("non-string key {other:?} under {prefix:?}"),
                };
                let full = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&full, v, out);
            }
        }
        _ => {
            out.insert(prefix.to_string());
        }
    }
}

fn locale_keys(locale: &str) -> BTreeSet<String> {
    let path = format!("locales/{locale}.yml");
    let content = fs::read_to_string(&path).unwrap_or_else(|e| panic!("{path}: {e}"));
    let value: Value = serde_yaml::from_str(&content).unwrap_or_else(|e| panic!("{path}: {e}"));
    let mut keys = BTreeSet::new();
    flatten("", &value, &mut keys);
    keys
}

fn collect_source_keys(dir: &Path, pattern: &Regex, out: &mut BTreeSet<String>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_source_keys(&path, pattern, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let content = fs::read_to_string(&path).unwrap();
            for cap in pattern.captures_iter(&content) {
                out.insert(cap[1].to_string());
            }
        }
    }
}

#[test]
fn every_locale_has_the_same_keys() {
    let en = locale_keys("en");
    assert!(!en.is_empty());
    for locale in &LOCALES[1..] {
        let other = locale_keys(locale);
        let missing: Vec<_> = en.difference(&other).collect();
        let extra: Vec<_> = other.difference(&en).collect();
        assert!(missing.is_empty(), "{locale} is missing {missing:?}");
        assert!(extra.is_empty(), "{locale} has unknown keys {extra:?}");
    }
}

#[test]
fn every_translated_key_exists() {
    let pattern = Regex::new(r#"\bt!\(\s*"([a-z_]+(?:\.[a-z_]+)+)""#).unwrap();
    let mut used = BTreeSet::new();
    collect_source_keys(Path::new("src"), &pattern, &mut used);
    assert!(used.contains("menu.subtitle"));

    let en = locale_keys("en");
    let missing: Vec<_> = used.difference(&en).collect();
    assert!(missing.is_empty(), "keys without an English text: {missing:?}");
}

#[test]
fn placeholders_match_across_locales() {
    let placeholder = Regex::new(r"%\{(\w+)\}").unwrap();
    let texts = |locale: &str| -> Vec<(String, BTreeSet<String>)> {
        let content = fs::read_to_string(format!("locales/{locale}.yml")).unwrap();
        let value: Value = serde_yaml::from_str(&content).unwrap();
        let mut out = Vec::new();
        fn walk(prefix: &str, v: &Value, re: &Regex, out: &mut Vec<(String, BTreeSet<String>)>) {
            match v {
                Value::Mapping(map) => {
                    for (k, v) in map {
                        let k = k.as_str().unwrap_or_default();
                        let full = if prefix.is_empty() {
                            k.to_string()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&full, v, re, out);
                    }
                }
                Value::String(s) => {
                    let names = re.captures_iter(s).map(|c| c[1].to_string()).collect();
                    out.push((prefix.to_string(), names));
                }
                _ => {}
            }
        }
        walk("", &value, &placeholder, &mut out);
        out.sort();
        out
    };
    let en = texts("en");
    let zh = texts("zh-CN");
    assert_eq!(en.len(), zh.len());
    for ((key, en_names), (_, zh_names)) in en.iter().zip(&zh) {
        assert_eq!(en_names, zh_names, "placeholders differ for {key}");
    }
}
