use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::{ALL_KEYS, EXPORT_VERSION, ExportData};

/// Key-value storage with one pretty-printed JSON document per key.
///
/// Reads never fail: a missing key is `None` and an unreadable or undecodable
/// document is logged and treated as missing. Writes replace the whole
/// document through a temp file and rename.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_dir: PathBuf,
}

impl LocalStorage {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocabdr");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.file_path(key).exists()
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.contains(key) {
            return None;
        }
        let path = self.file_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("ignoring corrupt data under {key:?}: {e}");
                None
            }
        }
    }

    pub fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.get(key).unwrap_or_default()
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        log::debug!("wrote {key} ({} bytes)", json.len());
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        if self.contains(key) {
            fs::remove_file(self.file_path(key))?;
        }
        Ok(())
    }

    /// Snapshot every known key that currently holds decodable JSON.
    pub fn export_all(&self) -> ExportData {
        let entries: BTreeMap<String, serde_json::Value> = ALL_KEYS
            .iter()
            .filter_map(|key| {
                self.get::<serde_json::Value>(key)
                    .map(|value| (key.to_string(), value))
            })
            .collect();

        ExportData {
            vocabdr_export_version: EXPORT_VERSION,
            exported_at: Utc::now(),
            entries,
        }
    }

    /// Replace all known keys with the contents of `data`.
    ///
    /// Staged: every present entry is first written to a `.tmp` file. Then each
    /// existing document is moved to `.bak` and the staged file renamed into
    /// place (keys absent from the export are only moved aside). Any failure
    /// restores the `.bak` files; success deletes them.
    pub fn import_all(&self, data: &ExportData) -> Result<()> {
        if data.vocabdr_export_version != EXPORT_VERSION {
            bail!(
                "Unsupported export version: {} (expected {})",
                data.vocabdr_export_version,
                EXPORT_VERSION
            );
        }
        if let Some(unknown) = data.entries.keys().find(|k| !ALL_KEYS.contains(&k.as_str())) {
            bail!("Unknown storage key in export: {unknown}");
        }

        let mut staged: Vec<(&str, Option<PathBuf>)> = Vec::new();
        for key in ALL_KEYS {
            let Some(value) = data.entries.get(key) else {
                staged.push((key, None));
                continue;
            };
            let tmp_path = self.file_path(key).with_extension("json.tmp");
            let written = serde_json::to_string_pretty(value)
                .map_err(anyhow::Error::from)
                .and_then(|json| {
                    let mut file = fs::File::create(&tmp_path)?;
                    file.write_all(json.as_bytes())?;
                    file.sync_all()?;
                    Ok(())
                });
            if let Err(e) = written {
                for tmp in staged.iter().filter_map(|(_, tmp)| tmp.as_ref()) {
                    let _ = fs::remove_file(tmp);
                }
                bail!("Import failed during staging: {e}");
            }
            staged.push((key, Some(tmp_path)));
        }

        let mut committed: Vec<Committed> = Vec::new();
        for (i, (key, tmp)) in staged.iter().enumerate() {
            let entry = Committed {
                final_path: self.file_path(key),
                bak_path: self.file_path(key).with_extension("json.bak"),
                had_original: self.file_path(key).exists(),
            };

            let result = (|| -> Result<()> {
                if entry.had_original {
                    fs::rename(&entry.final_path, &entry.bak_path)?;
                }
                if let Some(tmp) = tmp {
                    fs::rename(tmp, &entry.final_path)?;
                }
                Ok(())
            })();

            if let Err(e) = result {
                entry.restore();
                for done in &committed {
                    done.restore();
                }
                for tmp in staged[i..].iter().filter_map(|(_, tmp)| tmp.as_ref()) {
                    let _ = fs::remove_file(tmp);
                }
                bail!("Import failed during commit: {e}");
            }
            committed.push(entry);
        }

        for done in &committed {
            if done.had_original {
                let _ = fs::remove_file(&done.bak_path);
            }
        }
        log::info!("imported {} storage keys", data.entries.len());
        Ok(())
    }

    /// Remove `.bak` files left behind by an interrupted import.
    /// Returns true if any were found.
    pub fn check_interrupted_import(&self) -> bool {
        let mut found = false;
        for key in ALL_KEYS {
            let bak_path = self.file_path(key).with_extension("json.bak");
            if bak_path.exists() {
                found = true;
                let _ = fs::remove_file(&bak_path);
            }
        }
        found
    }
}

struct Committed {
    final_path: PathBuf,
    bak_path: PathBuf,
    had_original: bool,
}

impl Committed {
    fn restore(&self) {
        if self.had_original && self.bak_path.exists() {
            let _ = fs::rename(&self.bak_path, &self.final_path);
        } else if !self.had_original {
            let _ = fs::remove_file(&self.final_path);
        }
    }
}
