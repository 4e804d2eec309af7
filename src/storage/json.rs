//! Flat JSON file sink
//!
//! One pretty-printed file per problem, named `{slug}_{id}.json`. Files are
//! written to a temporary name and renamed into place, so a reader never
//! sees a half-written record.

use crate::problem::ProblemRecord;
use crate::storage::traits::{validate_record, RecordSink, SinkError, SinkResult};
use std::fs;
use std::path::{Path, PathBuf};

pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    /// Uses `dir` as the output directory, creating it if needed
    pub fn new(dir: &Path) -> SinkResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `record` is stored
    pub fn path_for(&self, record: &ProblemRecord) -> PathBuf {
        self.dir.join(file_name(&record.slug, record.id))
    }

    /// Reads back the record stored for `id`, if any
    pub fn get(&self, id: u32) -> SinkResult<Option<ProblemRecord>> {
        match self.files_for_id(id)?.into_iter().next() {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                Ok(Some(serde_json::from_str(&content)?))
            }
            None => Ok(None),
        }
    }

    /// Reads every stored record, ordered by id
    pub fn load_all(&self) -> SinkResult<Vec<ProblemRecord>> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            records.push(serde_json::from_str::<ProblemRecord>(&content)?);
        }
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    fn files_for_id(&self, id: u32) -> SinkResult<Vec<PathBuf>> {
        self.files_matching(|_, file_id| file_id == id)
    }

    fn files_matching(&self, wanted: impl Fn(&str, u32) -> bool) -> SinkResult<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let matches = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(parse_file_name)
                .is_some_and(|(slug, id)| wanted(slug, id));
            if matches {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

fn file_name(slug: &str, id: u32) -> String {
    format!("{}_{}.json", slug, id)
}

/// Splits `{slug}_{id}.json` back into its parts
fn parse_file_name(name: &str) -> Option<(&str, u32)> {
    let (slug, id) = name.strip_suffix(".json")?.rsplit_once('_')?;
    Some((slug, id.parse().ok()?))
}

impl RecordSink for JsonFileSink {
    fn upsert(&mut self, record: &ProblemRecord) -> SinkResult<()> {
        validate_record(record)?;
        if record.slug.contains(['/', '\\']) || record.slug.starts_with('.') {
            return Err(SinkError::InvalidRecord(format!(
                "slug '{}' cannot be used as a file name",
                record.slug
            )));
        }

        let target = self.path_for(record);
        let tmp = target.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(record)?)?;
        fs::rename(&tmp, &target)?;

        // Same id under an older slug, or the slug under an older id
        let stale_files =
            self.files_matching(|slug, id| id == record.id || slug == record.slug)?;
        for stale in stale_files {
            if stale != target {
                tracing::debug!("Removing stale file {}", stale.display());
                fs::remove_file(stale)?;
            }
        }

        tracing::debug!("Wrote {}", target.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
