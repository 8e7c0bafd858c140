//! Plain-text persistence under the data directory.
//!
//! Layout:
//!   <root>/job_descriptions/<name>.txt
//!   <root>/resumes/<any .txt or .pdf>
//!   <root>/interviews/interview_<candidate>_<title>.txt

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::errors::AppError;

const JOB_DESCRIPTIONS_DIR: &str = "job_descriptions";
const RESUMES_DIR: &str = "resumes";
const INTERVIEWS_DIR: &str = "interviews";

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn job_descriptions_dir(&self) -> PathBuf {
        self.root.join(JOB_DESCRIPTIONS_DIR)
    }

    pub fn resumes_dir(&self) -> PathBuf {
        self.root.join(RESUMES_DIR)
    }

    pub fn interviews_dir(&self) -> PathBuf {
        self.root.join(INTERVIEWS_DIR)
    }

    /// Creates the three data directories if missing.
    pub async fn ensure_layout(&self) -> Result<(), AppError> {
        for dir in [
            self.job_descriptions_dir(),
            self.resumes_dir(),
            self.interviews_dir(),
        ] {
            fs::create_dir_all(&dir).await?;
        }
        debug!("Data directories ready under {}", self.root.display());
        Ok(())
    }

    pub async fn save_job_description(&self, name: &str, text: &str) -> Result<PathBuf, AppError> {
        let path = self
            .job_descriptions_dir()
            .join(format!("{}.txt", sanitize_file_stem(name)?));
        write_text(&path, text).await?;
        info!("Job description saved to {}", path.display());
        Ok(path)
    }

    /// File names of saved job descriptions, sorted.
    pub async fn list_job_descriptions(&self) -> Result<Vec<String>, AppError> {
        list_files(&self.job_descriptions_dir(), &["txt"]).await
    }

    pub async fn load_job_description(&self, file_name: &str) -> Result<String, AppError> {
        read_text(&self.job_descriptions_dir(), file_name).await
    }

    /// Persists a rendered transcript as `interview_<candidate>_<title>.txt`.
    pub async fn save_transcript(
        &self,
        candidate_name: &str,
        job_title: &str,
        transcript: &str,
    ) -> Result<PathBuf, AppError> {
        let file_name = format!(
            "interview_{}_{}.txt",
            sanitize_file_stem(candidate_name)?,
            sanitize_file_stem(job_title)?
        );
        let path = self.interviews_dir().join(file_name);
        write_text(&path, transcript).await?;
        info!("Transcript saved to {}", path.display());
        Ok(path)
    }

    pub async fn list_transcripts(&self) -> Result<Vec<String>, AppError> {
        list_files(&self.interviews_dir(), &["txt"]).await
    }

    pub async fn load_transcript(&self, file_name: &str) -> Result<String, AppError> {
        read_text(&self.interviews_dir(), file_name).await
    }

    /// Full paths of resume files (`.txt` / `.pdf`), sorted by name.
    pub async fn list_resumes(&self) -> Result<Vec<PathBuf>, AppError> {
        let dir = self.resumes_dir();
        Ok(list_files(&dir, &["txt", "pdf"])
            .await?
            .into_iter()
            .map(|name| dir.join(name))
            .collect())
    }
}

/// Lower-cases, turns whitespace into `_` and keeps only alphanumerics
/// (any script), `_` and `-`. Separators, dots and control characters are
/// dropped. Rejects names that end up empty.
pub fn sanitize_file_stem(name: &str) -> Result<String, AppError> {
    let stem: String = name
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some('_'),
            c if c.is_alphanumeric() || c == '_' || c == '-' => Some(c),
            _ => None,
        })
        .collect();

    if stem.trim_matches('_').is_empty() {
        return Err(AppError::Validation(format!(
            "'{name}' does not contain any characters usable in a file name"
        )));
    }
    Ok(stem)
}

async fn write_text(path: &Path, text: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, text).await?;
    Ok(())
}

async fn read_text(dir: &Path, file_name: &str) -> Result<String, AppError> {
    // Only bare file names are accepted; no path components.
    if file_name.is_empty() || Path::new(file_name).file_name() != Some(OsStr::new(file_name)) {
        return Err(AppError::Validation(format!("Invalid file name '{file_name}'")));
    }
    let path = dir.join(file_name);
    match fs::read_to_string(&path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::NotFound(format!("{} not found", path.display())))
        }
        Err(e) => Err(e.into()),
    }
}

async fn list_files(dir: &Path, extensions: &[&str]) -> Result<Vec<String>, AppError> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        let path = entry.path();
        let matches_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)));
        if matches_extension {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}
