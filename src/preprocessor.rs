//! Wrapper around the system C preprocessor.
//!
//! [`Preprocessor`] shells out to `cc -E`, so the macros, include paths,
//! and predefined symbols are exactly the system compiler's. The output
//! keeps its `# line "file"` markers; the lexer folds them back into node
//! positions.

use std::env;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use rustc_hash::FxHashMap;

/// `cc -E` exited nonzero; `output` is its stderr.
#[derive(Debug)]
pub struct PreprocessError {
    pub output: String,
}

impl fmt::Display for PreprocessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preprocessor failed:\n{}", self.output)
    }
}

impl Error for PreprocessError {}

/// A temporary file removed on drop. Used to feed inline source text to
/// `cc`, which wants a real file for sensible diagnostics.
struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn create(contents: &str) -> std::io::Result<TempFile> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = env::temp_dir().join(format!("ctree-cpp-{}-{}.c", std::process::id(), n));
        fs::write(&path, contents)?;
        Ok(TempFile { path })
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Configuration for one preprocessor run.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    include_paths: Vec<PathBuf>,
    macros: FxHashMap<String, Option<String>>,
    undefs: Vec<String>,
    includes: Vec<PathBuf>,
    imacros: Vec<PathBuf>,
}

impl Preprocessor {
    pub fn new() -> Self {
        Preprocessor::default()
    }

    /// Adds a `-I` search path.
    pub fn include_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.include_paths.push(path.into());
        self
    }

    /// Defines a macro (`-D`). `None` defines it without a value.
    pub fn define(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        self.macros
            .insert(name.to_owned(), value.map(str::to_owned));
        self
    }

    /// Undefines a predefined macro (`-U`).
    pub fn undef(&mut self, name: &str) -> &mut Self {
        self.undefs.push(name.to_owned());
        self
    }

    /// Forces a header to be included first (`-include`).
    pub fn include(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.includes.push(path.into());
        self
    }

    /// Pulls in macros from a file without its declarations (`-imacros`).
    pub fn imacros(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.imacros.push(path.into());
        self
    }

    /// Preprocesses a file on disk.
    pub fn preprocess_file(&self, path: impl AsRef<Path>) -> Result<String, PreprocessError> {
        self.run(path.as_ref())
    }

    /// Preprocesses in-memory source text.
    pub fn preprocess(&self, source: &str) -> Result<String, PreprocessError> {
        let file = TempFile::create(source).map_err(|e| PreprocessError {
            output: format!("cannot create temporary file: {}", e),
        })?;
        self.run(&file.path)
    }

    fn run(&self, path: &Path) -> Result<String, PreprocessError> {
        let mut cmd = Command::new("cc");
        cmd.arg("-E");
        for dir in &self.include_paths {
            cmd.arg("-I").arg(dir);
        }
        // sorted so a run's command line is deterministic
        let mut defines: Vec<_> = self.macros.iter().collect();
        defines.sort_by_key(|(name, _)| name.as_str());
        for (name, value) in defines {
            match value {
                Some(v) => cmd.arg(format!("-D{}={}", name, v)),
                None => cmd.arg(format!("-D{}", name)),
            };
        }
        for name in &self.undefs {
            cmd.arg(format!("-U{}", name));
        }
        for file in &self.includes {
            cmd.arg("-include").arg(file);
        }
        for file in &self.imacros {
            cmd.arg("-imacros").arg(file);
        }
        cmd.arg(path);

        let out = cmd.output().map_err(|e| PreprocessError {
            output: format!("cannot run cc: {}", e),
        })?;
        if !out.status.success() {
            return Err(PreprocessError {
                output: String::from_utf8_lossy(&out.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }
}
