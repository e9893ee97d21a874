//! Reading a test file, scanning it and writing the runner (and header).

use std::fs;
use std::path::{Path, PathBuf};

use ctk_config::RunnerConfig;
use serde::Serialize;

use crate::descriptor::ScanResult;
use crate::emitter::{RunnerEmitter, forced_includes, runner_includes};
use crate::error::RunnerError;
use crate::header::HeaderEmitter;
use crate::scanner::{RegexScanner, SourceScanner};

/// A rendered header and where it belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedHeader {
    pub path: PathBuf,
    pub contents: String,
}

/// Everything produced for one test file, before anything touches disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub runner: String,
    pub header: Option<GeneratedHeader>,
    pub scan: ScanResult,
}

/// Summary of one [`Generator::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub header: Option<PathBuf>,
    pub tests: Vec<String>,
    pub mocks: Vec<String>,
    /// Input, output, the `.c` counterpart of each local include, then the
    /// configured includes. First occurrence of each kept.
    pub files_used: Vec<String>,
}

/// Test-runner generator.
///
/// The scanner is a type parameter so the heuristic [`RegexScanner`] can be
/// swapped without touching emission.
#[derive(Debug, Clone)]
pub struct Generator<S = RegexScanner> {
    config: RunnerConfig,
    scanner: S,
}

impl Generator<RegexScanner> {
    /// Build a generator with the default scanner.
    ///
    /// # Errors
    /// Returns an error if the config is invalid or `test_prefix` is not a valid regex.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        config.validate()?;
        let scanner = RegexScanner::new(
            &config.test_prefix,
            &config.mock_prefix,
            config.use_param_tests,
        )?;
        Ok(Self { config, scanner })
    }
}

impl<S: SourceScanner> Generator<S> {
    pub const fn with_scanner(config: RunnerConfig, scanner: S) -> Self {
        Self { config, scanner }
    }

    /// Scan `source` and render the runner and, if configured, the header.
    ///
    /// Pure: the same input always renders byte-identical output.
    #[must_use]
    pub fn generate_source(&self, input: &Path, source: &str) -> GeneratedFiles {
        let scan = self.scanner.scan(source);
        let runner = RunnerEmitter::new(&self.config).emit(input, &scan);
        let header = self.config.header_path().map(|path| GeneratedHeader {
            path: path.clone(),
            contents: HeaderEmitter::new(&self.config).emit(path, &scan),
        });
        GeneratedFiles {
            runner,
            header,
            scan,
        }
    }

    /// Generate a runner for `input` and write it to `output`
    /// (default: [`default_output_path`]).
    ///
    /// # Errors
    /// Returns `RunnerError::Io` if the input cannot be read or an output cannot be written.
    pub fn run(&self, input: &Path, output: Option<&Path>) -> Result<GenerationReport, RunnerError> {
        let output = output.map_or_else(|| default_output_path(input), Path::to_path_buf);

        let bytes = fs::read(input).map_err(|source| RunnerError::Io {
            path: input.to_path_buf(),
            source,
        })?;
        let source = decode_source(bytes);

        let generated = self.generate_source(input, &source);
        write_file(&output, &generated.runner)?;
        if let Some(header) = &generated.header {
            write_file(&header.path, &header.contents)?;
        }

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            tests = generated.scan.tests.len(),
            mocks = generated.scan.mocks.len(),
            "generated test runner"
        );

        let files_used = self.files_used(input, &output, &generated.scan);
        Ok(GenerationReport {
            input: input.to_path_buf(),
            output,
            header: generated.header.map(|header| header.path),
            tests: generated.scan.tests.into_iter().map(|test| test.name).collect(),
            mocks: generated.scan.mocks,
            files_used,
        })
    }

    fn files_used(&self, input: &Path, output: &Path, scan: &ScanResult) -> Vec<String> {
        let mut files = vec![
            input.to_string_lossy().into_owned(),
            output.to_string_lossy().into_owned(),
        ];
        let local = runner_includes(scan)
            .filter(|include| !include.starts_with('<'))
            .map(|include| format!("{include}.c"));
        let forced = forced_includes(&self.config).into_iter().map(String::from);
        for file in local.chain(forced) {
            if !files.contains(&file) {
                files.push(file);
            }
        }
        files
    }
}

/// `<dir>/<stem>_Runner.c` next to the input.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| input.to_string_lossy(), |stem| stem.to_string_lossy());
    input.with_file_name(format!("{stem}_Runner.c"))
}

/// Decode test source as UTF-8, falling back to Latin-1 so any byte
/// sequence can be scanned.
#[must_use]
pub fn decode_source(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) => {
            tracing::debug!("test source is not UTF-8; decoding as Latin-1");
            error.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), RunnerError> {
    let io_error = |source| RunnerError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, contents).map_err(io_error)
}
