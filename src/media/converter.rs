use crate::error::{DgscribeError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for turning a media file into an audio file.
///
/// This trait allows swapping implementations (real ffmpeg vs mock).
pub trait MediaConverter: Send + Sync {
    /// Convert `input` into `output`, overwriting `output` if it exists.
    ///
    /// The output container is chosen from `output`'s extension.
    fn convert(&self, input: &Path, output: &Path) -> Result<()>;

    /// Name of the tool behind this converter, for logs.
    fn name(&self) -> &str;
}

impl<T: MediaConverter> MediaConverter for Arc<T> {
    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        (**self).convert(input, output)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Converter that shells out to the `ffmpeg` binary.
#[derive(Debug, Clone)]
pub struct FfmpegConverter {
    program: PathBuf,
}

impl FfmpegConverter {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
        }
    }

    /// Use a specific ffmpeg binary instead of the one on `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for FfmpegConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaConverter for FfmpegConverter {
    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let conversion_error = |message: String| DgscribeError::Conversion {
            source_path: input.display().to_string(),
            destination: output.display().to_string(),
            message,
        };

        let result = Command::new(&self.program)
            .arg("-y")
            .arg("-nostdin")
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-i")
            .arg(input)
            .arg("-vn")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                conversion_error(format!("failed to run {}: {e}", self.program.display()))
            })?;

        if result.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let detail = stderr.trim();
            Err(conversion_error(if detail.is_empty() {
                result.status.to_string()
            } else {
                format!("{}: {detail}", result.status)
            }))
        }
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

/// Mock converter for testing
///
/// Writes a fixed payload to the output path and counts invocations.
#[derive(Debug, Default)]
pub struct MockConverter {
    calls: AtomicUsize,
    should_fail: bool,
    converted: Mutex<Vec<PathBuf>>,
}

impl MockConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail on convert
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of times `convert` was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Inputs passed to `convert`, in call order.
    pub fn converted(&self) -> Vec<PathBuf> {
        self.converted
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl MediaConverter for MockConverter {
    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut converted) = self.converted.lock() {
            converted.push(input.to_path_buf());
        }
        if self.should_fail {
            return Err(DgscribeError::Conversion {
                source_path: input.display().to_string(),
                destination: output.display().to_string(),
                message: "mock conversion failure".to_string(),
            });
        }
        std::fs::write(output, b"mock audio").map_err(|e| DgscribeError::persistence(output, e))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
