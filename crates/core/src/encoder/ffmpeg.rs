//! FFmpeg-based encoder implementation.
//!
//! Spawns ffmpeg as a child process with the settings-derived arguments of
//! an [`EncoderInvocation`], reads progress from stderr, and enforces a
//! per-encode timeout.

use async_trait::async_trait;
use regex_lite::Regex;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::debug;

use crate::settings::EncoderInvocation;
use crate::task::ConversionError;

use super::config::EncoderConfig;
use super::traits::Encoder;
use super::types::{EncodeProgress, EncodeReport};

/// Encoder backed by the ffmpeg and ffprobe binaries.
pub struct FfmpegEncoder {
    config: EncoderConfig,
}

impl FfmpegEncoder {
    /// Creates a new encoder with the given configuration.
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Creates a new encoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EncoderConfig::default())
    }

    /// Assembles the full ffmpeg argument list for an invocation.
    ///
    /// The invocation's settings-derived arguments sit between the input
    /// and the plumbing flags; the output path is always last.
    fn assemble_args(&self, invocation: &EncoderInvocation) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-i".to_string(),
            invocation.input_path.display().to_string(),
        ];

        args.extend(invocation.args.iter().cloned());

        args.push("-loglevel".to_string());
        args.push(self.config.log_level.clone());
        args.push("-progress".to_string());
        args.push("pipe:2".to_string());

        args.extend(self.config.extra_args.iter().cloned());

        args.push(invocation.output_path.display().to_string());
        args
    }

    /// Parses the duration in seconds out of ffprobe's JSON output.
    fn parse_probe_duration(json: &str) -> Option<f64> {
        #[derive(Deserialize)]
        struct ProbeOutput {
            format: ProbeFormat,
        }

        #[derive(Deserialize)]
        struct ProbeFormat {
            duration: Option<String>,
        }

        let probe: ProbeOutput = serde_json::from_str(json).ok()?;
        probe.format.duration.as_ref()?.parse::<f64>().ok()
    }

    /// Probes the input's duration for progress calculation.
    ///
    /// Best effort: any failure just disables fraction reporting.
    async fn probe_duration(&self, path: &Path) -> Option<f64> {
        let output = Command::new(&self.config.ffprobe_path)
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(path)
            .output()
            .await
            .ok()?;

        if !output.status.success() {
            debug!("ffprobe failed for {}", path.display());
            return None;
        }

        Self::parse_probe_duration(&String::from_utf8_lossy(&output.stdout))
    }

    /// Runs the encode with optional progress reporting.
    async fn run_encode(
        &self,
        invocation: &EncoderInvocation,
        progress_tx: Option<mpsc::Sender<EncodeProgress>>,
    ) -> Result<EncodeReport, ConversionError> {
        let start = Instant::now();

        // Get input duration for progress calculation
        let duration_secs = self.probe_duration(&invocation.input_path).await;

        let args = self.assemble_args(invocation);
        debug!(
            "Running {} {}",
            self.config.ffmpeg_path.display(),
            args.join(" ")
        );

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ConversionError::encoder_process(
                        format!("ffmpeg not found at {}", self.config.ffmpeg_path.display()),
                        None,
                    )
                } else {
                    ConversionError::encoder_process(format!("failed to launch ffmpeg: {}", e), None)
                }
            })?;

        let stderr = child.stderr.take().expect("stderr should be captured");
        let mut reader = BufReader::new(stderr).lines();

        // Track progress
        let mut current_time = 0.0;
        let mut current_speed = None;
        let time_regex = Regex::new(r"out_time_ms=(\d+)").ok();
        let speed_regex = Regex::new(r"speed=(\d+\.?\d*)x").ok();

        // Read progress from stderr
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let result = timeout(timeout_duration, async {
            let mut last_progress_send = Instant::now();
            let progress_interval = Duration::from_millis(500);
            let mut error_output = String::new();

            while let Ok(Some(line)) = reader.next_line().await {
                // Capture error output
                if line.contains("Error") || line.contains("error") {
                    error_output.push_str(&line);
                    error_output.push('\n');
                }

                // Parse progress
                if let Some(ref re) = time_regex {
                    if let Some(caps) = re.captures(&line) {
                        if let Some(ms_str) = caps.get(1) {
                            if let Ok(ms) = ms_str.as_str().parse::<f64>() {
                                current_time = ms / 1_000_000.0; // Convert microseconds to seconds
                            }
                        }
                    }
                }

                if let Some(ref re) = speed_regex {
                    if let Some(caps) = re.captures(&line) {
                        if let Some(speed_str) = caps.get(1) {
                            current_speed = Some(format!("{}x", speed_str.as_str()));
                        }
                    }
                }

                // Send progress update
                if let Some(ref tx) = progress_tx {
                    if last_progress_send.elapsed() >= progress_interval {
                        let fraction = match duration_secs {
                            Some(dur) if dur > 0.0 => (current_time / dur).min(1.0) as f32,
                            _ => 0.0,
                        };

                        let progress = EncodeProgress {
                            fraction,
                            time_secs: current_time,
                            speed: current_speed.clone(),
                        };

                        // Non-blocking send
                        let _ = tx.try_send(progress);
                        last_progress_send = Instant::now();
                    }
                }
            }

            // Wait for process to complete
            let status = child.wait().await?;
            Ok::<(std::process::ExitStatus, String), std::io::Error>((status, error_output))
        })
        .await;

        match result {
            Ok(Ok((status, error_output))) => {
                if !status.success() {
                    return Err(ConversionError::encoder_process(
                        format!("ffmpeg exited with code: {:?}", status.code()),
                        if error_output.is_empty() {
                            None
                        } else {
                            Some(error_output)
                        },
                    ));
                }
            }
            Ok(Err(e)) => {
                return Err(ConversionError::encoder_process(
                    format!("I/O error while reading encoder output: {}", e),
                    None,
                ))
            }
            Err(_) => {
                // Kill the process on timeout
                let _ = child.kill().await;
                return Err(ConversionError::encoder_process(
                    format!("encoder timed out after {} seconds", self.config.timeout_secs),
                    None,
                ));
            }
        }

        Ok(EncodeReport {
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait]
impl Encoder for FfmpegEncoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn encode(&self, invocation: &EncoderInvocation) -> Result<EncodeReport, ConversionError> {
        self.run_encode(invocation, None).await
    }

    async fn encode_with_progress(
        &self,
        invocation: &EncoderInvocation,
        progress_tx: mpsc::Sender<EncodeProgress>,
    ) -> Result<EncodeReport, ConversionError> {
        self.run_encode(invocation, Some(progress_tx)).await
    }

    async fn validate(&self) -> Result<(), ConversionError> {
        // Check ffmpeg exists
        let ffmpeg_result = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .output()
            .await;

        if let Err(e) = ffmpeg_result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(ConversionError::encoder_process(
                    format!("ffmpeg not found at {}", self.config.ffmpeg_path.display()),
                    None,
                ));
            }
            return Err(ConversionError::encoder_process(
                format!("failed to run ffmpeg: {}", e),
                None,
            ));
        }

        // Check ffprobe exists
        let ffprobe_result = Command::new(&self.config.ffprobe_path)
            .arg("-version")
            .output()
            .await;

        if let Err(e) = ffprobe_result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(ConversionError::encoder_process(
                    format!(
                        "ffprobe not found at {}",
                        self.config.ffprobe_path.display()
                    ),
                    None,
                ));
            }
            return Err(ConversionError::encoder_process(
                format!("failed to run ffprobe: {}", e),
                None,
            ));
        }

        Ok(())
    }
}
