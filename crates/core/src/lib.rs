pub mod batch;
pub mod encoder;
pub mod events;
pub mod settings;
pub mod task;
pub mod testing;

pub use batch::{
    BatchError, BatchFailure, BatchResult, BatchScheduler, SchedulerConfig, TaskOutcome,
};
pub use encoder::{EncodeProgress, EncodeReport, Encoder, EncoderConfig, FfmpegEncoder};
pub use events::{ConversionEvent, EventEnvelope, EventSink};
pub use settings::{
    build_encoder_args, resolve, resolved_output_path, vbr_quality_label, BitrateMode, Channels,
    ConversionSettings, EncoderInvocation, FormatCapabilities, OutputFormat, Quality, SampleRate,
    SettingsError, VBR_QUALITY_LABELS,
};
pub use task::{
    is_supported_input, ConversionError, ConversionStatus, ConversionTask, MediaFile,
    SUPPORTED_INPUT_EXTENSIONS,
};
