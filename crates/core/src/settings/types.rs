//! Types for the settings module.

use serde::{Deserialize, Serialize};

/// Display labels for VBR quality values 0-5 (0 = best, 5 = smallest).
pub const VBR_QUALITY_LABELS: [&str; 6] = ["Best", "High", "Normal", "Medium", "Low", "Smallest"];

/// Target audio format for conversion output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// MPEG Audio Layer III
    Mp3,
    /// MPEG-4 Audio (AAC)
    M4a,
    /// WAVE (uncompressed)
    Wav,
    /// Free Lossless Audio Codec
    Flac,
}

/// What a given output format supports and which values it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatCapabilities {
    /// File extension for output files.
    pub extension: &'static str,
    /// ffmpeg codec name.
    pub codec: &'static str,
    /// Whether the format accepts a bitrate directive.
    pub supports_bitrate: bool,
    /// Whether the format supports variable bitrate encoding.
    pub supports_vbr: bool,
    /// Bitrates (kbps) the format accepts, empty if bitrate is not applicable.
    pub bitrate_options: &'static [u32],
    /// Default bitrate in kbps, if bitrate is applicable.
    pub default_bitrate_kbps: Option<u32>,
    /// Sample rates (Hz) the format accepts.
    pub sample_rate_options: &'static [u32],
}

impl OutputFormat {
    /// All available output formats, in presentation order.
    pub fn all() -> [Self; 4] {
        [Self::Mp3, Self::M4a, Self::Wav, Self::Flac]
    }

    /// Returns the full capability record for this format.
    ///
    /// This is the single source of truth for per-format behavior; the
    /// convenience accessors below all read from it.
    pub fn capabilities(&self) -> FormatCapabilities {
        match self {
            Self::Mp3 => FormatCapabilities {
                extension: "mp3",
                codec: "libmp3lame",
                supports_bitrate: true,
                supports_vbr: true,
                bitrate_options: &[64, 96, 128, 160, 192, 224, 256, 320],
                default_bitrate_kbps: Some(192),
                sample_rate_options: &[22050, 44100, 48000],
            },
            Self::M4a => FormatCapabilities {
                extension: "m4a",
                codec: "aac",
                supports_bitrate: true,
                supports_vbr: false,
                bitrate_options: &[64, 96, 128, 160, 192, 256, 320],
                default_bitrate_kbps: Some(192),
                sample_rate_options: &[22050, 44100, 48000, 96000],
            },
            Self::Wav => FormatCapabilities {
                extension: "wav",
                codec: "pcm_s16le",
                supports_bitrate: false,
                supports_vbr: false,
                bitrate_options: &[],
                default_bitrate_kbps: None,
                sample_rate_options: &[22050, 44100, 48000, 96000],
            },
            Self::Flac => FormatCapabilities {
                extension: "flac",
                codec: "flac",
                supports_bitrate: false,
                supports_vbr: false,
                bitrate_options: &[],
                default_bitrate_kbps: None,
                sample_rate_options: &[22050, 44100, 48000, 96000],
            },
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        self.capabilities().extension
    }

    /// Returns the ffmpeg codec name for this format.
    pub fn codec(&self) -> &'static str {
        self.capabilities().codec
    }

    /// Whether this format accepts a bitrate directive.
    pub fn supports_bitrate(&self) -> bool {
        self.capabilities().supports_bitrate
    }

    /// Whether this format supports variable bitrate encoding.
    pub fn supports_vbr(&self) -> bool {
        self.capabilities().supports_vbr
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Mp3 => "MP3",
            Self::M4a => "M4A",
            Self::Wav => "WAV",
            Self::Flac => "FLAC",
        };
        write!(f, "{}", label)
    }
}

/// Quality preset, each mapping to a default bitrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// 64 kbps
    Economy,
    /// 128 kbps
    Standard,
    /// 192 kbps
    Good,
    /// 320 kbps
    Best,
}

impl Quality {
    /// All quality presets, in ascending bitrate order.
    pub fn all() -> [Self; 4] {
        [Self::Economy, Self::Standard, Self::Good, Self::Best]
    }

    /// Returns the preset bitrate in kbps.
    pub fn bitrate_kbps(&self) -> u32 {
        match self {
            Self::Economy => 64,
            Self::Standard => 128,
            Self::Good => 192,
            Self::Best => 320,
        }
    }

    /// Display label including the bitrate.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Economy => "Economy (64 kbps)",
            Self::Standard => "Standard (128 kbps)",
            Self::Good => "Good (192 kbps)",
            Self::Best => "Best (320 kbps)",
        }
    }
}

/// Output sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleRate {
    /// 22050 Hz
    Hz22050,
    /// 44100 Hz
    Hz44100,
    /// 48000 Hz
    Hz48000,
    /// 96000 Hz
    Hz96000,
}

impl SampleRate {
    /// Returns the sample rate in Hz.
    pub fn hz(&self) -> u32 {
        match self {
            Self::Hz22050 => 22050,
            Self::Hz44100 => 44100,
            Self::Hz48000 => 48000,
            Self::Hz96000 => 96000,
        }
    }

    /// Looks up the variant for a rate in Hz.
    pub fn from_hz(hz: u32) -> Option<Self> {
        match hz {
            22050 => Some(Self::Hz22050),
            44100 => Some(Self::Hz44100),
            48000 => Some(Self::Hz48000),
            96000 => Some(Self::Hz96000),
            _ => None,
        }
    }

    /// Display label for this sample rate.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hz22050 => "Tape (22050 Hz)",
            Self::Hz44100 => "CD Quality (44100 Hz)",
            Self::Hz48000 => "DVD (48000 Hz)",
            Self::Hz96000 => "Extra High (96000 Hz)",
        }
    }
}

/// Output channel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channels {
    /// Single channel
    Mono,
    /// Two channels
    Stereo,
}

impl Channels {
    /// Returns the channel count.
    pub fn count(&self) -> u8 {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }

    /// Display label for this layout.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mono => "Mono",
            Self::Stereo => "Stereo",
        }
    }
}

/// Bitrate encoding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitrateMode {
    /// Constant bitrate.
    Constant,
    /// Variable bitrate (only honored by formats that support it).
    Variable,
}

impl BitrateMode {
    /// Display label for this mode.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Constant => "Constant (CBR)",
            Self::Variable => "Variable (VBR)",
        }
    }
}

/// Display label for a VBR quality value, if it is in the 0-5 range.
pub fn vbr_quality_label(value: u8) -> Option<&'static str> {
    VBR_QUALITY_LABELS.get(value as usize).copied()
}

/// User-chosen conversion settings.
///
/// Fields are private so that the format-change invariant holds: switching
/// the output format always clears any custom bitrate, since bitrate lists
/// differ between formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    output_format: OutputFormat,
    quality: Quality,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_bitrate: Option<u32>,
    sample_rate: SampleRate,
    channels: Channels,
    bitrate_mode: BitrateMode,
    vbr_quality: u8,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Mp3,
            quality: Quality::Good,
            custom_bitrate: None,
            sample_rate: SampleRate::Hz44100,
            channels: Channels::Stereo,
            bitrate_mode: BitrateMode::Constant,
            vbr_quality: 2,
        }
    }
}

impl ConversionSettings {
    /// Creates settings with the defaults (MP3, Good, 44100 Hz, stereo, CBR).
    pub fn new() -> Self {
        Self::default()
    }

    /// Target output format.
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    /// Quality preset.
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Custom bitrate override in kbps, if set.
    pub fn custom_bitrate(&self) -> Option<u32> {
        self.custom_bitrate
    }

    /// Output sample rate.
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// Output channel layout.
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Bitrate encoding mode.
    pub fn bitrate_mode(&self) -> BitrateMode {
        self.bitrate_mode
    }

    /// VBR quality value (0 = best, 5 = smallest).
    pub fn vbr_quality(&self) -> u8 {
        self.vbr_quality
    }

    /// Changes the output format, clearing any custom bitrate.
    pub fn set_output_format(&mut self, format: OutputFormat) {
        if format != self.output_format {
            self.custom_bitrate = None;
        }
        self.output_format = format;
    }

    /// Changes the quality preset.
    pub fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }

    /// Sets or clears the custom bitrate override.
    pub fn set_custom_bitrate(&mut self, bitrate_kbps: Option<u32>) {
        self.custom_bitrate = bitrate_kbps;
    }

    /// Changes the output sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: SampleRate) {
        self.sample_rate = sample_rate;
    }

    /// Changes the output channel layout.
    pub fn set_channels(&mut self, channels: Channels) {
        self.channels = channels;
    }

    /// Changes the bitrate encoding mode.
    pub fn set_bitrate_mode(&mut self, mode: BitrateMode) {
        self.bitrate_mode = mode;
    }

    /// Changes the VBR quality value.
    pub fn set_vbr_quality(&mut self, value: u8) {
        self.vbr_quality = value;
    }

    /// Sets the output format (builder style).
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.set_output_format(format);
        self
    }

    /// Sets the quality preset (builder style).
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.set_quality(quality);
        self
    }

    /// Sets the custom bitrate override (builder style).
    pub fn with_custom_bitrate(mut self, bitrate_kbps: u32) -> Self {
        self.set_custom_bitrate(Some(bitrate_kbps));
        self
    }

    /// Sets the output sample rate (builder style).
    pub fn with_sample_rate(mut self, sample_rate: SampleRate) -> Self {
        self.set_sample_rate(sample_rate);
        self
    }

    /// Sets the output channel layout (builder style).
    pub fn with_channels(mut self, channels: Channels) -> Self {
        self.set_channels(channels);
        self
    }

    /// Sets the bitrate encoding mode (builder style).
    pub fn with_bitrate_mode(mut self, mode: BitrateMode) -> Self {
        self.set_bitrate_mode(mode);
        self
    }

    /// Sets the VBR quality value (builder style).
    pub fn with_vbr_quality(mut self, value: u8) -> Self {
        self.set_vbr_quality(value);
        self
    }

    /// The bitrate in kbps that CBR encoding will use: the custom override
    /// when one is set, otherwise the quality preset's bitrate.
    pub fn effective_bitrate(&self) -> u32 {
        match self.custom_bitrate {
            Some(bitrate) if bitrate > 0 => bitrate,
            _ => self.quality.bitrate_kbps(),
        }
    }

    /// Checks the settings against the output format's capabilities.
    pub fn validate(&self) -> Result<(), super::SettingsError> {
        let caps = self.output_format.capabilities();

        if let Some(bitrate) = self.custom_bitrate {
            if !caps.supports_bitrate || !caps.bitrate_options.contains(&bitrate) {
                return Err(super::SettingsError::UnsupportedBitrate {
                    bitrate,
                    format: self.output_format,
                });
            }
        }

        if !caps.sample_rate_options.contains(&self.sample_rate.hz()) {
            return Err(super::SettingsError::UnsupportedSampleRate {
                rate: self.sample_rate.hz(),
                format: self.output_format,
            });
        }

        if self.vbr_quality as usize >= VBR_QUALITY_LABELS.len() {
            return Err(super::SettingsError::InvalidVbrQuality {
                value: self.vbr_quality,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_extension_and_codec() {
        assert_eq!(OutputFormat::Mp3.extension(), "mp3");
        assert_eq!(OutputFormat::Mp3.codec(), "libmp3lame");
        assert_eq!(OutputFormat::M4a.extension(), "m4a");
        assert_eq!(OutputFormat::M4a.codec(), "aac");
        assert_eq!(OutputFormat::Wav.extension(), "wav");
        assert_eq!(OutputFormat::Wav.codec(), "pcm_s16le");
        assert_eq!(OutputFormat::Flac.extension(), "flac");
        assert_eq!(OutputFormat::Flac.codec(), "flac");
    }

    #[test]
    fn test_format_bitrate_support() {
        assert!(OutputFormat::Mp3.supports_bitrate());
        assert!(OutputFormat::M4a.supports_bitrate());
        assert!(!OutputFormat::Wav.supports_bitrate());
        assert!(!OutputFormat::Flac.supports_bitrate());
    }

    #[test]
    fn test_only_mp3_supports_vbr() {
        assert!(OutputFormat::Mp3.supports_vbr());
        assert!(!OutputFormat::M4a.supports_vbr());
        assert!(!OutputFormat::Wav.supports_vbr());
        assert!(!OutputFormat::Flac.supports_vbr());
    }

    #[test]
    fn test_capabilities_are_consistent() {
        for format in OutputFormat::all() {
            let caps = format.capabilities();
            assert_eq!(caps.supports_bitrate, !caps.bitrate_options.is_empty());
            assert_eq!(caps.supports_bitrate, caps.default_bitrate_kbps.is_some());
            if let Some(default) = caps.default_bitrate_kbps {
                assert!(caps.bitrate_options.contains(&default));
            }
            assert!(!caps.sample_rate_options.is_empty());
            if caps.supports_vbr {
                assert!(caps.supports_bitrate);
            }
        }
    }

    #[test]
    fn test_quality_presets_fit_bitrate_formats() {
        for format in OutputFormat::all() {
            let caps = format.capabilities();
            if !caps.supports_bitrate {
                continue;
            }
            for quality in Quality::all() {
                assert!(
                    caps.bitrate_options.contains(&quality.bitrate_kbps()),
                    "{} kbps missing from {} options",
                    quality.bitrate_kbps(),
                    format
                );
            }
        }
    }

    #[test]
    fn test_mp3_has_no_96khz() {
        assert!(!OutputFormat::Mp3
            .capabilities()
            .sample_rate_options
            .contains(&96000));
        assert!(OutputFormat::M4a
            .capabilities()
            .sample_rate_options
            .contains(&96000));
    }

    #[test]
    fn test_sample_rate_lookup() {
        assert_eq!(SampleRate::from_hz(44100), Some(SampleRate::Hz44100));
        assert_eq!(SampleRate::from_hz(96000), Some(SampleRate::Hz96000));
        assert_eq!(SampleRate::from_hz(11025), None);
        assert_eq!(SampleRate::Hz44100.label(), "CD Quality (44100 Hz)");
    }

    #[test]
    fn test_channel_counts() {
        assert_eq!(Channels::Mono.count(), 1);
        assert_eq!(Channels::Stereo.count(), 2);
    }

    #[test]
    fn test_vbr_quality_labels() {
        assert_eq!(vbr_quality_label(0), Some("Best"));
        assert_eq!(vbr_quality_label(2), Some("Normal"));
        assert_eq!(vbr_quality_label(5), Some("Smallest"));
        assert_eq!(vbr_quality_label(6), None);
    }

    #[test]
    fn test_default_settings() {
        let settings = ConversionSettings::default();
        assert_eq!(settings.output_format(), OutputFormat::Mp3);
        assert_eq!(settings.quality(), Quality::Good);
        assert_eq!(settings.custom_bitrate(), None);
        assert_eq!(settings.sample_rate(), SampleRate::Hz44100);
        assert_eq!(settings.channels(), Channels::Stereo);
        assert_eq!(settings.bitrate_mode(), BitrateMode::Constant);
        assert_eq!(settings.vbr_quality(), 2);
    }

    #[test]
    fn test_format_change_clears_custom_bitrate() {
        let mut settings = ConversionSettings::new().with_custom_bitrate(256);
        assert_eq!(settings.custom_bitrate(), Some(256));

        settings.set_output_format(OutputFormat::M4a);
        assert_eq!(settings.custom_bitrate(), None);
    }

    #[test]
    fn test_setting_same_format_keeps_custom_bitrate() {
        let mut settings = ConversionSettings::new().with_custom_bitrate(256);
        settings.set_output_format(OutputFormat::Mp3);
        assert_eq!(settings.custom_bitrate(), Some(256));
    }

    #[test]
    fn test_builder_format_change_clears_custom_bitrate() {
        let settings = ConversionSettings::new()
            .with_custom_bitrate(256)
            .with_output_format(OutputFormat::Flac);
        assert_eq!(settings.custom_bitrate(), None);
    }

    #[test]
    fn test_effective_bitrate_prefers_custom() {
        let settings = ConversionSettings::new()
            .with_quality(Quality::Standard)
            .with_custom_bitrate(320);
        assert_eq!(settings.effective_bitrate(), 320);
    }

    #[test]
    fn test_effective_bitrate_falls_back_to_quality() {
        let settings = ConversionSettings::new().with_quality(Quality::Best);
        assert_eq!(settings.effective_bitrate(), 320);

        let economy = ConversionSettings::new().with_quality(Quality::Economy);
        assert_eq!(economy.effective_bitrate(), 64);
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(ConversionSettings::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unlisted_bitrate() {
        let settings = ConversionSettings::new().with_custom_bitrate(100);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_m4a_only_bitrate_for_mp3() {
        // 224 is valid for MP3 but absent from the M4A list.
        let mp3 = ConversionSettings::new().with_custom_bitrate(224);
        assert!(mp3.validate().is_ok());

        let mut m4a = ConversionSettings::new().with_output_format(OutputFormat::M4a);
        m4a.set_custom_bitrate(Some(224));
        assert!(m4a.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_mp3_at_96khz() {
        let settings = ConversionSettings::new().with_sample_rate(SampleRate::Hz96000);
        assert!(settings.validate().is_err());

        let m4a = ConversionSettings::new()
            .with_output_format(OutputFormat::M4a)
            .with_sample_rate(SampleRate::Hz96000);
        assert!(m4a.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_vbr_quality() {
        let settings = ConversionSettings::new().with_vbr_quality(6);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_serialization_round_trip() {
        let settings = ConversionSettings::new()
            .with_output_format(OutputFormat::M4a)
            .with_quality(Quality::Best)
            .with_sample_rate(SampleRate::Hz96000);

        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"m4a\""));
        let back: ConversionSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: ConversionSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, ConversionSettings::default());
    }
}
