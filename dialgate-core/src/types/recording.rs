//! 录音与转写相关类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dialgate_provider::RecordingWireStatus;

/// 录音/下载处理状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordingStatus {
    /// 处理中
    Processing,
    /// 已完成
    Completed,
    /// 失败
    Failed,
}

impl RecordingStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// 从供应商回调状态映射
    #[must_use]
    pub fn from_wire(status: RecordingWireStatus) -> Self {
        match status {
            RecordingWireStatus::InProgress => Self::Processing,
            RecordingWireStatus::Completed => Self::Completed,
            RecordingWireStatus::Absent | RecordingWireStatus::Failed => Self::Failed,
        }
    }
}

impl std::fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 转写状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionStatus {
    Pending,
    Completed,
    Failed,
}

/// 转写分段
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    /// 段起点（秒）
    pub start_secs: f32,
    /// 段终点（秒）
    pub end_secs: f32,
    /// 段文本
    pub text: String,
}

/// 转写结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcription {
    /// 完整文本
    pub text: String,
    /// 转写状态
    pub status: TranscriptionStatus,
    /// 识别语言
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// 置信度 (0.0 - 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// 分段
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

/// 录音记录
///
/// 以 `recording_sid` 为主键，供应商重复回调时幂等覆盖。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    /// 供应商录音 SID
    pub recording_sid: String,
    /// 所属呼叫 SID
    pub call_sid: String,
    /// 供应商侧录制状态
    pub status: RecordingStatus,
    /// 归档下载状态（独立于录制状态）
    pub download_status: RecordingStatus,
    /// 归档存储路径（下载完成后写入）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    /// 时长（秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    /// 声道数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
    /// 创建时间
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    /// 更新时间
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
    /// 转写结果（转写服务完成后挂载）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<Transcription>,
}

impl Recording {
    /// 录音是否可以对外提供（录制完成且归档落盘）
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status == RecordingStatus::Completed
            && self.download_status == RecordingStatus::Completed
            && self.storage_path.is_some()
    }

    /// 是否有可用转写
    ///
    /// 派生判定，从不落库存储一个布尔标记：文本非空即视为有转写。
    #[must_use]
    pub fn has_transcription(&self) -> bool {
        self.transcription
            .as_ref()
            .is_some_and(|t| !t.text.trim().is_empty())
    }
}

/// 对外的录音视图（带签名 URL）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingView {
    /// 供应商录音 SID
    pub recording_sid: String,
    /// 所属呼叫 SID
    pub call_sid: String,
    /// 限时签名下载 URL
    pub url: String,
    /// 签名过期时间
    #[serde(with = "crate::utils::datetime")]
    pub expires_at: DateTime<Utc>,
    /// 时长（秒）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    /// 声道数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
}

/// 对外的转写视图
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionView {
    /// 供应商录音 SID
    pub recording_sid: String,
    /// 所属呼叫 SID
    pub call_sid: String,
    /// 是否有可用转写（派生字段）
    pub has_transcription: bool,
    /// 完整文本
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// 识别语言
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// 置信度
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// 分段
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,
}

impl TranscriptionView {
    /// 从录音记录构建转写视图
    #[must_use]
    pub fn from_recording(recording: &Recording) -> Self {
        let has_transcription = recording.has_transcription();
        let (text, language, confidence, segments) = match recording.transcription {
            Some(ref t) => (
                Some(t.text.clone()),
                t.language.clone(),
                t.confidence,
                t.segments.clone(),
            ),
            None => (None, None, None, Vec::new()),
        };
        Self {
            recording_sid: recording.recording_sid.clone(),
            call_sid: recording.call_sid.clone(),
            has_transcription,
            text,
            language,
            confidence,
            segments,
        }
    }
}
