//! 录音与转写关联服务
//!
//! 以 `recording_sid` 为键幂等摄入供应商回调，归档下载完成后
//! 才对外提供 —— 永远只给出限时签名 URL，从不暴露存储路径。

use std::sync::Arc;

use chrono::Utc;

use dialgate_provider::RecordingWebhook;

use crate::error::{CoreError, CoreResult};
use crate::types::{
    Recording, RecordingStatus, RecordingView, Transcription, TranscriptionView,
};

use super::ServiceContext;

/// 录音服务
pub struct RecordingService {
    ctx: Arc<ServiceContext>,
}

impl RecordingService {
    /// 创建录音服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 摄入录音状态回调
    ///
    /// 重复回调幂等覆盖；已有的下载进度与转写不被回调冲掉。
    pub async fn ingest(&self, hook: &RecordingWebhook) -> CoreResult<Recording> {
        if hook.recording_sid.is_empty() {
            return Err(CoreError::ValidationError(
                "recording webhook is missing RecordingSid".to_string(),
            ));
        }

        let now = Utc::now();
        let mut recording = self
            .ctx
            .recording_repository
            .find_by_sid(&hook.recording_sid)
            .await?
            .unwrap_or_else(|| Recording {
                recording_sid: hook.recording_sid.clone(),
                call_sid: hook.call_sid.clone(),
                status: RecordingStatus::Processing,
                download_status: RecordingStatus::Processing,
                storage_path: None,
                duration_seconds: None,
                channels: None,
                created_at: now,
                updated_at: now,
                transcription: None,
            });

        recording.call_sid = hook.call_sid.clone();
        recording.status = RecordingStatus::from_wire(hook.parsed_status());
        if let Some(duration) = hook.duration_seconds() {
            recording.duration_seconds = Some(duration);
        }
        if let Some(channels) = hook.channels() {
            recording.channels = Some(channels);
        }
        recording.updated_at = now;

        self.ctx.recording_repository.upsert(&recording).await?;
        log::info!(
            "Recording {} for call {} ingested with status {}",
            recording.recording_sid,
            recording.call_sid,
            recording.status
        );
        Ok(recording)
    }

    /// 归档下载完成，登记存储路径
    pub async fn mark_downloaded(&self, recording_sid: &str, storage_path: &str) -> CoreResult<()> {
        let mut recording = self.require(recording_sid).await?;
        recording.download_status = RecordingStatus::Completed;
        recording.storage_path = Some(storage_path.to_string());
        recording.updated_at = Utc::now();
        self.ctx.recording_repository.upsert(&recording).await?;
        log::info!("Recording {recording_sid} archived at {storage_path}");
        Ok(())
    }

    /// 归档下载失败
    pub async fn mark_download_failed(&self, recording_sid: &str, detail: &str) -> CoreResult<()> {
        let mut recording = self.require(recording_sid).await?;
        recording.download_status = RecordingStatus::Failed;
        recording.updated_at = Utc::now();
        self.ctx.recording_repository.upsert(&recording).await?;
        log::warn!("Recording {recording_sid} download failed: {detail}");
        Ok(())
    }

    /// 挂载转写结果
    pub async fn attach_transcription(
        &self,
        recording_sid: &str,
        transcription: Transcription,
    ) -> CoreResult<()> {
        let mut recording = self.require(recording_sid).await?;
        recording.transcription = Some(transcription);
        recording.updated_at = Utc::now();
        self.ctx.recording_repository.upsert(&recording).await?;
        log::info!("Transcription attached to recording {recording_sid}");
        Ok(())
    }

    /// 按通话查询录音
    ///
    /// 未就绪时返回带双状态的 [`CoreError::NotReady`]，调用方可据此轮询。
    /// 就绪后签发限时下载 URL。
    pub async fn get_recording(&self, call_sid: &str) -> CoreResult<RecordingView> {
        let recording = self.ready_recording(call_sid).await?;
        let Some(ref path) = recording.storage_path else {
            // is_ready 已经保证有路径，这里只是防御穷尽
            return Err(CoreError::NotReady {
                status: recording.status.as_str().to_string(),
                download_status: recording.download_status.as_str().to_string(),
            });
        };

        let signed = self
            .ctx
            .object_store
            .create_signed_url(path, self.ctx.recording_config.signed_url_ttl_secs)
            .await?;
        Ok(RecordingView {
            recording_sid: recording.recording_sid.clone(),
            call_sid: recording.call_sid.clone(),
            url: signed.url,
            expires_at: signed.expires_at,
            duration_seconds: recording.duration_seconds,
            channels: recording.channels,
        })
    }

    /// 按通话查询转写（与录音查询同一套就绪门禁）
    pub async fn get_transcription(&self, call_sid: &str) -> CoreResult<TranscriptionView> {
        let recording = self.ready_recording(call_sid).await?;
        Ok(TranscriptionView::from_recording(&recording))
    }

    async fn require(&self, recording_sid: &str) -> CoreResult<Recording> {
        self.ctx
            .recording_repository
            .find_by_sid(recording_sid)
            .await?
            .ok_or_else(|| CoreError::RecordingNotFound(recording_sid.to_string()))
    }

    async fn ready_recording(&self, call_sid: &str) -> CoreResult<Recording> {
        let recording = self
            .ctx
            .recording_repository
            .latest_by_call_sid(call_sid)
            .await?
            .ok_or_else(|| CoreError::RecordingNotFound(call_sid.to_string()))?;
        if !recording.is_ready() {
            return Err(CoreError::NotReady {
                status: recording.status.as_str().to_string(),
                download_status: recording.download_status.as_str().to_string(),
            });
        }
        Ok(recording)
    }
}
