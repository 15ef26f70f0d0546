//! 录音仓库抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Recording;

/// 录音仓库 Trait
#[async_trait]
pub trait RecordingRepository: Send + Sync {
    /// 按录音 SID 查找
    async fn find_by_sid(&self, recording_sid: &str) -> CoreResult<Option<Recording>>;

    /// 查找呼叫的最新一条录音
    ///
    /// 供应商可能为同一通话重试回调或产生多条录音，以 `updated_at`
    /// 最新的一条为准。
    async fn latest_by_call_sid(&self, call_sid: &str) -> CoreResult<Option<Recording>>;

    /// 按 `recording_sid` 幂等写入
    async fn upsert(&self, recording: &Recording) -> CoreResult<()>;
}
