//! 呼叫路由服务
//!
//! 纯决策：根据呼叫事件产出呼叫控制文档，不修改任何状态。
//! webhook 入口绝不失败 —— 无论发生什么都返回一份合法文档，
//! 保证供应商侧拿到 200 与可执行指令。

use std::sync::Arc;

use dialgate_provider::{CallControl, CallDirection, Dial, RecordMode, VoiceWebhook};

use crate::error::CoreResult;
use crate::types::CallEvent;
use crate::utils::phone;

use super::ServiceContext;

/// 单次路由的请求上下文
///
/// 由前端根据当前 HTTP 请求推导，核心层不感知部署域名。
#[derive(Debug, Clone)]
pub struct RouteContext {
    /// 回调基址，如 `https://api.example.com`
    pub callback_base_url: String,
    /// 外呼主叫号码（租户的默认号码，缺省则不带 callerId）
    pub outbound_caller_id: Option<String>,
}

/// 呼叫路由服务
pub struct RoutingService {
    ctx: Arc<ServiceContext>,
}

impl RoutingService {
    /// 创建呼叫路由服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// webhook 入口：绝不失败
    ///
    /// 任何内部错误都降级为致歉语 + 挂断，调用方直接将返回值
    /// 渲染为 XML 并以 200 响应。
    pub async fn handle_webhook(&self, form: &VoiceWebhook, route: &RouteContext) -> CallControl {
        let event = CallEvent::from_webhook(form);
        match self.route(&event, route).await {
            Ok(doc) => doc,
            Err(e) => {
                if e.is_expected() {
                    log::warn!("Routing degraded for call {}: {e}", event.call_sid);
                } else {
                    log::error!("Routing failed for call {}: {e}", event.call_sid);
                }
                CallControl::new()
                    .say(&self.ctx.routing_config.apology_text)
                    .hangup()
            }
        }
    }

    /// 路由决策
    ///
    /// 外部打入的来电转给号码归属的客户端应用；其余（客户端发起的
    /// 外呼）拨向 PSTN 被叫。两条路径都接上录音与状态回调。
    pub async fn route(&self, event: &CallEvent, route: &RouteContext) -> CoreResult<CallControl> {
        if self.is_inbound_external(event) {
            self.route_inbound(event, route).await
        } else {
            self.route_outbound(event, route)
        }
    }

    /// 是否为外部打入的来电
    ///
    /// 方向为 Inbound 且主叫不是平台内的客户端身份。客户端主叫
    /// 以 `client:` 方案或配置的身份前缀出现。
    fn is_inbound_external(&self, event: &CallEvent) -> bool {
        event.direction == CallDirection::Inbound && !self.is_client_caller(&event.from)
    }

    fn is_client_caller(&self, from: &str) -> bool {
        let identity = from.strip_prefix("client:").unwrap_or(from);
        from.starts_with("client:")
            || identity.starts_with(&self.ctx.routing_config.client_identity_prefix)
    }

    async fn route_inbound(
        &self,
        event: &CallEvent,
        route: &RouteContext,
    ) -> CoreResult<CallControl> {
        let cfg = &self.ctx.routing_config;
        let identity = match event.to.as_deref() {
            Some(number) => self
                .ctx
                .client_directory
                .owner_of(number)
                .await?
                .unwrap_or_else(|| cfg.fallback_client_identity.clone()),
            None => cfg.fallback_client_identity.clone(),
        };
        log::debug!(
            "Routing inbound call {} from {} to client {identity}",
            event.call_sid,
            event.from
        );

        let dial = Dial::client(identity)
            .caller_id(event.from.clone())
            .timeout_secs(cfg.dial_timeout_secs)
            .record(RecordMode::RecordFromRinging)
            .recording_status_callback(self.recording_callback(route));
        Ok(CallControl::new().dial(dial))
    }

    fn route_outbound(&self, event: &CallEvent, route: &RouteContext) -> CoreResult<CallControl> {
        let cfg = &self.ctx.routing_config;
        let Some(destination) = event.to.as_deref().filter(|d| phone::is_valid_e164(d)) else {
            log::warn!(
                "Call {} has an invalid destination: {:?}",
                event.call_sid,
                event.to
            );
            return Ok(CallControl::new()
                .say(&cfg.invalid_destination_text)
                .hangup());
        };
        log::debug!("Routing outbound call {} to {destination}", event.call_sid);

        let mut dial = Dial::number(destination)
            .timeout_secs(cfg.dial_timeout_secs)
            .record(RecordMode::RecordFromRinging)
            .recording_status_callback(self.recording_callback(route));
        if let Some(ref caller_id) = route.outbound_caller_id {
            dial = dial.caller_id(caller_id.clone());
        }
        Ok(CallControl::new().say(&cfg.disclosure_text).dial(dial))
    }

    fn recording_callback(&self, route: &RouteContext) -> String {
        format!(
            "{}{}",
            route.callback_base_url.trim_end_matches('/'),
            self.ctx.routing_config.recording_callback_path
        )
    }
}
