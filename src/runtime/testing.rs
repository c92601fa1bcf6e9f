//! Mock implementations for testing
//!
//! These mocks enable orchestrator tests without real I/O.

use super::traits::RenderSink;
use super::Snapshot;
use crate::gateway::{Endpoint, Gateway, TransportError};
use crate::state_machine::Surface;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};

// ============================================================================
// Mock Gateway
// ============================================================================

/// Mock gateway that returns queued responses per endpoint
#[derive(Default)]
pub struct MockGateway {
    responses: Mutex<HashMap<Endpoint, VecDeque<Result<Value, TransportError>>>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<(Endpoint, Value)>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a body; it goes through the same envelope check as real responses
    pub fn queue_body(&self, endpoint: Endpoint, body: Value) {
        self.queue(endpoint, crate::gateway::check_envelope(body));
    }

    /// Queue a transport failure
    pub fn queue_error(&self, endpoint: Endpoint, error: TransportError) {
        self.queue(endpoint, Err(error));
    }

    fn queue(&self, endpoint: Endpoint, result: Result<Value, TransportError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(endpoint)
            .or_default()
            .push_back(result);
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<(Endpoint, Value)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: Endpoint) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .count()
    }

    fn respond(&self, endpoint: Endpoint, body: Value) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push((endpoint, body));
        self.responses
            .lock()
            .unwrap()
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportError::network("No mock response queued")))
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn post(&self, endpoint: Endpoint, body: &Value) -> Result<Value, TransportError> {
        self.respond(endpoint, body.clone())
    }

    async fn get(&self, endpoint: Endpoint) -> Result<Value, TransportError> {
        self.respond(endpoint, Value::Null)
    }
}

// ============================================================================
// Blocking Mock Gateway (for in-flight testing)
// ============================================================================

/// Gateway that holds every call until the test releases it
pub struct BlockingGateway {
    pub inner: MockGateway,
    gate: Semaphore,
    /// Notified when a request reaches the gateway
    pub request_started: Arc<Notify>,
}

impl BlockingGateway {
    pub fn new() -> Self {
        Self {
            inner: MockGateway::new(),
            gate: Semaphore::new(0),
            request_started: Arc::new(Notify::new()),
        }
    }

    /// Let `n` held calls proceed
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }
}

#[async_trait]
impl Gateway for BlockingGateway {
    async fn post(&self, endpoint: Endpoint, body: &Value) -> Result<Value, TransportError> {
        self.inner.requests.lock().unwrap().push((endpoint, body.clone()));
        self.request_started.notify_one();
        self.gate.acquire().await.unwrap().forget();
        // Already recorded above; pop the queued response directly.
        let result = self
            .inner
            .responses
            .lock()
            .unwrap()
            .get_mut(&endpoint)
            .and_then(VecDeque::pop_front);
        result.unwrap_or_else(|| Err(TransportError::network("No mock response queued")))
    }

    async fn get(&self, endpoint: Endpoint) -> Result<Value, TransportError> {
        self.post(endpoint, &Value::Null).await
    }
}

// ============================================================================
// Recording Sink
// ============================================================================

/// Sink that keeps every render for inspection
#[derive(Default)]
pub struct RecordingSink {
    renders: Mutex<Vec<(Surface, Snapshot)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn renders(&self) -> Vec<(Surface, Snapshot)> {
        self.renders.lock().unwrap().clone()
    }

    pub fn renders_for(&self, surface: Surface) -> Vec<Snapshot> {
        self.renders()
            .into_iter()
            .filter(|(s, _)| *s == surface)
            .map(|(_, snapshot)| snapshot)
            .collect()
    }

    pub fn last(&self, surface: Surface) -> Option<Snapshot> {
        self.renders_for(surface).pop()
    }
}

impl RenderSink for RecordingSink {
    fn render(&self, surface: Surface, snapshot: Snapshot) {
        self.renders.lock().unwrap().push((surface, snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Orchestrator;
    use crate::session::{FeatureVector, RiskLevel, Role};
    use crate::state_machine::LifecycleState;
    use futures::future::join_all;
    use serde_json::json;

    type TestOrchestrator<G> = Orchestrator<Arc<G>, Arc<RecordingSink>>;

    fn orchestrator<G: Gateway>(gateway: G) -> (TestOrchestrator<G>, Arc<G>, Arc<RecordingSink>) {
        let gateway = Arc::new(gateway);
        let sink = Arc::new(RecordingSink::new());
        let orch = Orchestrator::new(Arc::clone(&gateway), Arc::clone(&sink));
        (orch, gateway, sink)
    }

    fn form(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn features() -> FeatureVector {
        FeatureVector::parse([("age", "54"), ("bp", "130"), ("chol", "220")], None).unwrap()
    }

    fn high_risk_body() -> Value {
        json!({
            "success": true,
            "data": {
                "prediction": 1,
                "risk_level": "高风险",
                "probability": {"positive": 0.82, "negative": 0.18}
            }
        })
    }

    #[tokio::test]
    async fn test_mock_gateway_queue() {
        let mock = MockGateway::new();
        mock.queue_body(Endpoint::Chat, json!({"success": true, "answer": "hi"}));

        let ok = mock.post(Endpoint::Chat, &json!({"question": "q"})).await;
        assert!(ok.is_ok());

        // Second call should fail (no more responses)
        let err = mock.post(Endpoint::Chat, &json!({"question": "q"})).await.unwrap_err();
        assert!(err.is_network());
        assert_eq!(mock.calls_to(Endpoint::Chat), 2);
    }

    // ========================================================================
    // Predict
    // ========================================================================

    #[tokio::test]
    async fn test_prediction_scenario() {
        let mock = MockGateway::new();
        mock.queue_body(Endpoint::Predict, high_risk_body());
        let (orch, gateway, sink) = orchestrator(mock);

        let snapshot = orch
            .submit_prediction_form(form(&[("age", "54"), ("bp", "130"), ("chol", "220")]))
            .await;

        let view = snapshot.as_predict().unwrap();
        let outcome = view.outcome.as_ref().unwrap();
        assert_eq!(outcome.predicted_class, 1);
        assert_eq!(outcome.risk_label, "高风险");
        assert_eq!(outcome.risk_level, RiskLevel::High);
        assert!((outcome.probability_positive - 0.82).abs() < 1e-9);
        assert_eq!(view.lifecycle, LifecycleState::Idle);
        assert!(view.can_request_advice);
        assert_eq!(view.error, None);

        // The body is the flat feature mapping.
        let requests = gateway.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].1, json!({"age": 54.0, "bp": 130.0, "chol": 220.0}));

        // Pending, Succeeded, Idle.
        let lifecycles: Vec<LifecycleState> = sink
            .renders_for(Surface::Predict)
            .iter()
            .map(|s| s.lifecycle().clone())
            .collect();
        assert_eq!(
            lifecycles,
            vec![
                LifecycleState::Pending,
                LifecycleState::Succeeded,
                LifecycleState::Idle
            ]
        );
        assert_eq!(sink.last(Surface::Predict), Some(snapshot));
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_gateway() {
        let (orch, gateway, sink) = orchestrator(MockGateway::new());

        let snapshot = orch
            .submit_prediction_form(form(&[("age", "54"), ("bp", "high")]))
            .await;

        assert_eq!(gateway.recorded_requests().len(), 0);
        let view = snapshot.as_predict().unwrap();
        assert_eq!(view.lifecycle, LifecycleState::Idle);
        assert!(view.error.as_deref().unwrap().contains("bp"));
        assert!(view.outcome.is_none());
        assert_eq!(sink.renders_for(Surface::Predict).len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_predict_is_dropped() {
        let blocking = BlockingGateway::new();
        blocking.inner.queue_body(Endpoint::Predict, high_risk_body());
        let (orch, gateway, _sink) = orchestrator(blocking);

        let first = orch.predict(features());
        let second = async {
            gateway.request_started.notified().await;
            let snapshot = orch.predict(features()).await;
            assert_eq!(snapshot.lifecycle(), &LifecycleState::Pending);
            gateway.release(1);
        };
        let (settled, ()) = tokio::join!(first, second);

        assert_eq!(gateway.inner.calls_to(Endpoint::Predict), 1);
        assert_eq!(settled.lifecycle(), &LifecycleState::Idle);
        assert!(settled.as_predict().unwrap().outcome.is_some());
    }

    #[tokio::test]
    async fn test_success_clears_error_from_form_rejected_while_pending() {
        let blocking = BlockingGateway::new();
        blocking.inner.queue_body(Endpoint::Predict, high_risk_body());
        let (orch, gateway, _sink) = orchestrator(blocking);

        let first = orch.predict(features());
        let rejected = async {
            gateway.request_started.notified().await;
            let snapshot = orch.submit_prediction_form(form(&[("age", "abc")])).await;
            let view = snapshot.as_predict().unwrap();
            assert!(view.lifecycle.is_pending());
            assert!(view.error.as_deref().unwrap().contains("age"));
            gateway.release(1);
        };
        let (settled, ()) = tokio::join!(first, rejected);

        assert_eq!(gateway.inner.calls_to(Endpoint::Predict), 1);
        let view = settled.as_predict().unwrap();
        assert_eq!(view.lifecycle, LifecycleState::Idle);
        assert_eq!(view.error, None);
        assert_eq!(view.outcome.as_ref().unwrap().risk_label, "高风险");
    }

    #[tokio::test]
    async fn test_burst_of_questions_sends_one_request() {
        let blocking = BlockingGateway::new();
        blocking.inner.queue_body(Endpoint::Chat, json!({"success": true, "answer": "only"}));
        let (orch, gateway, _sink) = orchestrator(blocking);

        let first = orch.chat("one");
        let burst = async {
            gateway.request_started.notified().await;
            let dropped = join_all(["two", "three", "four"].into_iter().map(|q| orch.chat(q))).await;
            gateway.release(1);
            dropped
        };
        let (settled, dropped) = tokio::join!(first, burst);

        assert_eq!(gateway.inner.calls_to(Endpoint::Chat), 1);
        for snapshot in &dropped {
            assert!(snapshot.lifecycle().is_pending());
            assert_eq!(snapshot.as_conversation().unwrap().messages.len(), 2);
        }
        let view = settled.as_conversation().unwrap();
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.messages[0].text, "one");
        assert_eq!(view.messages[1].text, "only");
    }

    #[tokio::test]
    async fn test_predict_failure_keeps_previous_prediction() {
        let mock = MockGateway::new();
        mock.queue_body(Endpoint::Predict, high_risk_body());
        mock.queue_body(
            Endpoint::Predict,
            json!({"success": false, "error": "模型未加载"}),
        );
        let (orch, _gateway, _sink) = orchestrator(mock);

        orch.predict(features()).await;
        let snapshot = orch.predict(features()).await;

        let view = snapshot.as_predict().unwrap();
        assert_eq!(view.lifecycle, LifecycleState::Idle);
        assert_eq!(view.error.as_deref(), Some("预测失败: 模型未加载"));
        assert!(view.outcome.is_some());
        assert!(view.can_request_advice);
    }

    #[tokio::test]
    async fn test_malformed_prediction_is_server_failure() {
        let mock = MockGateway::new();
        mock.queue_body(
            Endpoint::Predict,
            json!({"success": true, "data": {
                "prediction": 1,
                "risk_level": "高风险",
                "probability": {"positive": 0.9, "negative": 0.9}
            }}),
        );
        let (orch, _gateway, sink) = orchestrator(mock);

        let snapshot = orch.predict(features()).await;
        let view = snapshot.as_predict().unwrap();
        assert!(view.outcome.is_none());
        assert!(view.error.as_deref().unwrap().starts_with("预测失败: Malformed response"));
        assert!(sink
            .renders_for(Surface::Predict)
            .iter()
            .any(|s| matches!(s.lifecycle(), LifecycleState::Failed { .. })));
    }

    #[tokio::test]
    async fn test_network_failure_message() {
        let mock = MockGateway::new();
        mock.queue_error(Endpoint::Predict, TransportError::network("Connection failed"));
        let (orch, _gateway, _sink) = orchestrator(mock);

        let snapshot = orch.predict(features()).await;
        assert_eq!(
            snapshot.as_predict().unwrap().error.as_deref(),
            Some("预测失败，请检查服务器连接")
        );
    }

    // ========================================================================
    // Advice
    // ========================================================================

    #[tokio::test]
    async fn test_advice_requires_prediction() {
        let (orch, gateway, sink) = orchestrator(MockGateway::new());

        let snapshot = orch.request_advice().await;

        assert!(gateway.recorded_requests().is_empty());
        let view = snapshot.as_advice().unwrap();
        assert_eq!(view.lifecycle, LifecycleState::Idle);
        assert_eq!(view.notice.as_deref(), Some("请先进行预测"));
        assert_eq!(sink.last(Surface::Advice), Some(snapshot));
    }

    #[tokio::test]
    async fn test_advice_after_prediction() {
        let mock = MockGateway::new();
        mock.queue_body(Endpoint::Predict, high_risk_body());
        mock.queue_body(
            Endpoint::HealthAdvice,
            json!({"success": true, "advice": "多运动，少盐"}),
        );
        let (orch, gateway, _sink) = orchestrator(mock);

        orch.predict(features()).await;
        let snapshot = orch.request_advice().await;

        let view = snapshot.as_advice().unwrap();
        assert_eq!(view.advice.as_deref(), Some("多运动，少盐"));
        assert_eq!(view.notice, None);

        let requests = gateway.recorded_requests();
        assert_eq!(requests[1].0, Endpoint::HealthAdvice);
        assert_eq!(
            requests[1].1,
            json!({"user_data": {"age": 54.0, "bp": 130.0, "chol": 220.0}})
        );
    }

    #[tokio::test]
    async fn test_new_prediction_clears_previous_advice() {
        let mock = MockGateway::new();
        mock.queue_body(Endpoint::Predict, high_risk_body());
        mock.queue_body(
            Endpoint::HealthAdvice,
            json!({"success": true, "advice": "多运动，少盐"}),
        );
        mock.queue_body(Endpoint::Predict, high_risk_body());
        let (orch, _gateway, _sink) = orchestrator(mock);

        orch.predict(features()).await;
        orch.request_advice().await;
        orch.predict(features()).await;

        let snapshot = orch.snapshot(Surface::Advice).await;
        let view = snapshot.as_advice().unwrap();
        assert_eq!(view.advice, None);
        assert_eq!(view.notice, None);
        assert!(orch
            .snapshot(Surface::Predict)
            .await
            .as_predict()
            .unwrap()
            .can_request_advice);
    }

    #[tokio::test]
    async fn test_failed_prediction_keeps_advice() {
        let mock = MockGateway::new();
        mock.queue_body(Endpoint::Predict, high_risk_body());
        mock.queue_body(
            Endpoint::HealthAdvice,
            json!({"success": true, "advice": "多运动，少盐"}),
        );
        mock.queue_body(Endpoint::Predict, json!({"success": false, "error": "model unavailable"}));
        let (orch, _gateway, _sink) = orchestrator(mock);

        orch.predict(features()).await;
        orch.request_advice().await;
        orch.predict(features()).await;

        let snapshot = orch.snapshot(Surface::Advice).await;
        assert_eq!(snapshot.as_advice().unwrap().advice.as_deref(), Some("多运动，少盐"));
    }

    #[tokio::test]
    async fn test_advice_gate_closes_while_prediction_pending() {
        let blocking = BlockingGateway::new();
        blocking.inner.queue_body(Endpoint::Predict, high_risk_body());
        blocking.inner.queue_body(Endpoint::Predict, high_risk_body());
        let (orch, gateway, _sink) = orchestrator(blocking);

        gateway.release(1);
        let first = orch.predict(features()).await;
        assert!(first.as_predict().unwrap().can_request_advice);

        let second = orch.predict(features());
        let check = async {
            gateway.request_started.notified().await;
            let advice = orch.request_advice().await;
            assert_eq!(
                advice.as_advice().unwrap().notice.as_deref(),
                Some("请先进行预测")
            );
            gateway.release(1);
        };
        let (settled, ()) = tokio::join!(second, check);

        assert!(settled.as_predict().unwrap().can_request_advice);
        assert_eq!(gateway.inner.calls_to(Endpoint::HealthAdvice), 0);
    }

    #[tokio::test]
    async fn test_advice_failure_is_rendered() {
        let mock = MockGateway::new();
        mock.queue_body(Endpoint::Predict, high_risk_body());
        mock.queue_body(Endpoint::HealthAdvice, json!({"error": "请提供用户数据"}));
        let (orch, _gateway, _sink) = orchestrator(mock);

        orch.predict(features()).await;
        let snapshot = orch.request_advice().await;
        let view = snapshot.as_advice().unwrap();
        assert_eq!(view.lifecycle, LifecycleState::Idle);
        assert_eq!(view.notice.as_deref(), Some("生成建议失败: 请提供用户数据"));
        assert_eq!(view.advice, None);
    }

    // ========================================================================
    // Chat / Voice
    // ========================================================================

    #[tokio::test]
    async fn test_chat_failure_scenario() {
        let mock = MockGateway::new();
        mock.queue_body(
            Endpoint::Chat,
            json!({"success": false, "error": "model unavailable"}),
        );
        let (orch, gateway, _sink) = orchestrator(mock);

        let snapshot = orch.chat("what is a healthy blood pressure?").await;

        let view = snapshot.as_conversation().unwrap();
        assert_eq!(view.lifecycle, LifecycleState::Idle);
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.messages[0].role, Role::User);
        assert_eq!(view.messages[0].text, "what is a healthy blood pressure?");
        assert_eq!(view.messages[1].role, Role::Assistant);
        assert!(view.messages[1].text.contains("model unavailable"));
        assert!(!view.messages[1].pending);
        assert_eq!(view.messages[1].audio_ref, None);
        assert_eq!(
            gateway.recorded_requests()[0].1,
            json!({"question": "what is a healthy blood pressure?"})
        );
    }

    #[tokio::test]
    async fn test_chat_network_failure() {
        let (orch, _gateway, _sink) = orchestrator(MockGateway::new());

        let snapshot = orch.chat("hello").await;
        let view = snapshot.as_conversation().unwrap();
        assert_eq!(view.messages.len(), 2);
        assert_eq!(view.messages[1].text, "抱歉，服务器连接失败");
    }

    #[tokio::test]
    async fn test_voice_keeps_audio_ref_verbatim() {
        let mock = MockGateway::new();
        mock.queue_body(
            Endpoint::Voice,
            json!({"success": true, "answer": "保持血压在120/80以下", "audio_url": "/audio/x.mp3"}),
        );
        let (orch, _gateway, sink) = orchestrator(mock);

        let snapshot = orch.voice("血压多少正常？").await;

        assert!(matches!(snapshot, Snapshot::Voice(_)));
        let view = snapshot.as_conversation().unwrap();
        assert_eq!(view.messages[1].audio_ref.as_deref(), Some("/audio/x.mp3"));
        assert_eq!(view.messages[1].text, "保持血压在120/80以下");

        // The pending render shows the placeholder in position.
        let pending = &sink.renders_for(Surface::Voice)[0];
        let pending = pending.as_conversation().unwrap();
        assert_eq!(pending.lifecycle, LifecycleState::Pending);
        assert!(pending.messages[1].pending);
        assert_eq!(pending.messages[1].id, view.messages[1].id);
        assert!(sink.renders_for(Surface::Chat).is_empty());
    }

    #[tokio::test]
    async fn test_chat_ignores_audio_url() {
        let mock = MockGateway::new();
        mock.queue_body(
            Endpoint::Chat,
            json!({"success": true, "answer": "ok", "audio_url": "/audio/y.mp3"}),
        );
        let (orch, _gateway, _sink) = orchestrator(mock);

        let snapshot = orch.chat("q").await;
        assert_eq!(snapshot.as_conversation().unwrap().messages[1].audio_ref, None);
    }

    #[tokio::test]
    async fn test_blank_question_is_ignored() {
        let (orch, gateway, sink) = orchestrator(MockGateway::new());

        let snapshot = orch.chat("   ").await;

        assert!(snapshot.as_conversation().unwrap().messages.is_empty());
        assert!(gateway.recorded_requests().is_empty());
        assert!(sink.renders().is_empty());
    }

    #[tokio::test]
    async fn test_surface_usable_after_error() {
        let mock = MockGateway::new();
        mock.queue_error(Endpoint::Chat, TransportError::network("refused"));
        mock.queue_body(Endpoint::Chat, json!({"success": true, "answer": "second"}));
        let (orch, _gateway, _sink) = orchestrator(mock);

        orch.chat("first").await;
        let snapshot = orch.chat("again").await;

        let view = snapshot.as_conversation().unwrap();
        assert_eq!(view.lifecycle, LifecycleState::Idle);
        assert_eq!(view.messages.len(), 4);
        assert_eq!(view.messages[3].text, "second");
    }

    #[tokio::test]
    async fn test_surfaces_run_concurrently() {
        let blocking = BlockingGateway::new();
        blocking.inner.queue_body(Endpoint::Chat, json!({"success": true, "answer": "chat"}));
        blocking
            .inner
            .queue_body(Endpoint::Voice, json!({"success": true, "answer": "voice"}));
        blocking.inner.queue_body(Endpoint::Predict, high_risk_body());
        let (orch, gateway, _sink) = orchestrator(blocking);

        let chat = orch.chat("a");
        let voice = orch.voice("b");
        let predict = orch.predict(features());
        let release = async {
            // All three surfaces are in flight before anything settles.
            while gateway.inner.recorded_requests().len() < 3 {
                tokio::task::yield_now().await;
            }
            for surface in [Surface::Chat, Surface::Voice, Surface::Predict] {
                assert!(orch.snapshot(surface).await.lifecycle().is_pending());
            }
            gateway.release(3);
        };
        let (chat, voice, predict, ()) = tokio::join!(chat, voice, predict, release);

        assert_eq!(chat.as_conversation().unwrap().messages[1].text, "chat");
        assert_eq!(voice.as_conversation().unwrap().messages[1].text, "voice");
        assert!(predict.as_predict().unwrap().outcome.is_some());
        // Logs are never shared between surfaces.
        assert_eq!(chat.as_conversation().unwrap().messages.len(), 2);
        assert_eq!(voice.as_conversation().unwrap().messages.len(), 2);
    }

    #[tokio::test]
    async fn test_independent_orchestrators_do_not_share_state() {
        let mock = MockGateway::new();
        mock.queue_body(Endpoint::Predict, high_risk_body());
        let (first, _g1, _s1) = orchestrator(mock);
        let (second, _g2, _s2) = orchestrator(MockGateway::new());

        first.predict(features()).await;

        assert_ne!(first.session_id(), second.session_id());
        let view = second.snapshot(Surface::Predict).await;
        assert!(!view.as_predict().unwrap().can_request_advice);
    }

    // ========================================================================
    // Model info
    // ========================================================================

    #[tokio::test]
    async fn test_model_schema_validates_forms() {
        let mock = MockGateway::new();
        mock.queue_body(
            Endpoint::ModelInfo,
            json!({"success": true, "data": {
                "model_type": "XGBoost Classifier",
                "feature_count": 2,
                "feature_names": ["age", "bp"]
            }}),
        );
        let (orch, gateway, _sink) = orchestrator(mock);

        let schema = orch.load_model_info().await.unwrap();
        assert_eq!(schema.names(), ["age".to_string(), "bp".to_string()]);

        let snapshot = orch.submit_prediction_form(form(&[("age", "54")])).await;
        assert!(snapshot
            .as_predict()
            .unwrap()
            .error
            .as_deref()
            .unwrap()
            .contains("bp"));
        assert_eq!(gateway.calls_to(Endpoint::Predict), 0);
    }

    #[tokio::test]
    async fn test_model_info_failure_is_returned() {
        let (orch, _gateway, _sink) = orchestrator(MockGateway::new());
        let err = orch.load_model_info().await.unwrap_err();
        assert!(matches!(err, crate::error::ClientError::Network(_)));
    }
}
