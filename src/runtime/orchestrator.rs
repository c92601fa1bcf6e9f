//! Surface orchestrator
//!
//! Each handler runs: precondition check → lifecycle submit → one gateway
//! call → apply the outcome to session state → settle and consume. Surface
//! state sits behind its own mutex which is never held across the gateway
//! await, so surfaces are independent while a request is in flight.

use super::snapshot::{AdviceView, ConversationView, PredictView, Snapshot};
use super::traits::RenderSink;
use crate::error::{ClientError, PreconditionError};
use crate::gateway::{
    decode, AdviceResponse, AnswerResponse, Endpoint, Gateway, ModelInfoResponse, PredictResponse,
};
use crate::session::{ConversationLog, FeatureSchema, FeatureVector, PredictionOutcome, PredictionSession};
use crate::state_machine::{
    transition, Effect, Event, LifecycleState, Settlement, Surface, TransitionError,
    TransitionResult,
};
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

const CHAT_PLACEHOLDER: &str = "正在思考...";
const VOICE_PLACEHOLDER: &str = "正在生成回答和语音...";

/// Surface-specific failure text shown to the user
fn failure_text(surface: Surface, err: &ClientError) -> String {
    match (surface, err) {
        (Surface::Predict, ClientError::Network(_)) => "预测失败，请检查服务器连接".to_string(),
        (Surface::Advice, ClientError::Network(_)) => "获取建议失败，请检查服务器连接".to_string(),
        (Surface::Chat | Surface::Voice, ClientError::Network(_)) => {
            "抱歉，服务器连接失败".to_string()
        }
        (Surface::Predict, _) => format!("预测失败: {}", err.user_message()),
        (Surface::Advice, _) => format!("生成建议失败: {}", err.user_message()),
        (Surface::Chat | Surface::Voice, _) => format!("抱歉，回答失败: {}", err.user_message()),
    }
}

/// State that can render one or more surfaces
trait SurfaceState {
    fn lifecycle(&self, surface: Surface) -> &LifecycleState;
    fn lifecycle_mut(&mut self, surface: Surface) -> &mut LifecycleState;
    fn snapshot(&self, surface: Surface) -> Snapshot;
}

/// Predict and advice surfaces; they share the prediction session
#[derive(Debug, Default)]
struct PredictionState {
    session: PredictionSession,
    schema: Option<FeatureSchema>,
    predict: LifecycleState,
    predict_error: Option<String>,
    advice: LifecycleState,
    advice_text: Option<String>,
    advice_notice: Option<String>,
}

impl SurfaceState for PredictionState {
    fn lifecycle(&self, surface: Surface) -> &LifecycleState {
        if surface == Surface::Advice {
            &self.advice
        } else {
            &self.predict
        }
    }

    fn lifecycle_mut(&mut self, surface: Surface) -> &mut LifecycleState {
        if surface == Surface::Advice {
            &mut self.advice
        } else {
            &mut self.predict
        }
    }

    fn snapshot(&self, surface: Surface) -> Snapshot {
        if surface == Surface::Advice {
            Snapshot::Advice(AdviceView {
                lifecycle: self.advice.clone(),
                advice: self.advice_text.clone(),
                notice: self.advice_notice.clone(),
            })
        } else {
            Snapshot::Predict(PredictView {
                lifecycle: self.predict.clone(),
                features: self.session.features().cloned(),
                outcome: self.session.outcome().cloned(),
                error: self.predict_error.clone(),
                can_request_advice: self.session.can_request_advice(),
            })
        }
    }
}

/// Chat or voice surface
#[derive(Debug)]
struct ConversationState {
    surface: Surface,
    lifecycle: LifecycleState,
    log: ConversationLog,
}

impl ConversationState {
    fn new(surface: Surface) -> Self {
        Self {
            surface,
            lifecycle: LifecycleState::Idle,
            log: ConversationLog::new(),
        }
    }
}

impl SurfaceState for ConversationState {
    fn lifecycle(&self, _surface: Surface) -> &LifecycleState {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self, _surface: Surface) -> &mut LifecycleState {
        &mut self.lifecycle
    }

    fn snapshot(&self, _surface: Surface) -> Snapshot {
        let view = ConversationView {
            lifecycle: self.lifecycle.clone(),
            messages: self.log.messages().to_vec(),
        };
        if self.surface == Surface::Voice {
            Snapshot::Voice(view)
        } else {
            Snapshot::Chat(view)
        }
    }
}

/// Owns all surface state and drives the backend
pub struct Orchestrator<G, R>
where
    G: Gateway,
    R: RenderSink,
{
    session_id: Uuid,
    gateway: G,
    sink: R,
    prediction: Mutex<PredictionState>,
    chat: Mutex<ConversationState>,
    voice: Mutex<ConversationState>,
}

impl<G, R> Orchestrator<G, R>
where
    G: Gateway,
    R: RenderSink,
{
    pub fn new(gateway: G, sink: R) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            gateway,
            sink,
            prediction: Mutex::new(PredictionState::default()),
            chat: Mutex::new(ConversationState::new(Surface::Chat)),
            voice: Mutex::new(ConversationState::new(Surface::Voice)),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Current snapshot of a surface, without rendering
    pub async fn snapshot(&self, surface: Surface) -> Snapshot {
        match surface {
            Surface::Predict | Surface::Advice => self.prediction.lock().await.snapshot(surface),
            Surface::Chat => self.chat.lock().await.snapshot(surface),
            Surface::Voice => self.voice.lock().await.snapshot(surface),
        }
    }

    // ========================================================================
    // Lifecycle plumbing
    // ========================================================================

    /// Install the new state and run the transition's effects
    fn commit<S: SurfaceState>(&self, surface: Surface, state: &mut S, result: TransitionResult) {
        *state.lifecycle_mut(surface) = result.new_state;
        for effect in result.effects {
            match effect {
                Effect::Render => self.sink.render(surface, state.snapshot(surface)),
                // The calling handler issues the request once the lock is released.
                Effect::Dispatch => {
                    tracing::debug!(session = %self.session_id, surface = %surface, "dispatching");
                }
            }
        }
    }

    /// Settle the in-flight request and fold the terminal state back to Idle
    fn settle<S: SurfaceState>(&self, surface: Surface, state: &mut S, settlement: Settlement) {
        for event in [Event::Settle(settlement), Event::Consume] {
            match transition(state.lifecycle(surface), event) {
                Ok(result) => self.commit(surface, state, result),
                Err(e) => {
                    tracing::error!(
                        session = %self.session_id,
                        surface = %surface,
                        error = %e,
                        "Lifecycle settle rejected"
                    );
                    return;
                }
            }
        }
    }

    fn log_rejection(&self, surface: Surface, err: &TransitionError) {
        match err {
            TransitionError::Busy => {
                tracing::debug!(session = %self.session_id, surface = %surface, "Duplicate submission dropped");
            }
            other => {
                tracing::warn!(session = %self.session_id, surface = %surface, error = %other, "Submission rejected");
            }
        }
    }

    // ========================================================================
    // Predict
    // ========================================================================

    /// Parse raw form pairs and submit them. Nothing is sent unless every
    /// field is a finite number (and matches the model schema when loaded).
    pub async fn submit_prediction_form(&self, fields: Vec<(String, String)>) -> Snapshot {
        let parsed = {
            let state = self.prediction.lock().await;
            FeatureVector::parse(fields, state.schema.as_ref())
        };
        match parsed {
            Ok(features) => self.predict(features).await,
            Err(e) => self.reject_prediction_input(ClientError::from(e)).await,
        }
    }

    async fn reject_prediction_input(&self, err: ClientError) -> Snapshot {
        tracing::info!(session = %self.session_id, error = %err, "Prediction input rejected");
        let mut state = self.prediction.lock().await;
        state.predict_error = Some(err.user_message());
        let snapshot = state.snapshot(Surface::Predict);
        self.sink.render(Surface::Predict, snapshot.clone());
        snapshot
    }

    pub async fn predict(&self, features: FeatureVector) -> Snapshot {
        {
            let mut state = self.prediction.lock().await;
            let result = match transition(&state.predict, Event::submit(true)) {
                Ok(result) => result,
                Err(e) => {
                    self.log_rejection(Surface::Predict, &e);
                    return state.snapshot(Surface::Predict);
                }
            };
            let checked = state.schema.as_ref().map_or(Ok(()), |s| s.check(&features));
            if let Err(e) = checked {
                drop(state);
                return self.reject_prediction_input(ClientError::from(e)).await;
            }
            state.session.begin_submission();
            state.predict_error = None;
            self.commit(Surface::Predict, &mut *state, result);
        }

        tracing::info!(session = %self.session_id, fields = features.len(), "Requesting prediction");
        let outcome = self
            .gateway
            .post(Endpoint::Predict, &json!(features))
            .await
            .and_then(decode::<PredictResponse>)
            .and_then(|resp| PredictionOutcome::try_from(resp.data));

        let mut state = self.prediction.lock().await;
        let settlement = match outcome {
            Ok(outcome) => {
                tracing::info!(
                    session = %self.session_id,
                    predicted_class = outcome.predicted_class,
                    risk = %outcome.risk_label,
                    "Prediction received"
                );
                state.session.record_prediction(features, outcome);
                // Errors from forms rejected while this was pending, and advice
                // written for the previous features, no longer apply.
                state.predict_error = None;
                state.advice_text = None;
                state.advice_notice = None;
                Settlement::Ok
            }
            Err(e) => {
                let message = failure_text(Surface::Predict, &ClientError::from(e));
                state.session.abandon_submission();
                state.predict_error = Some(message.clone());
                Settlement::Err { message }
            }
        };
        self.settle(Surface::Predict, &mut *state, settlement);
        state.snapshot(Surface::Predict)
    }

    // ========================================================================
    // Advice
    // ========================================================================

    pub async fn request_advice(&self) -> Snapshot {
        let features = {
            let mut state = self.prediction.lock().await;
            let features = state.session.advice_request().cloned();
            match transition(&state.advice, Event::submit(features.is_some())) {
                Ok(result) => {
                    state.advice_text = None;
                    state.advice_notice = None;
                    self.commit(Surface::Advice, &mut *state, result);
                }
                Err(TransitionError::PreconditionFailed) => {
                    let err = ClientError::from(PreconditionError::PredictionRequired);
                    tracing::info!(session = %self.session_id, "Advice requested before prediction");
                    state.advice_notice = Some(err.user_message());
                    let snapshot = state.snapshot(Surface::Advice);
                    self.sink.render(Surface::Advice, snapshot.clone());
                    return snapshot;
                }
                Err(e) => {
                    self.log_rejection(Surface::Advice, &e);
                    return state.snapshot(Surface::Advice);
                }
            }
            features
        };

        let outcome = self
            .gateway
            .post(Endpoint::HealthAdvice, &json!({ "user_data": features }))
            .await
            .and_then(decode::<AdviceResponse>);

        let mut state = self.prediction.lock().await;
        let settlement = match outcome {
            Ok(resp) => {
                state.advice_text = Some(resp.advice);
                Settlement::Ok
            }
            Err(e) => {
                let message = failure_text(Surface::Advice, &ClientError::from(e));
                state.advice_notice = Some(message.clone());
                Settlement::Err { message }
            }
        };
        self.settle(Surface::Advice, &mut *state, settlement);
        state.snapshot(Surface::Advice)
    }

    // ========================================================================
    // Chat / Voice
    // ========================================================================

    pub async fn chat(&self, question: &str) -> Snapshot {
        self.ask(Surface::Chat, question).await
    }

    pub async fn voice(&self, question: &str) -> Snapshot {
        self.ask(Surface::Voice, question).await
    }

    async fn ask(&self, surface: Surface, question: &str) -> Snapshot {
        let (conversation, endpoint, placeholder_text) = if surface == Surface::Voice {
            (&self.voice, Endpoint::Voice, VOICE_PLACEHOLDER)
        } else {
            (&self.chat, Endpoint::Chat, CHAT_PLACEHOLDER)
        };

        let (question, placeholder) = {
            let mut state = conversation.lock().await;
            let result = match transition(&state.lifecycle, Event::submit(true)) {
                Ok(result) => result,
                Err(e) => {
                    self.log_rejection(surface, &e);
                    return state.snapshot(surface);
                }
            };
            let Some(user) = state.log.append_user(question) else {
                tracing::debug!(session = %self.session_id, surface = %surface, "Blank question ignored");
                return state.snapshot(surface);
            };
            let placeholder = state.log.append_pending_assistant(placeholder_text);
            self.commit(surface, &mut *state, result);
            (user.text, placeholder)
        };

        let outcome = self
            .gateway
            .post(endpoint, &json!({ "question": question }))
            .await
            .and_then(decode::<AnswerResponse>);

        let mut state = conversation.lock().await;
        let (text, audio_ref, settlement) = match outcome {
            Ok(resp) => {
                // Chat answers never carry audio even if the backend sends a field.
                let audio_ref = resp.audio_url.filter(|_| surface == Surface::Voice);
                (resp.answer, audio_ref, Settlement::Ok)
            }
            Err(e) => {
                let message = failure_text(surface, &ClientError::from(e));
                (message.clone(), None, Settlement::Err { message })
            }
        };

        if let Err(e) = state.log.resolve_assistant(placeholder, &text, audio_ref) {
            let err = ClientError::from(e);
            tracing::error!(
                session = %self.session_id,
                surface = %surface,
                error = %err,
                user_facing = err.is_user_facing(),
                "Conversation log out of sync"
            );
        }
        self.settle(surface, &mut *state, settlement);
        debug_assert!(!state.log.has_pending(), "placeholder left unresolved");
        tracing::debug!(session = %self.session_id, surface = %surface, messages = state.log.len(), "Conversation settled");
        state.snapshot(surface)
    }

    // ========================================================================
    // Model metadata
    // ========================================================================

    /// Fetch the model's feature names and use them to validate predict forms
    pub async fn load_model_info(&self) -> Result<FeatureSchema, ClientError> {
        let body = self.gateway.get(Endpoint::ModelInfo).await?;
        let info: ModelInfoResponse = decode(body)?;
        let schema = FeatureSchema::new(info.data.feature_names);
        tracing::info!(
            session = %self.session_id,
            model_type = info.data.model_type.as_deref().unwrap_or("unknown"),
            features = schema.names().len(),
            "Model schema loaded"
        );
        self.prediction.lock().await.schema = Some(schema.clone());
        Ok(schema)
    }
}
