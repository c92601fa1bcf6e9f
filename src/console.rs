//! Line-oriented terminal front end
//!
//! Adapts typed commands into orchestrator calls and prints snapshots. Each
//! command runs in its own task so different surfaces can be in flight at the
//! same time; the orchestrator drops duplicates within a surface.

use crate::gateway::{resolve_against, Gateway};
use crate::runtime::{Orchestrator, RenderSink, Snapshot};
use crate::session::Role;
use crate::state_machine::Surface;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

const HELP: &str = "\
commands:
  predict <name>=<value> ...   submit health metrics for a risk prediction
  advice                       health advice for the last prediction
  chat <question>              ask a question
  voice <question>             ask a question, answer includes synthesized audio
  info                         load the model's feature names
  status                       show every surface
  help                         show this message
  quit                         wait for in-flight requests and exit";

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Predict(Vec<(String, String)>),
    Advice,
    Chat(String),
    Voice(String),
    Info,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("expected <name>=<value>, got `{0}`")]
    MalformedField(String),
    #[error("`{0}` needs a question")]
    MissingQuestion(&'static str),
}

/// Parse one input line; blank lines yield `None`
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word.to_ascii_lowercase().as_str() {
        "predict" => {
            let fields = rest
                .split_whitespace()
                .map(|pair| {
                    pair.split_once('=')
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .ok_or_else(|| CommandError::MalformedField(pair.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Command::Predict(fields)
        }
        "advice" => Command::Advice,
        "chat" | "voice" if rest.is_empty() => {
            return Err(CommandError::MissingQuestion(if word.eq_ignore_ascii_case("chat") {
                "chat"
            } else {
                "voice"
            }))
        }
        "chat" => Command::Chat(rest.to_string()),
        "voice" => Command::Voice(rest.to_string()),
        "info" => Command::Info,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Render a snapshot as the single line the console shows for its surface
pub fn format_snapshot(snapshot: &Snapshot, api_base: &str) -> String {
    let surface = snapshot.surface();
    let body = match snapshot {
        Snapshot::Predict(view) => {
            if view.lifecycle.is_pending() {
                "预测中...".to_string()
            } else if let Some(error) = &view.error {
                error.clone()
            } else if let Some(outcome) = &view.outcome {
                let verdict = if outcome.predicted_class == 1 {
                    "有心血管疾病风险"
                } else {
                    "无明显心血管疾病风险"
                };
                format!(
                    "{} | 预测结果: {} | 患病概率 {:.2}% | 健康概率 {:.2}%",
                    outcome.risk_label,
                    verdict,
                    outcome.probability_positive * 100.0,
                    outcome.probability_negative * 100.0
                )
            } else {
                "尚无预测".to_string()
            }
        }
        Snapshot::Advice(view) => {
            if view.lifecycle.is_pending() {
                "正在生成健康建议...".to_string()
            } else if let Some(notice) = &view.notice {
                notice.clone()
            } else {
                view.advice.clone().unwrap_or_default()
            }
        }
        Snapshot::Chat(view) | Snapshot::Voice(view) => match view.messages.last() {
            Some(message) => {
                let label = match message.role {
                    Role::User => "您",
                    Role::Assistant => "AI助手",
                };
                match &message.audio_ref {
                    Some(audio) => format!(
                        "{label}: {} [audio: {}]",
                        message.text,
                        resolve_against(api_base, audio)
                    ),
                    None => format!("{label}: {}", message.text),
                }
            }
            None => String::new(),
        },
    };
    format!("[{surface}] {body}")
}

/// Prints each surface's line when it changes
pub struct ConsoleSink {
    api_base: String,
    last: Mutex<HashMap<Surface, String>>,
}

impl ConsoleSink {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            last: Mutex::new(HashMap::new()),
        }
    }

    /// The line to print, or `None` when the surface looks the same as before
    fn changed_line(&self, surface: Surface, snapshot: &Snapshot) -> Option<String> {
        // Terminal states fold back to Idle immediately and look the same.
        if snapshot.lifecycle().is_terminal() {
            return None;
        }
        let line = format_snapshot(snapshot, &self.api_base);
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if last.get(&surface) == Some(&line) {
            return None;
        }
        last.insert(surface, line.clone());
        Some(line)
    }
}

impl RenderSink for ConsoleSink {
    fn render(&self, surface: Surface, snapshot: Snapshot) {
        if let Some(line) = self.changed_line(surface, &snapshot) {
            println!("{line}");
        }
    }
}

/// Print the current state of every surface, including the submitted inputs
async fn print_status<G, R>(orchestrator: &Orchestrator<G, R>, api_base: &str)
where
    G: Gateway,
    R: RenderSink,
{
    for surface in Surface::ALL {
        let snapshot = orchestrator.snapshot(surface).await;
        println!("{}", format_snapshot(&snapshot, api_base));
        if let Some(features) = snapshot.as_predict().and_then(|v| v.features.as_ref()) {
            let inputs: Vec<String> = features.iter().map(|(k, v)| format!("{k}={v}")).collect();
            println!("[predict] inputs: {}", inputs.join(" "));
        }
    }
}

/// Read commands from stdin until `quit` or end of input
pub async fn run<G, R>(orchestrator: Arc<Orchestrator<G, R>>, api_base: &str) -> std::io::Result<()>
where
    G: Gateway + 'static,
    R: RenderSink + 'static,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = JoinSet::new();
    println!("{HELP}");

    while let Some(line) = lines.next_line().await? {
        while tasks.try_join_next().is_some() {}

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        let orch = Arc::clone(&orchestrator);
        match command {
            Command::Predict(fields) => {
                tasks.spawn(async move {
                    orch.submit_prediction_form(fields).await;
                });
            }
            Command::Advice => {
                tasks.spawn(async move {
                    orch.request_advice().await;
                });
            }
            Command::Chat(question) => {
                tasks.spawn(async move {
                    orch.chat(&question).await;
                });
            }
            Command::Voice(question) => {
                tasks.spawn(async move {
                    orch.voice(&question).await;
                });
            }
            Command::Info => {
                tasks.spawn(async move {
                    match orch.load_model_info().await {
                        Ok(schema) => println!("[info] features: {}", schema.names().join(", ")),
                        Err(e) => println!("[info] {}", e.user_message()),
                    }
                });
            }
            Command::Status => print_status(&orchestrator, api_base).await,
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    // In-flight requests are never cancelled; let them settle.
    while tasks.join_next().await.is_some() {}
    Ok(())
}
