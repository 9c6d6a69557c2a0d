//! The conversational session state machine.
//!
//! A [`ChatSession`] comes into existence already `Ready`: constructing one
//! (the `Uninitialized → Ready` transition) binds a generator and awaits its
//! load. `ask` loops on `Ready`, `reset` empties the transcript without
//! touching the binding, and there is no terminal state.

use super::message::{ConversationTurn, TurnRole};
use crate::dataset::DatasetSchema;
use crate::error::Result;
use crate::generate::{GenerateOptions, TextGenerator};
use std::sync::Arc;
use uuid::Uuid;

/// Rough token estimate used when trimming history to the context window.
const CHARS_PER_TOKEN: usize = 4;

/// A stateful conversation bound to one generator.
///
/// The transcript grows strictly in call order; `&mut self` on [`ask`]
/// guarantees at most one ask is in flight per session.
///
/// [`ask`]: ChatSession::ask
pub struct ChatSession {
    id: String,
    transcript: Vec<ConversationTurn>,
    generator: Arc<dyn TextGenerator>,
    options: GenerateOptions,
}

impl ChatSession {
    /// Binds a generator and transitions the session to `Ready`.
    ///
    /// Awaits the generator's (idempotent) load so a session is never handed
    /// out with an unusable model.
    ///
    /// # Errors
    ///
    /// Propagates [`TabulaError::ModelLoad`](crate::TabulaError::ModelLoad);
    /// no session is constructed in that case.
    pub async fn bind(generator: Arc<dyn TextGenerator>, options: GenerateOptions) -> Result<Self> {
        generator.load().await?;
        let session = Self {
            id: Uuid::new_v4().to_string(),
            transcript: Vec::new(),
            generator,
            options,
        };
        tracing::info!(session_id = %session.id, "chat session ready");
        Ok(session)
    }

    /// Asks a question about the dataset described by `schema`.
    ///
    /// The prompt sent to the generator is the retained history (oldest
    /// turns dropped first when the context window budget is exceeded)
    /// followed by a schema line listing the dataset's columns and the
    /// literal question. On success the question and the response are
    /// appended to the transcript, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`TabulaError::Inference`](crate::TabulaError::Inference) on
    /// generation failure. The transcript is left exactly as it was: no
    /// partial turn is ever recorded.
    pub async fn ask(&mut self, question: &str, schema: &DatasetSchema) -> Result<String> {
        let prompt = build_prompt(&self.transcript, schema, question, &self.options);
        tracing::debug!(
            session_id = %self.id,
            prompt_chars = prompt.len(),
            "sending prompt to generator"
        );

        let response = self.generator.generate(&prompt, &self.options).await?;

        self.transcript
            .push(ConversationTurn::now(TurnRole::User, question));
        self.transcript
            .push(ConversationTurn::now(TurnRole::Assistant, response.clone()));
        Ok(response)
    }

    /// Empties the transcript. The generator binding is retained, so no
    /// model reload happens on the next ask.
    pub fn reset(&mut self) {
        tracing::info!(session_id = %self.id, turns = self.transcript.len(), "transcript cleared");
        self.transcript.clear();
    }

    /// The ordered transcript so far.
    pub fn transcript(&self) -> &[ConversationTurn] {
        &self.transcript
    }

    /// Unique id of this session, for log correlation.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Builds the full generation prompt: retained history, schema hint,
/// question, and the assistant cue.
fn build_prompt(
    transcript: &[ConversationTurn],
    schema: &DatasetSchema,
    question: &str,
    options: &GenerateOptions,
) -> String {
    let current = format!("{}\nQuestion: {}\nAI:", schema.prompt_line(), question);

    let budget_chars = (options.context_window as usize).saturating_mul(CHARS_PER_TOKEN);
    let mut remaining = budget_chars.saturating_sub(current.len());

    // Keep the newest turns that fit, then restore chronological order.
    let mut kept: Vec<String> = Vec::new();
    for turn in transcript.iter().rev() {
        let line = match turn.role {
            TurnRole::User => format!("Human: {}", turn.content),
            TurnRole::Assistant => format!("AI: {}", turn.content),
        };
        if line.len() + 1 > remaining {
            break;
        }
        remaining -= line.len() + 1;
        kept.push(line);
    }
    kept.reverse();

    if kept.is_empty() {
        current
    } else {
        format!("{}\n{}", kept.join("\n"), current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{ColumnType, DatasetSchema, FieldDescriptor};
    use crate::error::TabulaError;
    use crate::generate::GenerateOptions;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct MockGenerator {
        load_count: AtomicUsize,
        prompts: Mutex<Vec<String>>,
        fail_next: AtomicBool,
    }

    impl MockGenerator {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                load_count: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                fail_next: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for MockGenerator {
        async fn load(&self) -> Result<()> {
            self.load_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn generate(&self, prompt: &str, _options: &GenerateOptions) -> Result<String> {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(TabulaError::inference("context overflow"));
            }
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(format!("answer #{}", self.prompts.lock().unwrap().len()))
        }
    }

    fn schema() -> DatasetSchema {
        DatasetSchema::new(vec![
            FieldDescriptor {
                name: "region".to_string(),
                column_type: ColumnType::Text,
            },
            FieldDescriptor {
                name: "sales".to_string(),
                column_type: ColumnType::Integer,
            },
        ])
    }

    #[tokio::test]
    async fn test_prompt_contains_schema_line_then_question() {
        let generator = MockGenerator::new();
        let mut session = ChatSession::bind(generator.clone(), GenerateOptions::default())
            .await
            .unwrap();

        session
            .ask("What's the average sales?", &schema())
            .await
            .unwrap();

        let prompts = generator.prompts.lock().unwrap();
        let schema_at = prompts[0].find("Dataset columns: region, sales.").unwrap();
        let question_at = prompts[0].find("What's the average sales?").unwrap();
        assert!(schema_at < question_at);
    }

    #[tokio::test]
    async fn test_transcript_grows_by_two_per_ask_in_call_order() {
        let generator = MockGenerator::new();
        let mut session = ChatSession::bind(generator, GenerateOptions::default())
            .await
            .unwrap();

        for i in 0..3 {
            session.ask(&format!("q{i}"), &schema()).await.unwrap();
        }

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 6);
        for i in 0..3 {
            assert_eq!(transcript[2 * i].role, TurnRole::User);
            assert_eq!(transcript[2 * i].content, format!("q{i}"));
            assert_eq!(transcript[2 * i + 1].role, TurnRole::Assistant);
        }
    }

    #[tokio::test]
    async fn test_prior_turns_are_supplied_as_context() {
        let generator = MockGenerator::new();
        let mut session = ChatSession::bind(generator.clone(), GenerateOptions::default())
            .await
            .unwrap();

        session.ask("first question", &schema()).await.unwrap();
        session.ask("second question", &schema()).await.unwrap();

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[1].contains("Human: first question"));
        assert!(prompts[1].contains("AI: answer #1"));
    }

    #[tokio::test]
    async fn test_failed_generate_records_no_partial_turn() {
        let generator = MockGenerator::new();
        let mut session = ChatSession::bind(generator.clone(), GenerateOptions::default())
            .await
            .unwrap();

        session.ask("ok", &schema()).await.unwrap();
        generator.fail_next.store(true, Ordering::SeqCst);

        let err = session.ask("boom", &schema()).await.unwrap_err();
        assert!(err.is_inference());
        assert_eq!(session.transcript().len(), 2);

        // Session stays ready.
        session.ask("still works", &schema()).await.unwrap();
        assert_eq!(session.transcript().len(), 4);
    }

    #[tokio::test]
    async fn test_reset_clears_transcript_without_reload() {
        let generator = MockGenerator::new();
        let mut session = ChatSession::bind(generator.clone(), GenerateOptions::default())
            .await
            .unwrap();

        session.ask("before reset", &schema()).await.unwrap();
        session.reset();
        assert!(session.transcript().is_empty());

        session.ask("after reset", &schema()).await.unwrap();
        assert_eq!(generator.load_count.load(Ordering::SeqCst), 1);
        // History from before the reset must not leak into the context.
        let prompts = generator.prompts.lock().unwrap();
        assert!(!prompts[1].contains("before reset"));
    }

    #[tokio::test]
    async fn test_history_is_trimmed_oldest_first() {
        let generator = MockGenerator::new();
        let options = GenerateOptions {
            // ~100 chars of budget: enough for the current prompt and the
            // most recent exchanges, not for everything.
            context_window: 25,
            ..GenerateOptions::default()
        };
        let mut session = ChatSession::bind(generator.clone(), options).await.unwrap();

        session
            .ask("oldest question with plenty of characters", &schema())
            .await
            .unwrap();
        session.ask("recent", &schema()).await.unwrap();
        session.ask("now", &schema()).await.unwrap();

        let prompts = generator.prompts.lock().unwrap();
        let last = prompts.last().unwrap();
        assert!(last.contains("Question: now"));
        assert!(!last.contains("oldest question"));
    }
}
