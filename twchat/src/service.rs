//! The tool-calling orchestration loop.
//!
//! Each round walks GENERATE, STREAMING, PARSE, then either DONE or
//! DISPATCHING and APPEND before looping back. Tool failures are data in the
//! transcript; only the loop's own failures (round budget, cancellation,
//! model invocation, generation deadline) end a run with a [`ChatError`].
//!
//! ```rust
//! use std::time::Duration;
//! use twchat::ChatPolicy;
//!
//! let policy = ChatPolicy::default()
//!     .with_max_rounds(4)
//!     .with_round_timeout(Duration::from_secs(30));
//! assert!(policy.validate().is_ok());
//! assert!(ChatPolicy::default().with_max_rounds(0).validate().is_err());
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use twcommon::with_deadline;
use twprovider::{
    ConversationTurn, ModelProvider, ModelRequest, StopReason, StreamEvent, TokenUsage, ToolCall,
    ToolDefinition,
};
use twtooling::{ToolDispatcher, ToolExecutionContext, ToolRegistry, ToolRuntime};

use crate::{
    CancelHandle, ChatError, ChatSession, ConversationState, Fragment, FragmentObserver,
    LoopContext, LoopOutcome, LoopPhase, LoopRuntimeHooks, NoopLoopRuntimeHooks, RoundOutput,
    ToolCallParser, TurnObserver, parser_for,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatPolicy {
    /// Tool rounds allowed before the run is aborted.
    pub max_rounds: u32,
    /// Deadline for one generation, from opening the stream to its end.
    pub round_timeout: Option<Duration>,
}

impl Default for ChatPolicy {
    fn default() -> Self {
        Self {
            max_rounds: 8,
            round_timeout: None,
        }
    }
}

impl ChatPolicy {
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_round_timeout(mut self, round_timeout: Duration) -> Self {
        self.round_timeout = Some(round_timeout);
        self
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        if self.max_rounds == 0 {
            return Err(ChatError::invalid_request("max_rounds must be at least 1"));
        }

        if self.round_timeout.is_some_and(|limit| limit.is_zero()) {
            return Err(ChatError::invalid_request(
                "round_timeout must be greater than zero",
            ));
        }

        Ok(())
    }
}

#[derive(Clone)]
pub struct ChatService {
    provider: Arc<dyn ModelProvider>,
    tools: Arc<dyn ToolRuntime>,
    parser: Arc<dyn ToolCallParser>,
    policy: ChatPolicy,
    hooks: Arc<dyn LoopRuntimeHooks>,
    fragment_observers: Vec<FragmentObserver>,
    turn_observers: Vec<TurnObserver>,
}

impl ChatService {
    pub fn builder(provider: Arc<dyn ModelProvider>) -> ChatServiceBuilder {
        ChatServiceBuilder::new(provider)
    }

    pub fn policy(&self) -> ChatPolicy {
        self.policy
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.definitions()
    }

    /// Drives `state` until the model answers without calling tools.
    ///
    /// On error the transcript keeps every turn appended before the failure.
    pub async fn run(
        &self,
        session: &ChatSession,
        state: &mut ConversationState,
    ) -> Result<LoopOutcome, ChatError> {
        self.run_with_cancel(session, state, &CancelHandle::new())
            .await
    }

    /// Like [`run`](Self::run), stopping after the current round once `cancel`
    /// is set.
    pub async fn run_with_cancel(
        &self,
        session: &ChatSession,
        state: &mut ConversationState,
        cancel: &CancelHandle,
    ) -> Result<LoopOutcome, ChatError> {
        let started = Instant::now();
        let mut context = LoopContext::new(self.policy.max_rounds, cancel.clone());

        let result = self.drive(session, state, &mut context).await;
        let result = result.map_err(|error| error.with_rounds_completed(context.round_number()));

        match &result {
            Ok(outcome) => {
                self.hooks
                    .on_loop_success(&session.id, outcome.rounds, started.elapsed())
            }
            Err(error) => self
                .hooks
                .on_loop_failure(&session.id, error, started.elapsed()),
        }

        result
    }

    async fn drive(
        &self,
        session: &ChatSession,
        state: &mut ConversationState,
        context: &mut LoopContext,
    ) -> Result<LoopOutcome, ChatError> {
        if state.is_empty() {
            return Err(ChatError::invalid_request(
                "conversation must contain at least one turn",
            ));
        }

        let tools = self.tools.definitions();
        let mut usage = TokenUsage::default();

        loop {
            let round = context.round_number();
            let round_started = Instant::now();

            self.hooks.on_phase(LoopPhase::Generate, &session.id, round);
            let request = build_request(session, state, &tools)?;
            let generation = self.generate_within_deadline(session, request, round).await?;
            usage.accumulate(generation.usage);

            self.hooks.on_phase(LoopPhase::Parse, &session.id, round);
            let parsed = self.parser.parse(generation.output);
            if parsed.is_terminal() {
                let answer = ConversationTurn::assistant(parsed.remainder.clone(), Vec::new());
                self.append(state, answer);
                self.hooks.on_phase(LoopPhase::Done, &session.id, round);
                return Ok(LoopOutcome {
                    final_answer: parsed.remainder,
                    rounds: round,
                    stop_reason: generation.stop_reason,
                    usage,
                });
            }

            let call_count = parsed.calls.len();
            self.append(
                state,
                ConversationTurn::assistant(parsed.remainder, parsed.calls.clone()),
            );

            self.hooks.on_phase(LoopPhase::Dispatching, &session.id, round);
            let results = self
                .tools
                .dispatch_all(parsed.calls, tool_context(session, round))
                .await;

            self.hooks.on_phase(LoopPhase::Append, &session.id, round);
            self.append(state, ConversationTurn::tool(results));
            context.advance();
            self.hooks
                .on_round_complete(&session.id, round, call_count, round_started.elapsed());

            if context.is_exhausted() {
                self.hooks.on_phase(LoopPhase::Aborted, &session.id, round);
                return Err(ChatError::round_limit_exceeded(format!(
                    "no final answer within {} rounds",
                    context.max_rounds()
                )));
            }

            if context.is_cancelled() {
                self.hooks.on_phase(LoopPhase::Aborted, &session.id, round);
                return Err(ChatError::cancelled("run cancelled by caller"));
            }
        }
    }

    async fn generate_within_deadline(
        &self,
        session: &ChatSession,
        request: ModelRequest,
        round: u32,
    ) -> Result<Generation, ChatError> {
        let generation = self.generate(session, request, round);
        match self.policy.round_timeout {
            Some(limit) => with_deadline(generation, limit).await.unwrap_or_else(|| {
                Err(ChatError::generation_timeout(format!(
                    "generation in round {round} exceeded {}ms",
                    limit.as_millis()
                )))
            }),
            None => generation.await,
        }
    }

    async fn generate(
        &self,
        session: &ChatSession,
        request: ModelRequest,
        round: u32,
    ) -> Result<Generation, ChatError> {
        let mut stream = self.provider.stream(request).await?;
        self.hooks.on_phase(LoopPhase::Streaming, &session.id, round);

        let mut text = String::new();
        let mut calls = Vec::new();
        let mut stop_reason = StopReason::Other;
        let mut usage = TokenUsage::default();

        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::TextDelta(delta) => self.emit_fragment(&mut text, delta, round),
                StreamEvent::ToolCallDelta(call) => merge_call(&mut calls, call),
                StreamEvent::ResponseComplete(response) => {
                    let final_text = response.text();
                    if text.is_empty() && !final_text.is_empty() {
                        self.emit_fragment(&mut text, final_text, round);
                    }

                    merge_final_calls(&mut calls, response.tool_calls());
                    stop_reason = response.stop_reason;
                    usage = response.usage;
                }
            }
        }

        Ok(Generation {
            output: RoundOutput {
                round,
                text,
                structured_calls: calls,
            },
            stop_reason,
            usage,
        })
    }

    fn emit_fragment(&self, text: &mut String, delta: String, round: u32) {
        let fragment = Fragment { text: delta, round };
        for observer in &self.fragment_observers {
            observer(&fragment);
        }
        text.push_str(&fragment.text);
    }

    fn append(&self, state: &mut ConversationState, turn: ConversationTurn) {
        let turn = state.append(turn);
        for observer in &self.turn_observers {
            observer(turn);
        }
    }
}

pub struct ChatServiceBuilder {
    provider: Arc<dyn ModelProvider>,
    tools: Arc<dyn ToolRuntime>,
    parser: Option<Arc<dyn ToolCallParser>>,
    policy: ChatPolicy,
    hooks: Arc<dyn LoopRuntimeHooks>,
    fragment_observers: Vec<FragmentObserver>,
    turn_observers: Vec<TurnObserver>,
}

impl ChatServiceBuilder {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            tools: Arc::new(ToolDispatcher::default()),
            parser: None,
            policy: ChatPolicy::default(),
            hooks: Arc::new(NoopLoopRuntimeHooks),
            fragment_observers: Vec::new(),
            turn_observers: Vec::new(),
        }
    }

    pub fn tool_runtime(mut self, tools: Arc<dyn ToolRuntime>) -> Self {
        self.tools = tools;
        self
    }

    /// Dispatches through a default-policy [`ToolDispatcher`] over `registry`.
    pub fn registry(self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_runtime(Arc::new(ToolDispatcher::new(registry)))
    }

    pub fn policy(mut self, policy: ChatPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn max_rounds(mut self, max_rounds: u32) -> Self {
        self.policy.max_rounds = max_rounds;
        self
    }

    pub fn round_timeout(mut self, round_timeout: Duration) -> Self {
        self.policy.round_timeout = Some(round_timeout);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn LoopRuntimeHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Overrides the parser otherwise chosen from the provider's call framing.
    pub fn parser(mut self, parser: Arc<dyn ToolCallParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn fragment_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&Fragment) + Send + Sync + 'static,
    {
        self.fragment_observers.push(Arc::new(observer));
        self
    }

    pub fn turn_observer(mut self, observer: TurnObserver) -> Self {
        self.turn_observers.push(observer);
        self
    }

    pub fn build(self) -> Result<ChatService, ChatError> {
        self.policy.validate()?;

        let parser = self
            .parser
            .unwrap_or_else(|| parser_for(self.provider.call_framing()));

        Ok(ChatService {
            provider: self.provider,
            tools: self.tools,
            parser,
            policy: self.policy,
            hooks: self.hooks,
            fragment_observers: self.fragment_observers,
            turn_observers: self.turn_observers,
        })
    }
}

struct Generation {
    output: RoundOutput,
    stop_reason: StopReason,
    usage: TokenUsage,
}

fn build_request(
    session: &ChatSession,
    state: &ConversationState,
    tools: &[ToolDefinition],
) -> Result<ModelRequest, ChatError> {
    let mut builder = ModelRequest::builder(session.model.clone())
        .turns(state.turns().iter().cloned())
        .tools(tools.to_vec())
        .options(session.options);

    if let Some(system_prompt) = &session.system_prompt {
        builder = builder.system_prompt(system_prompt.clone());
    }

    for (key, value) in &session.metadata {
        builder = builder.metadata(key.clone(), value.clone());
    }

    builder
        .build()
        .map_err(|error| ChatError::invalid_request(error.message))
}

fn tool_context(session: &ChatSession, round: u32) -> ToolExecutionContext {
    let mut context = ToolExecutionContext::new(session.id.clone()).with_round(round);
    context.trace_id = session.trace_id.clone();
    context.metadata = session.metadata.clone();
    context
}

// A call repeated by id (streamed delta, then final response) keeps its first
// position and takes the latest payload.
fn merge_call(calls: &mut Vec<ToolCall>, call: ToolCall) {
    if !call.id.is_empty()
        && let Some(existing) = calls.iter_mut().find(|existing| existing.id == call.id)
    {
        *existing = call;
        return;
    }

    calls.push(call);
}

// Final-response calls without an id replace the streamed id-less call at the
// same position among id-less calls, when the names agree.
fn merge_final_calls(calls: &mut Vec<ToolCall>, finals: Vec<ToolCall>) {
    let streamed_anonymous = calls
        .iter()
        .enumerate()
        .filter(|(_, call)| call.id.is_empty())
        .map(|(index, _)| index)
        .collect::<Vec<_>>();
    let mut anonymous_seen = 0;

    for call in finals {
        if !call.id.is_empty() {
            merge_call(calls, call);
            continue;
        }

        let slot = streamed_anonymous
            .get(anonymous_seen)
            .copied()
            .filter(|&index| calls[index].name == call.name);
        anonymous_seen += 1;
        match slot {
            Some(index) => calls[index] = call,
            None => calls.push(call),
        }
    }
}
