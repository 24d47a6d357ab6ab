//! Session orchestration for the GhostChat widget.
//!
//! A `ChatSession` owns everything the host renderer needs: the resolved
//! tier, the enforced configuration, the context corpus, and the
//! conversation log. Startup is license gate → tier enforcement → context
//! pipeline; after that, `send` appends the user's message, dispatches to
//! the selected provider, and appends either the reply or a user-readable
//! failure message. No failure is fatal to the session and nothing is
//! retried automatically — the user resends if they want a retry.

use ghostchat_config::{enforce, WidgetConfig};
use ghostchat_context::{ContextPipeline, HttpFetcher};
use ghostchat_core::error::ProviderError;
use ghostchat_core::message::{Conversation, Message, Role};
use ghostchat_core::provider::ProviderRequest;
use ghostchat_core::selector::ProviderSelector;
use ghostchat_core::Tier;
use ghostchat_license::{LicenseGate, LicenseStatus};
use ghostchat_providers::ProviderRouter;
use tracing::{info, warn};

const CONTEXT_PREFIX: &str = "Context information:\n\n";
const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// One widget session: immutable tier, enforced config, optional context
/// corpus, and an append-only conversation.
pub struct ChatSession {
    config: WidgetConfig,
    tier: Tier,
    license_valid: bool,
    selector: ProviderSelector,
    router: ProviderRouter,
    context: Option<String>,
    conversation: Conversation,
}

impl ChatSession {
    /// Start a session: resolve the license (one round trip at most),
    /// narrow the configuration to the resolved tier, and — if a context
    /// mode and URL survive enforcement — run the context pipeline to
    /// completion. License and context failures degrade features silently;
    /// this constructor cannot fail.
    pub async fn initialize(config: WidgetConfig) -> Self {
        let gate = LicenseGate::new(config.license_api_url.as_deref());
        let status = gate.resolve(config.license_key.as_deref()).await;

        let config = enforce(config, status.tier);

        let context = match (config.context_mode, config.context_url.as_deref()) {
            (Some(mode), Some(url)) => {
                let mut pipeline = ContextPipeline::new(HttpFetcher::new());
                pipeline.load(mode, url).await;
                // None on failure: the session simply runs without context
                pipeline.corpus().map(str::to_string)
            }
            _ => None,
        };

        Self::assemble(config, status, context)
    }

    fn assemble(config: WidgetConfig, status: LicenseStatus, context: Option<String>) -> Self {
        let selector = ProviderSelector::parse(&config.provider);
        let router = ProviderRouter::new(config.api_key.as_deref());

        info!(
            tier = %status.tier,
            provider = %selector,
            has_context = context.is_some(),
            "Session initialized"
        );

        Self {
            config,
            tier: status.tier,
            license_valid: status.valid,
            selector,
            router,
            context,
            conversation: Conversation::new(),
        }
    }

    /// Send a user message and get the assistant reply appended to the
    /// conversation. Provider failures come back as distinct user-readable
    /// assistant messages; the session stays usable either way.
    pub async fn send(&mut self, text: impl Into<String>) -> &Message {
        self.conversation.push(Message::user(text));

        let reply = self.request_reply().await;
        self.conversation.push(Message::assistant(reply));

        self.conversation
            .last()
            .expect("conversation cannot be empty after push")
    }

    async fn request_reply(&self) -> String {
        // No credential: the canned-response path, never a network adapter.
        if !self.config.has_api_key() {
            let request = ProviderRequest::new("offline", self.outgoing_messages());
            return match self.router.offline().complete(request).await {
                Ok(reply) => reply.message.content,
                Err(e) => failure_reply(&e),
            };
        }

        let (provider, model) = match self.router.dispatch(&self.selector) {
            Ok(routed) => routed,
            Err(e) => return failure_reply(&e),
        };

        let request = ProviderRequest::new(model, self.outgoing_messages());
        match provider.complete(request).await {
            Ok(reply) => reply.message.content,
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "Provider request failed");
                failure_reply(&e)
            }
        }
    }

    /// Assemble the outgoing message list: one system message (context
    /// corpus prefixed with a fixed instruction, if present), then the
    /// conversation including the just-appended user message.
    fn outgoing_messages(&self) -> Vec<Message> {
        let mut system = String::new();
        if let Some(ref corpus) = self.context {
            system.push_str(CONTEXT_PREFIX);
            system.push_str(corpus);
            system.push_str("\n\n");
        }
        system.push_str(SYSTEM_PROMPT);

        let mut messages = vec![Message::system(system)];
        messages.extend(
            self.conversation
                .messages
                .iter()
                .filter(|m| m.role != Role::System)
                .cloned(),
        );
        messages
    }

    // --- accessors for the host renderer ---

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn license_valid(&self) -> bool {
        self.license_valid
    }

    /// The enforced configuration (theme, presentation strings, etc.).
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

/// Map a provider failure to the user-visible assistant text for it.
/// Each failure class reads differently so the user can tell a credential
/// problem from a connectivity problem.
fn failure_reply(error: &ProviderError) -> String {
    match error {
        ProviderError::AuthenticationFailed(_) => {
            "Sorry, there seems to be an authentication issue. \
             Please check your API key configuration."
                .into()
        }
        ProviderError::RateLimited => {
            "I'm receiving too many requests right now. \
             Please wait a moment and try again."
                .into()
        }
        ProviderError::ApiError { .. } => {
            "I'm having trouble connecting right now. Please try again later.".into()
        }
        ProviderError::ParseFailure(_) => {
            "I apologize, but I encountered an error processing the response. \
             Please try again."
                .into()
        }
        ProviderError::Network(_) => {
            "Unable to connect to the AI service. \
             Please check your internet connection."
                .into()
        }
        ProviderError::NotImplemented(selector) => {
            format!("Provider not yet implemented: {selector}")
        }
    }
}
