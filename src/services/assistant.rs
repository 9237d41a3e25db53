//! Conversational front for [`RecommendationService`].

use tokio::sync::Mutex;

use crate::{
    models::{fallback::fallback_titles, CatalogItem, ChatMessage, ChatRole},
    services::recommendations::RecommendationService,
};

const FOUND_REPLY: &str = "Here are some titles that fit what you're after.";
const EMPTY_REPLY: &str = "No results found. Try a different prompt.";

pub struct Assistant {
    recommendations: RecommendationService,
    context: Vec<CatalogItem>,
    history: Mutex<Vec<ChatMessage>>,
}

impl Assistant {
    pub fn new(recommendations: RecommendationService) -> Self {
        Self {
            recommendations,
            context: fallback_titles(),
            history: Mutex::new(Vec::new()),
        }
    }

    fn message(role: ChatRole, text: &str, recommendations: Vec<CatalogItem>) -> ChatMessage {
        ChatMessage {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text: text.to_string(),
            recommendations,
        }
    }

    /// Appends the prompt and the model's answer to the conversation.
    ///
    /// A blank prompt is ignored and returns `None`.
    pub async fn ask(&self, prompt: &str) -> Option<ChatMessage> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return None;
        }

        self.history
            .lock()
            .await
            .push(Self::message(ChatRole::User, prompt, Vec::new()));

        let items = self
            .recommendations
            .get_recommendations(prompt, &self.context)
            .await;

        let text = if items.is_empty() { EMPTY_REPLY } else { FOUND_REPLY };
        let reply = Self::message(ChatRole::Model, text, items);

        self.history.lock().await.push(reply.clone());
        Some(reply)
    }

    pub async fn history(&self) -> Vec<ChatMessage> {
        self.history.lock().await.clone()
    }

    pub async fn clear(&self) {
        self.history.lock().await.clear();
    }
}
