//! Prompt construction for the two questions the guide asks, and the calls that carry them.

use crate::provider::{GenerateRequest, Message, Provider};
use chrono::NaiveDate;
use std::sync::Arc;

pub const TRAVEL_OPTIONS_SYSTEM: &str = "You are an AI-powered travel assistant. Provide multiple travel options (cab, train, bus, flight) with \
estimated costs, duration, and relevant travel tips. Also, consider travel date for availability and \
price fluctuations. Suggest top tourist attractions and travel tips too.";

pub const DESTINATION_FACTS_SYSTEM: &str = "You are an AI expert in geography and travel. Provide detailed information on what makes a location famous. \
Include historical significance, cultural highlights, food specialties, landmarks, and unique aspects. \
The response should be structured with headings like 'Features', 'History', and 'Examples'.";

pub const NO_TRAVEL_RESPONSE: &str = "⚠️ No response from AI.";
pub const NO_DESTINATION_INFO: &str = "⚠️ No information available.";

const TRAVEL_FAILURE: &str = "❌ Error fetching travel options";
const DESTINATION_FAILURE: &str = "❌ Error fetching destination details";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelQuery {
    pub source: String,
    pub destination: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    pub fn into_messages(self) -> Vec<Message> {
        vec![Message::system(self.system), Message::user(self.user)]
    }
}

pub fn travel_options_prompt(query: &TravelQuery) -> PromptPair {
    PromptPair {
        system: TRAVEL_OPTIONS_SYSTEM.to_string(),
        user: format!(
            "I am traveling from {} to {} on {}.\nSuggest travel options with estimated cost, duration, and important details.",
            query.source,
            query.destination,
            query.date.format("%Y-%m-%d")
        ),
    }
}

pub fn destination_facts_prompt(destination: &str) -> PromptPair {
    PromptPair {
        system: DESTINATION_FACTS_SYSTEM.to_string(),
        user: format!("What is famous in {destination}?"),
    }
}

/// Sends the guide's prompts to a provider and turns every outcome into display text.
#[derive(Clone)]
pub struct TravelGuide {
    provider: Arc<dyn Provider + Send + Sync>,
    model: String,
}

impl TravelGuide {
    pub fn new(provider: Arc<dyn Provider + Send + Sync>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn travel_options(&self, query: &TravelQuery) -> String {
        self.ask(travel_options_prompt(query), NO_TRAVEL_RESPONSE, TRAVEL_FAILURE)
            .await
    }

    pub async fn destination_facts(&self, destination: &str) -> String {
        self.ask(destination_facts_prompt(destination), NO_DESTINATION_INFO, DESTINATION_FAILURE)
            .await
    }

    async fn ask(&self, prompt: PromptPair, empty: &str, failure: &str) -> String {
        let req = GenerateRequest {
            model: self.model.clone(),
            messages: prompt.into_messages(),
        };

        match self.provider.generate(req).await {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::debug!(provider = self.provider.name(), "empty response");
                empty.to_string()
            }
            Err(e) => {
                tracing::debug!(provider = self.provider.name(), error = %e, "generate failed");
                format!("{failure}: {e}")
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Reply, ScriptedProvider};
    use super::*;
    use crate::provider::Role;

    fn query(source: &str, destination: &str, date: NaiveDate) -> TravelQuery {
        TravelQuery {
            source: source.to_string(),
            destination: destination.to_string(),
            date,
        }
    }

    fn june_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn travel_prompt_interpolates_all_fields() {
        let p = travel_options_prompt(&query("Hyderabad", "Durgi", june_first()));
        assert_eq!(p.system, TRAVEL_OPTIONS_SYSTEM);
        assert!(p.user.contains("from Hyderabad to Durgi on 2025-06-01"));
    }

    #[test]
    fn facts_prompt_depends_only_on_destination() {
        let a = destination_facts_prompt(&query("Hyderabad", "Durgi", june_first()).destination);
        let b = destination_facts_prompt(
            &query("Chennai", "Durgi", NaiveDate::from_ymd_opt(2031, 1, 9).unwrap()).destination,
        );
        assert_eq!(a, b);
        assert_eq!(a.user, "What is famous in Durgi?");
        assert!(a.system.contains("'Features', 'History', and 'Examples'"));
    }

    #[test]
    fn prompt_pair_orders_system_before_user() {
        let msgs = destination_facts_prompt("Paris").into_messages();
        let roles: Vec<Role> = msgs.iter().map(|m| m.role).collect();
        assert_eq!(roles, [Role::System, Role::User]);
    }

    #[tokio::test]
    async fn returns_model_text_verbatim() {
        let provider = ScriptedProvider::new([Reply::Text("Option A: Flight, $50, 2h")]);
        let guide = TravelGuide::new(Arc::new(provider.clone()), "gemini-1.5-pro");

        let text = guide.travel_options(&query("Hyderabad", "Durgi", june_first())).await;
        assert_eq!(text, "Option A: Flight, $50, 2h");

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "gemini-1.5-pro");
    }

    #[tokio::test]
    async fn empty_responses_use_fixed_warnings() {
        let provider = ScriptedProvider::new([Reply::Empty, Reply::Text("   ")]);
        let guide = TravelGuide::new(Arc::new(provider), "m");

        assert_eq!(guide.travel_options(&query("A", "B", june_first())).await, NO_TRAVEL_RESPONSE);
        assert_eq!(guide.destination_facts("B").await, NO_DESTINATION_INFO);
    }

    #[tokio::test]
    async fn failures_become_error_text() {
        let provider = ScriptedProvider::new([Reply::Fail("quota exhausted"), Reply::Fail("quota exhausted")]);
        let guide = TravelGuide::new(Arc::new(provider), "m");

        let travel = guide.travel_options(&query("A", "B", june_first())).await;
        assert_eq!(travel, "❌ Error fetching travel options: API error (HTTP 403): quota exhausted");

        let facts = guide.destination_facts("B").await;
        assert!(facts.starts_with("❌ Error fetching destination details: "));
        assert!(facts.contains("quota exhausted"));
    }
}
