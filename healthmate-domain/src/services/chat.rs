use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::entities::chat::{ChatMessage, Topic};
use crate::entities::conversions::{convert_to_domain_chat_message, convert_to_domain_profile};
use crate::entities::profile::HealthProfile;
use crate::services::metrics::bmi_category;
use healthmate_data::gemini::ChatModelTrait;
use healthmate_data::models::chat::{ChatRole, ChatTurn, NewChatMessage};
use healthmate_data::notify::ChatNotifier;
use healthmate_data::repository::{
    ChatRepository, ChatRepositoryTrait, ProfileRepository, ProfileRepositoryTrait,
    RepositoryError,
};

/// Default number of stored exchanges loaded as conversation context
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Keyword sets per topic, tested in enumeration order
///
/// Matching is substring-based and case-insensitive; the first topic whose
/// set matches wins.
const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::Diabetes,
        &["diabetes", "sugar", "blood sugar", "insulin", "glucose"],
    ),
    (
        Topic::BloodPressure,
        &["blood pressure", "bp", "hypertension", "high bp", "low bp"],
    ),
    (
        Topic::Heart,
        &["heart", "cardiac", "chest pain", "heart rate", "pulse"],
    ),
    (
        Topic::Weight,
        &["weight", "obesity", "diet", "exercise", "fitness"],
    ),
    (
        Topic::Medication,
        &["medicine", "medication", "pills", "dawai", "tablet"],
    ),
    (
        Topic::Symptoms,
        &["pain", "fever", "cough", "headache", "dizzy"],
    ),
    (
        Topic::Nutrition,
        &["food", "diet", "nutrition", "khana", "vitamins"],
    ),
    (Topic::Sleep, &["sleep", "insomnia", "neend", "rest"]),
    (
        Topic::MentalHealth,
        &["stress", "anxiety", "depression", "mental", "mood"],
    ),
];

/// Chat service errors
#[derive(Debug, Error)]
pub enum ChatServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// Model collaborator error
    #[error("Model error: {0}")]
    ModelError(String),
}

impl From<RepositoryError> for ChatServiceError {
    fn from(err: RepositoryError) -> Self {
        ChatServiceError::RepositoryError(err.to_string())
    }
}

/// Build the fixed-structure system prompt for the chat assistant
///
/// The instruction block is constant; the profile section lists only fields
/// present on the profile, one labeled line each. Without a profile, a
/// complete-your-profile note is appended instead. Pure and deterministic
/// for identical input.
pub fn build_system_prompt(profile: Option<&HealthProfile>) -> String {
    let mut prompt = String::from(
        "You are HealthMate AI, a compassionate and knowledgeable health assistant. You provide \
         health advice in a bilingual format (English + Roman Urdu) to make healthcare accessible \
         to everyone.\n\n\
         🏥 YOUR ROLE:\n\
         - Provide accurate, evidence-based health information\n\
         - Answer questions about medical reports, symptoms, and general health\n\
         - Give advice in both English and Roman Urdu (Roman Urdu mein jawab dein)\n\
         - Be empathetic and supportive\n\
         - Always include medical disclaimers\n\n\
         ⚠️ IMPORTANT RULES:\n\
         1. Always add this disclaimer: \"⚠️ Disclaimer: Yeh AI advice hai, medical treatment \
         nahi. Apne doctor se zaroor consult karein.\"\n\
         2. Never diagnose serious conditions - always recommend seeing a doctor\n\
         3. For emergencies, immediately advise calling emergency services\n\
         4. Be culturally sensitive and use simple language\n\
         5. Provide actionable, practical advice\n\n\
         📋 RESPONSE FORMAT:\n\
         - Use emojis to make responses friendly\n\
         - Structure answers clearly with bullet points\n\
         - Include both English and Roman Urdu explanations\n\
         - Keep responses concise (under 500 words)\n\n",
    );

    let Some(profile) = profile else {
        prompt.push_str(
            "\n⚠️ Note: User health profile not available. Ask them to complete their profile \
             for personalized advice.\n",
        );
        return prompt;
    };

    prompt.push_str("\n👤 USER'S HEALTH PROFILE:\n");

    if let Some(full_name) = &profile.full_name {
        prompt.push_str(&format!("Name: {}\n", full_name));
    }
    if let Some(age) = profile.age {
        prompt.push_str(&format!("Age: {} years\n", age));
    }
    if let Some(gender) = &profile.gender {
        prompt.push_str(&format!("Gender: {}\n", gender));
    }
    if let Some(blood_group) = &profile.blood_group {
        prompt.push_str(&format!("Blood Group: {}\n", blood_group));
    }
    if let Some(bmi) = profile.bmi {
        prompt.push_str(&format!("BMI: {} ({})\n", bmi, bmi_category(bmi).to_string()));
    }
    if let Some(weight_kg) = profile.weight_kg {
        prompt.push_str(&format!("Weight: {} kg\n", weight_kg));
    }
    if let Some(height_cm) = profile.height_cm {
        prompt.push_str(&format!("Height: {} cm\n", height_cm));
    }

    if let (Some(systolic), Some(diastolic)) = (
        profile.blood_pressure_systolic,
        profile.blood_pressure_diastolic,
    ) {
        prompt.push_str(&format!("Blood Pressure: {}/{} mmHg\n", systolic, diastolic));
    }
    if let Some(heart_rate) = profile.heart_rate {
        prompt.push_str(&format!("Heart Rate: {} BPM\n", heart_rate));
    }
    if let Some(blood_sugar) = profile.blood_sugar {
        prompt.push_str(&format!("Blood Sugar: {} mg/dL\n", blood_sugar));
    }
    if let Some(cholesterol) = profile.cholesterol {
        prompt.push_str(&format!("Cholesterol: {} mg/dL\n", cholesterol));
    }
    if let Some(oxygen_level) = profile.oxygen_level {
        prompt.push_str(&format!("Oxygen Level: {}%\n", oxygen_level));
    }

    if let Some(chronic_diseases) = &profile.chronic_diseases {
        prompt.push_str(&format!("\n🏥 Chronic Diseases: {}\n", chronic_diseases));
    }
    if let Some(allergies) = &profile.allergies {
        prompt.push_str(&format!("⚠️ Allergies: {}\n", allergies));
    }
    if let Some(current_medications) = &profile.current_medications {
        prompt.push_str(&format!("💊 Current Medications: {}\n", current_medications));
    }
    if let Some(past_surgeries) = &profile.past_surgeries {
        prompt.push_str(&format!("🔪 Past Surgeries: {}\n", past_surgeries));
    }
    if let Some(family_history) = &profile.family_history {
        prompt.push_str(&format!("👨‍👩‍👧‍👦 Family History: {}\n", family_history));
    }

    if let Some(primary_goal) = &profile.primary_goal {
        prompt.push_str(&format!("\n🎯 Health Goal: {}\n", primary_goal));
    }
    if let Some(target_weight) = profile.target_weight {
        prompt.push_str(&format!("Target Weight: {} kg\n", target_weight));
    }
    if let Some(activity_level) = &profile.activity_level {
        prompt.push_str(&format!("Activity Level: {}\n", activity_level));
    }
    if let Some(dietary_preferences) = &profile.dietary_preferences {
        prompt.push_str(&format!("Dietary Preferences: {}\n", dietary_preferences));
    }
    if let Some(sleep_hours) = profile.sleep_hours {
        prompt.push_str(&format!("Sleep Hours: {} hours\n", sleep_hours));
    }

    prompt.push_str(
        "\nℹ️ Use this context to personalize your responses. If the user asks about their \
         health, refer to this data.\n",
    );

    prompt
}

/// Classify a message into a topic by keyword matching
///
/// Substring-based and case-insensitive, first match in enumeration order
/// wins; no match is `general`.
pub fn extract_topic(message: &str) -> Topic {
    let lower = message.to_lowercase();

    for (topic, keywords) in TOPIC_KEYWORDS {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            return *topic;
        }
    }

    Topic::General
}

/// Expand stored exchanges into role-tagged turns for the model
///
/// Each stored pair becomes one user turn then one model turn, in
/// chronological order. No truncation is applied here.
pub fn build_history(messages: &[healthmate_data::models::chat::ChatMessage]) -> Vec<ChatTurn> {
    let mut turns = Vec::with_capacity(messages.len() * 2);

    for message in messages {
        turns.push(ChatTurn {
            role: ChatRole::User,
            text: message.user_message.clone(),
        });
        turns.push(ChatTurn {
            role: ChatRole::Model,
            text: message.ai_response.clone(),
        });
    }

    turns
}

/// Trait for chat service operations
#[async_trait]
pub trait ChatServiceTrait: Send + Sync {
    /// Run one exchange: build context, call the model, persist the pair
    async fn send_message(
        &self,
        subject_id: &str,
        message: &str,
    ) -> Result<ChatMessage, ChatServiceError>;

    /// Stored history for a subject in chronological order
    async fn get_history(
        &self,
        subject_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>, ChatServiceError>;

    /// Remove all history for a subject, returning the number removed
    async fn clear_history(&self, subject_id: &str) -> Result<usize, ChatServiceError>;
}

/// Chat service for domain logic
pub struct ChatService<R, P, M>
where
    R: ChatRepositoryTrait,
    P: ProfileRepositoryTrait,
    M: ChatModelTrait,
{
    chat_repository: R,
    profile_repository: P,
    model: M,
    notifier: ChatNotifier,
}

impl<R, P, M> ChatService<R, P, M>
where
    R: ChatRepositoryTrait,
    P: ProfileRepositoryTrait,
    M: ChatModelTrait,
{
    /// Create a new chat service
    pub fn new(chat_repository: R, profile_repository: P, model: M) -> Self {
        Self {
            chat_repository,
            profile_repository,
            model,
            notifier: ChatNotifier::new(),
        }
    }

    /// The notifier observers register with for new-message callbacks
    pub fn notifier(&self) -> &ChatNotifier {
        &self.notifier
    }
}

#[async_trait]
impl<R, P, M> ChatServiceTrait for ChatService<R, P, M>
where
    R: ChatRepositoryTrait + Send + Sync,
    P: ProfileRepositoryTrait + Send + Sync,
    M: ChatModelTrait + Send + Sync,
{
    async fn send_message(
        &self,
        subject_id: &str,
        message: &str,
    ) -> Result<ChatMessage, ChatServiceError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatServiceError::ValidationError(
                "Message cannot be empty".to_string(),
            ));
        }

        let profile = self
            .profile_repository
            .get_by_subject(subject_id)
            .await?
            .map(convert_to_domain_profile);

        let history = self
            .chat_repository
            .history(subject_id, Some(DEFAULT_HISTORY_LIMIT))
            .await?;

        let system_prompt = build_system_prompt(profile.as_ref());
        let turns = build_history(&history);

        debug!(
            "Sending chat message for subject {} with {} history turns",
            subject_id,
            turns.len()
        );

        let reply = self
            .model
            .generate_reply(&system_prompt, &turns, message)
            .await
            .map_err(|e| ChatServiceError::ModelError(e.to_string()))?;

        let topic = extract_topic(message);

        let saved = self
            .chat_repository
            .insert(NewChatMessage {
                subject_id: subject_id.to_string(),
                user_message: message.to_string(),
                ai_response: reply,
                topic: Some(topic.as_str().to_string()),
            })
            .await?;

        self.notifier.publish(&saved);

        Ok(convert_to_domain_chat_message(saved))
    }

    async fn get_history(
        &self,
        subject_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ChatMessage>, ChatServiceError> {
        let messages = self
            .chat_repository
            .history(subject_id, limit.or(Some(DEFAULT_HISTORY_LIMIT)))
            .await?;

        Ok(messages
            .into_iter()
            .map(convert_to_domain_chat_message)
            .collect())
    }

    async fn clear_history(&self, subject_id: &str) -> Result<usize, ChatServiceError> {
        Ok(self.chat_repository.clear(subject_id).await?)
    }
}

/// Create a chat service backed by the default repositories and a Gemini
/// client configured from the environment
pub fn create_default_chat_service(
) -> ChatService<ChatRepository, ProfileRepository, healthmate_data::gemini::GeminiClient> {
    ChatService::new(
        ChatRepository::new(),
        ProfileRepository::new(),
        healthmate_data::gemini::GeminiClient::from_env(),
    )
}

/// Create a chat service over memory-only repositories and a canned model
#[cfg(feature = "mock")]
pub fn create_mock_chat_service() -> ChatService<
    healthmate_data::repository::MockChatRepository,
    healthmate_data::repository::MockProfileRepository,
    healthmate_data::gemini::mock::MockChatModel,
> {
    ChatService::new(
        healthmate_data::repository::MockChatRepository::new(),
        healthmate_data::repository::MockProfileRepository::new(),
        healthmate_data::gemini::mock::MockChatModel::new()
            .with_reply("Shukriya! Here is some general advice."),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use healthmate_data::gemini::mock::MockChatModel;
    use healthmate_data::repository::{MockChatRepository, MockProfileRepository};

    fn profile_with_age_and_bmi() -> HealthProfile {
        HealthProfile {
            id: "p-1".to_string(),
            subject_id: "subj-1".to_string(),
            full_name: None,
            age: Some(34),
            gender: None,
            blood_group: None,
            height_cm: None,
            weight_kg: None,
            bmi: Some(27.4),
            chronic_diseases: None,
            allergies: None,
            current_medications: None,
            past_surgeries: None,
            family_history: None,
            blood_pressure_systolic: None,
            blood_pressure_diastolic: None,
            heart_rate: None,
            blood_sugar: None,
            cholesterol: None,
            oxygen_level: None,
            primary_goal: None,
            target_weight: None,
            activity_level: None,
            dietary_preferences: None,
            sleep_hours: None,
            created_at: "2026-08-01T00:00:00Z".to_string(),
            updated_at: "2026-08-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn prompt_lists_only_present_fields() {
        let prompt = build_system_prompt(Some(&profile_with_age_and_bmi()));

        assert!(prompt.contains("Age: 34 years"));
        assert!(prompt.contains("BMI: 27.4 (Overweight)"));
        // Absent fields are omitted entirely, not rendered blank
        assert!(!prompt.contains("Name:"));
        assert!(!prompt.contains("Blood Pressure:"));
        assert!(!prompt.contains("Sleep Hours:"));
    }

    #[test]
    fn prompt_without_profile_asks_for_completion() {
        let prompt = build_system_prompt(None);

        assert!(prompt.contains("User health profile not available"));
        assert!(!prompt.contains("USER'S HEALTH PROFILE"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let profile = profile_with_age_and_bmi();
        assert_eq!(
            build_system_prompt(Some(&profile)),
            build_system_prompt(Some(&profile))
        );
    }

    #[test]
    fn topics_match_by_substring_in_priority_order() {
        assert_eq!(
            extract_topic("Meri blood sugar control kaise karein?"),
            Topic::Diabetes
        );
        assert_eq!(extract_topic("I can't sleep well"), Topic::Sleep);
        assert_eq!(extract_topic("hello"), Topic::General);
        // "diet" appears in both the weight and nutrition sets; weight wins
        // by enumeration order
        assert_eq!(extract_topic("best diet plan?"), Topic::Weight);
        // Substring matching is deliberately permissive
        assert_eq!(extract_topic("my bpm reading"), Topic::BloodPressure);
    }

    #[test]
    fn history_expands_pairs_into_alternating_turns() {
        let messages = vec![
            healthmate_data::models::chat::ChatMessage {
                id: "m-1".to_string(),
                subject_id: "subj-1".to_string(),
                user_message: "q1".to_string(),
                ai_response: "a1".to_string(),
                topic: None,
                created_at: "2026-08-01T09:00:00Z".to_string(),
            },
            healthmate_data::models::chat::ChatMessage {
                id: "m-2".to_string(),
                subject_id: "subj-1".to_string(),
                user_message: "q2".to_string(),
                ai_response: "a2".to_string(),
                topic: None,
                created_at: "2026-08-01T09:05:00Z".to_string(),
            },
        ];

        let turns = build_history(&messages);

        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, ChatRole::User);
        assert_eq!(turns[0].text, "q1");
        assert_eq!(turns[1].role, ChatRole::Model);
        assert_eq!(turns[1].text, "a1");
        assert_eq!(turns[2].role, ChatRole::User);
        assert_eq!(turns[3].role, ChatRole::Model);
    }

    #[tokio::test]
    async fn send_message_persists_the_pair_and_notifies() {
        let service = ChatService::new(
            MockChatRepository::new(),
            MockProfileRepository::new(),
            MockChatModel::new().with_reply("Paani zyada piyein."),
        );

        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        service.notifier().subscribe(
            "subj-1",
            Box::new(move |_| {
                seen_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        let exchange = service
            .send_message("subj-1", "How much water should I drink?")
            .await
            .unwrap();

        assert_eq!(exchange.ai_response, "Paani zyada piyein.");
        assert_eq!(exchange.topic, Topic::General);
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        let history = service.get_history("subj-1", None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user_message, "How much water should I drink?");
    }

    #[tokio::test]
    async fn model_failure_persists_nothing() {
        let service = ChatService::new(
            MockChatRepository::new(),
            MockProfileRepository::new(),
            MockChatModel::new().with_failure(),
        );

        let err = service.send_message("subj-1", "hello").await.unwrap_err();
        assert!(matches!(err, ChatServiceError::ModelError(_)));

        let history = service.get_history("subj-1", None).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let service = ChatService::new(
            MockChatRepository::new(),
            MockProfileRepository::new(),
            MockChatModel::new().with_reply("ok"),
        );

        let err = service.send_message("subj-1", "   ").await.unwrap_err();
        assert!(matches!(err, ChatServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn clear_history_removes_everything_for_the_subject() {
        let service = ChatService::new(
            MockChatRepository::new(),
            MockProfileRepository::new(),
            MockChatModel::new().with_reply("ok"),
        );

        service.send_message("subj-1", "one").await.unwrap();
        service.send_message("subj-1", "two").await.unwrap();

        let removed = service.clear_history("subj-1").await.unwrap();
        assert_eq!(removed, 2);
        assert!(service.get_history("subj-1", None).await.unwrap().is_empty());
    }
}
