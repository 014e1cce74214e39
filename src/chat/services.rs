use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::repo_types::ChatMessage;
use crate::error::ApiError;
use crate::state::AppState;

const SYSTEM_PROMPT: &str = "You are a friendly fitness assistant. Answer questions about \
     training, nutrition and recovery in short, practical replies. Recommend consulting a \
     professional for medical concerns.";

const FALLBACK_WORKOUT: &str = "For a balanced routine, aim for 3-4 workouts a week mixing \
     compound lifts with accessory work, and leave at least one rest day between sessions \
     that hit the same muscle group.";
const FALLBACK_DIET: &str = "Focus on whole foods: lean protein with every meal, plenty of \
     vegetables, and carbohydrates timed around your training. Logging what you eat is the \
     fastest way to spot gaps.";
const FALLBACK_PROTEIN: &str = "A common target is 1.6-2.2 g of protein per kilogram of \
     bodyweight per day, spread over 3-5 meals.";
const FALLBACK_CARDIO: &str = "Two to three moderate cardio sessions of 20-40 minutes a week \
     support recovery and heart health without cutting into strength gains.";
const FALLBACK_GENERIC: &str = "I can help with workouts, nutrition and goals. Could you tell \
     me a bit more about what you want to achieve?";

/// Static keyword-matched responses used whenever the LLM endpoint is
/// unavailable. Buckets are checked in order; first hit wins.
fn fallback_response(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    if ["workout", "exercise", "training", "lift"]
        .iter()
        .any(|k| lower.contains(k))
    {
        FALLBACK_WORKOUT
    } else if ["diet", "nutrition", "food", "meal", "eat"]
        .iter()
        .any(|k| lower.contains(k))
    {
        FALLBACK_DIET
    } else if lower.contains("protein") {
        FALLBACK_PROTEIN
    } else if ["cardio", "running", "endurance"]
        .iter()
        .any(|k| lower.contains(k))
    {
        FALLBACK_CARDIO
    } else {
        FALLBACK_GENERIC
    }
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

/// Single attempt against the configured OpenAI-compatible endpoint. Any
/// failure (transport, status, shape) yields `None` and the caller falls
/// back; there is deliberately no retry.
async fn ask_assistant(state: &AppState, message: &str) -> Option<String> {
    let assistant = &state.config.assistant;
    if assistant.url.is_empty() {
        return None;
    }

    let body = CompletionRequest {
        model: &assistant.model,
        messages: vec![
            WireMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            },
            WireMessage {
                role: "user",
                content: message,
            },
        ],
    };

    let result = state
        .http
        .post(&assistant.url)
        .bearer_auth(&assistant.api_key)
        .json(&body)
        .send()
        .await;

    let response = match result {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "assistant request failed");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!(status = %response.status(), "assistant returned error status");
        return None;
    }

    let parsed: CompletionResponse = match response.json().await {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "assistant response decode failed");
            return None;
        }
    };

    parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
}

pub async fn send_message(
    state: &AppState,
    user_id: Uuid,
    message: &str,
) -> Result<ChatMessage, ApiError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(ApiError::Validation("Message is required".into()));
    }

    let (response, from_llm) = match ask_assistant(state, message).await {
        Some(r) => (r, true),
        None => (fallback_response(message).to_string(), false),
    };

    // Persisted regardless of which path produced the response.
    let record = ChatMessage::insert(&state.db, user_id, message, &response).await?;
    info!(chat_id = %record.id, %user_id, from_llm, "chat exchange stored");
    Ok(record)
}

pub async fn history(
    state: &AppState,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<ChatMessage>, ApiError> {
    Ok(ChatMessage::list_by_user(&state.db, user_id, limit, offset).await?)
}

pub async fn get_message(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
) -> Result<ChatMessage, ApiError> {
    ChatMessage::find_owned(&state.db, user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chat message not found".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workout_bucket_matches_training_terms() {
        assert_eq!(fallback_response("Suggest a workout plan"), FALLBACK_WORKOUT);
        assert_eq!(fallback_response("best EXERCISE for legs?"), FALLBACK_WORKOUT);
    }

    #[test]
    fn diet_bucket_matches_food_terms() {
        assert_eq!(fallback_response("what should I eat today"), FALLBACK_DIET);
        assert_eq!(fallback_response("Meal ideas?"), FALLBACK_DIET);
    }

    #[test]
    fn protein_bucket() {
        assert_eq!(fallback_response("how much protein?"), FALLBACK_PROTEIN);
    }

    #[test]
    fn cardio_bucket() {
        assert_eq!(fallback_response("is cardio bad for gains"), FALLBACK_CARDIO);
    }

    #[test]
    fn unmatched_message_gets_generic_fallback() {
        assert_eq!(fallback_response("hello there"), FALLBACK_GENERIC);
    }

    #[test]
    fn earlier_buckets_win_on_overlap() {
        // "workout" outranks "protein" by bucket order.
        assert_eq!(
            fallback_response("protein before a workout?"),
            FALLBACK_WORKOUT
        );
    }
}
