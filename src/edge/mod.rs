//! AI edge functions
//!
//! Food photo analysis, workout routine generation and free-form content
//! generation, all delegated to hosted functions.

pub mod client;
pub mod types;

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{info, instrument, warn};

pub use client::{EdgeError, EdgeFunctions, EdgeResult, HttpEdgeClient};
pub use types::{
    AnalyzeFoodRequest, ContentGenerationParams, ContentGenerationResult, ContentType, DaySchedule,
    FoodAnalysisResult, RoutineExercise, TextGenerationRequest, TokenUsage, WorkoutResponse,
    WorkoutRoutine, WorkoutRoutineRequest,
};

/// Shortest prompt accepted for content generation
pub const MIN_PROMPT_CHARS: usize = 3;

const DEFAULT_TEMPERATURE: f64 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_FORMAT: &str = "markdown";
const DEFAULT_MODEL: &str = "gpt-4o";

/// Guess an image MIME type from its file extension
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Encode image bytes as a `data:` URL
pub fn image_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Send a meal photo for analysis
#[instrument(skip(client, image_data_url))]
pub async fn analyze_food(
    client: &dyn EdgeFunctions,
    image_data_url: String,
) -> EdgeResult<FoodAnalysisResult> {
    if image_data_url.is_empty() {
        return Err(EdgeError::InvalidRequest("Image is empty".to_string()));
    }

    let result = client
        .analyze_food(&AnalyzeFoodRequest { image_base64: image_data_url })
        .await?;

    info!(
        foods = result.foods.len(),
        duration_ms = result.duration_ms,
        "food analysis finished"
    );
    Ok(result)
}

/// Ask for a weekly workout routine
#[instrument(skip(client))]
pub async fn generate_routine(
    client: &dyn EdgeFunctions,
    request: WorkoutRoutineRequest,
) -> EdgeResult<WorkoutResponse> {
    if request.goal.is_empty() {
        return Err(EdgeError::InvalidRequest("Please enter a fitness goal.".to_string()));
    }

    let response = client.generate_workout_routine(&request).await?;
    info!(
        days = response.routine.weekly_schedule.len(),
        exercises = response.routine.exercise_count(),
        "workout routine generated"
    );
    Ok(response)
}

/// Build the wire request for `generate-text`, validating the prompt
pub fn build_text_request(params: &ContentGenerationParams) -> EdgeResult<TextGenerationRequest> {
    let prompt = params.prompt.trim();
    if prompt.chars().count() < MIN_PROMPT_CHARS {
        return Err(EdgeError::InvalidRequest(format!(
            "Prompt must be at least {} characters.",
            MIN_PROMPT_CHARS
        )));
    }

    Ok(TextGenerationRequest {
        prompt: prompt.to_string(),
        system: params
            .system
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| params.content_type.system_prompt().to_string()),
        temperature: params.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        max_tokens: params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        format: params.format.clone().unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
        model: params.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
    })
}

/// Generate content and fetch the stored text
#[instrument(skip(client, params), fields(content_type = params.content_type.as_str()))]
pub async fn generate_content(
    client: &dyn EdgeFunctions,
    params: &ContentGenerationParams,
) -> EdgeResult<ContentGenerationResult> {
    let request = build_text_request(params)?;
    info!(prompt_len = request.prompt.len(), model = %request.model, "generating content");

    let mut result = client.generate_text(&request).await?;
    let text = client.fetch_text(&result.url).await.map_err(|e| {
        warn!(error = %e, url = %result.url, "failed to fetch generated text");
        e
    })?;

    info!(chars = text.len(), "generated text fetched");
    result.content = Some(text);
    Ok(result)
}

#[cfg(test)]
pub(crate) mod fake {
    //! Canned edge functions for tests

    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::models::FoodItem;

    #[derive(Default)]
    pub struct FakeEdge {
        pub foods: Vec<FoodItem>,
        pub fail_with: Option<String>,
        pub text: String,
        pub requests: Mutex<Vec<String>>,
    }

    impl FakeEdge {
        fn check(&self, what: &str) -> EdgeResult<()> {
            self.requests.lock().unwrap().push(what.to_string());
            match &self.fail_with {
                Some(message) => Err(EdgeError::Function(message.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl EdgeFunctions for FakeEdge {
        async fn analyze_food(&self, request: &AnalyzeFoodRequest) -> EdgeResult<FoodAnalysisResult> {
            self.check(&request.image_base64)?;
            Ok(FoodAnalysisResult {
                foods: self.foods.clone(),
                total_calories: self.foods.iter().map(|f| f.calories).sum(),
                total_protein: self.foods.iter().map(|f| f.protein).sum(),
                total_carbs: self.foods.iter().map(|f| f.carbs).sum(),
                total_fat: self.foods.iter().map(|f| f.fat).sum(),
                duration_ms: 12,
            })
        }

        async fn generate_workout_routine(
            &self,
            request: &WorkoutRoutineRequest,
        ) -> EdgeResult<WorkoutResponse> {
            self.check(&request.goal)?;
            Ok(WorkoutResponse {
                routine: WorkoutRoutine {
                    goal: request.goal.clone(),
                    days_per_week: request.days_per_week,
                    session_duration: request.session_duration,
                    weekly_schedule: vec![DaySchedule {
                        day: "Monday".to_string(),
                        focus: "Full body".to_string(),
                        exercises: vec![RoutineExercise {
                            name: "Squat".to_string(),
                            sets: 3,
                            reps: "10".to_string(),
                            rest: "60s".to_string(),
                            notes: None,
                            instruction_image_url: Some("https://img.test/squat.png".to_string()),
                        }],
                    }],
                    tips: vec!["Warm up first".to_string()],
                    progression_plan: "Add 2.5kg per week".to_string(),
                },
                generated_at: "2026-01-10T08:00:00Z".to_string(),
            })
        }

        async fn generate_text(
            &self,
            request: &TextGenerationRequest,
        ) -> EdgeResult<ContentGenerationResult> {
            self.check(&request.system)?;
            Ok(ContentGenerationResult {
                url: "https://storage.test/out.md".to_string(),
                path: "out.md".to_string(),
                duration_ms: 40,
                model: request.model.clone(),
                input_images: 0,
                tokens: None,
                format: Some(request.format.clone()),
                content: None,
            })
        }

        async fn fetch_text(&self, url: &str) -> EdgeResult<String> {
            self.check(url)?;
            Ok(self.text.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeEdge;
    use super::*;
    use crate::models::FoodItem;

    #[test]
    fn test_mime_from_path() {
        assert_eq!(mime_from_path(Path::new("meal.JPG")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("/tmp/a.png")), "image/png");
        assert_eq!(mime_from_path(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_image_data_url() {
        assert_eq!(image_data_url(b"hi", "image/png"), "data:image/png;base64,aGk=");
    }

    #[test]
    fn test_short_prompt_rejected() {
        let params = ContentGenerationParams {
            prompt: "  hi ".to_string(),
            ..Default::default()
        };
        let err = build_text_request(&params).unwrap_err();
        assert_eq!(err.to_string(), "Prompt must be at least 3 characters.");
    }

    #[test]
    fn test_text_request_defaults() {
        let params = ContentGenerationParams {
            prompt: " Five tips for recovery ".to_string(),
            content_type: ContentType::Tips,
            ..Default::default()
        };
        let req = build_text_request(&params).unwrap();
        assert_eq!(req.prompt, "Five tips for recovery");
        assert_eq!(req.system, ContentType::Tips.system_prompt());
        assert_eq!(req.temperature, 0.7);
        assert_eq!(req.max_tokens, 1000);
        assert_eq!(req.format, "markdown");
        assert_eq!(req.model, "gpt-4o");
    }

    #[tokio::test]
    async fn test_generate_content_fetches_text() {
        let edge = FakeEdge {
            text: "# Recovery\n- Sleep".to_string(),
            ..Default::default()
        };
        let params = ContentGenerationParams {
            prompt: "recovery tips".to_string(),
            content_type: ContentType::Tips,
            ..Default::default()
        };
        let result = generate_content(&edge, &params).await.unwrap();
        assert_eq!(result.content.as_deref(), Some("# Recovery\n- Sleep"));
        let requests = edge.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1], "https://storage.test/out.md");
    }

    #[tokio::test]
    async fn test_analyze_food_passes_through() {
        let edge = FakeEdge {
            foods: vec![FoodItem {
                name: "Apple".to_string(),
                portion_size_grams: 180.0,
                calories: 95.0,
                protein: 0.5,
                carbs: 25.0,
                fat: 0.3,
                confidence: 0.95,
            }],
            ..Default::default()
        };
        let result = analyze_food(&edge, image_data_url(b"jpeg", "image/jpeg")).await.unwrap();
        assert_eq!(result.foods.len(), 1);
        assert_eq!(result.total_calories, 95.0);
    }

    #[tokio::test]
    async fn test_function_error_surfaces() {
        let edge = FakeEdge {
            fail_with: Some("Rate limited".to_string()),
            ..Default::default()
        };
        let err = generate_routine(&edge, WorkoutRoutineRequest::new("Get strong", None, None, None))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Rate limited");
    }

    #[tokio::test]
    async fn test_empty_goal_rejected_without_call() {
        let edge = FakeEdge::default();
        let err = generate_routine(&edge, WorkoutRoutineRequest::new("  ", None, None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, EdgeError::InvalidRequest(_)));
        assert!(edge.requests.lock().unwrap().is_empty());
    }
}
