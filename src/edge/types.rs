//! Request and response shapes of the AI edge functions

use serde::{Deserialize, Serialize};

use crate::models::FoodItem;

// ============================================================================
// analyze-food
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeFoodRequest {
    /// `data:<mime>;base64,<payload>`
    pub image_base64: String,
}

/// Foods recognised in a meal photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodAnalysisResult {
    pub foods: Vec<FoodItem>,
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_protein: f64,
    #[serde(default)]
    pub total_carbs: f64,
    #[serde(default)]
    pub total_fat: f64,
    #[serde(default)]
    pub duration_ms: u64,
}

// ============================================================================
// generate-workout-routine
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRoutineRequest {
    pub goal: String,
    pub fitness_level: String,
    pub days_per_week: u32,
    pub session_duration: u32,
}

impl WorkoutRoutineRequest {
    pub const DEFAULT_FITNESS_LEVEL: &'static str = "Intermediate";
    pub const DEFAULT_DAYS_PER_WEEK: u32 = 4;
    pub const DEFAULT_SESSION_MINUTES: u32 = 60;

    /// Build a request, filling in defaults for anything not given
    pub fn new(
        goal: &str,
        fitness_level: Option<&str>,
        days_per_week: Option<u32>,
        session_duration: Option<u32>,
    ) -> Self {
        Self {
            goal: goal.trim().to_string(),
            fitness_level: fitness_level
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(Self::DEFAULT_FITNESS_LEVEL)
                .to_string(),
            days_per_week: days_per_week
                .filter(|d| *d > 0)
                .unwrap_or(Self::DEFAULT_DAYS_PER_WEEK),
            session_duration: session_duration
                .filter(|m| *m > 0)
                .unwrap_or(Self::DEFAULT_SESSION_MINUTES),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineExercise {
    pub name: String,
    pub sets: u32,
    pub reps: String,
    pub rest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: String,
    pub focus: String,
    pub exercises: Vec<RoutineExercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRoutine {
    pub goal: String,
    pub days_per_week: u32,
    pub session_duration: u32,
    pub weekly_schedule: Vec<DaySchedule>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub progression_plan: String,
}

impl WorkoutRoutine {
    /// Total number of exercises across the week
    pub fn exercise_count(&self) -> usize {
        self.weekly_schedule.iter().map(|d| d.exercises.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutResponse {
    pub routine: WorkoutRoutine,
    pub generated_at: String,
}

// ============================================================================
// generate-text
// ============================================================================

/// Kind of content to generate; selects the default system prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    Workout,
    MealPlan,
    Motivation,
    Tips,
    #[default]
    Custom,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Workout => "workout",
            ContentType::MealPlan => "meal-plan",
            ContentType::Motivation => "motivation",
            ContentType::Tips => "tips",
            ContentType::Custom => "custom",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "workout" => ContentType::Workout,
            "meal-plan" | "meal_plan" | "mealplan" => ContentType::MealPlan,
            "motivation" => ContentType::Motivation,
            "tips" => ContentType::Tips,
            _ => ContentType::Custom,
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            ContentType::Workout => "You are a professional fitness trainer. Generate detailed, safe, and effective workout content. Include proper form instructions and safety tips.",
            ContentType::MealPlan => "You are a certified nutritionist. Generate healthy, balanced meal plans with nutritional information. Consider dietary restrictions and fitness goals.",
            ContentType::Motivation => "You are a motivational fitness coach. Generate inspiring, encouraging content that motivates people to achieve their fitness goals.",
            ContentType::Tips => "You are a fitness and wellness expert. Generate practical, actionable tips for health, fitness, and wellness.",
            ContentType::Custom => "You are a helpful fitness and wellness assistant. Provide accurate, helpful information.",
        }
    }
}

/// Caller-facing content generation parameters
#[derive(Debug, Clone, Default)]
pub struct ContentGenerationParams {
    pub prompt: String,
    pub content_type: ContentType,
    pub system: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub format: Option<String>,
    pub model: Option<String>,
}

/// Wire body of `generate-text`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextGenerationRequest {
    pub prompt: String,
    pub system: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub format: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TokenUsage {
    pub prompt: Option<u64>,
    pub completion: Option<u64>,
    pub total: Option<u64>,
}

/// Where the generated text was stored, plus the text itself once fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentGenerationResult {
    pub url: String,
    pub path: String,
    #[serde(default)]
    pub duration_ms: u64,
    pub model: String,
    #[serde(default)]
    pub input_images: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routine_request_defaults() {
        let req = WorkoutRoutineRequest::new(" Build muscle ", None, None, Some(0));
        assert_eq!(req.goal, "Build muscle");
        assert_eq!(req.fitness_level, "Intermediate");
        assert_eq!(req.days_per_week, 4);
        assert_eq!(req.session_duration, 60);

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["fitnessLevel"], "Intermediate");
        assert_eq!(json["daysPerWeek"], 4);
    }

    #[test]
    fn test_routine_response_parses() {
        let json = r#"{
            "routine": {
                "goal": "Lose fat",
                "daysPerWeek": 3,
                "sessionDuration": 45,
                "weeklySchedule": [
                    {"day": "Monday", "focus": "Full body", "exercises": [
                        {"name": "Squat", "sets": 3, "reps": "8-10", "rest": "90s",
                         "instructionImageUrl": "https://img.example/squat.png"},
                        {"name": "Push-up", "sets": 3, "reps": "12", "rest": "60s"}
                    ]}
                ],
                "tips": ["Sleep well"],
                "progressionPlan": "Add weight weekly"
            },
            "generatedAt": "2026-01-10T08:00:00Z"
        }"#;
        let resp: WorkoutResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.routine.days_per_week, 3);
        assert_eq!(resp.routine.exercise_count(), 2);
        assert_eq!(
            resp.routine.weekly_schedule[0].exercises[0].instruction_image_url.as_deref(),
            Some("https://img.example/squat.png")
        );
    }

    #[test]
    fn test_content_type_prompts() {
        assert_eq!(ContentType::from_str("meal-plan"), ContentType::MealPlan);
        assert_eq!(ContentType::from_str("anything"), ContentType::Custom);
        assert!(ContentType::Workout.system_prompt().contains("fitness trainer"));
    }
}
