//! FitAI MCP Server Implementation
//!
//! Implements the MCP server with all FitAI tools.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::sessions::{ConfirmationSessions, SessionView};
use crate::confirmation::{ConfirmationState, FoodConfirmation};
use crate::db::Database;
use crate::edge::{
    self, ContentGenerationParams, ContentGenerationResult, ContentType, EdgeError,
    EdgeFunctions, FoodAnalysisResult, WorkoutResponse, WorkoutRoutineRequest,
};
use crate::models::{FoodField, FoodItem};
use crate::request_state::RequestState;
use crate::tools::checklist;
use crate::tools::meals::{self, LogMealResponse, ManualMealInput};
use crate::tools::profile::{self, ProfileForm};
use crate::tools::progress;
use crate::tools::status::{StatusTracker, USAGE_INSTRUCTIONS};
use crate::tools::workouts;

/// Latest state of each kind of AI request
#[derive(Debug, Default, Serialize)]
struct AiRequests {
    food_analysis: RequestState<FoodAnalysisResult>,
    workout_routine: RequestState<WorkoutResponse>,
    content: RequestState<ContentGenerationResult>,
}

/// FitAI MCP Service
#[derive(Clone)]
pub struct FitaiService {
    status_tracker: Arc<StatusTracker>,
    database: Database,
    edge: Option<Arc<dyn EdgeFunctions>>,
    sessions: Arc<Mutex<ConfirmationSessions>>,
    requests: Arc<Mutex<AiRequests>>,
    tool_router: ToolRouter<FitaiService>,
}

impl FitaiService {
    /// `edge` is `None` when the AI functions are not configured
    pub fn new(database_path: PathBuf, database: Database, edge: Option<Arc<dyn EdgeFunctions>>) -> Self {
        Self {
            status_tracker: Arc::new(StatusTracker::new(database_path, edge.is_some())),
            database,
            edge,
            sessions: Arc::new(Mutex::new(ConfirmationSessions::new())),
            requests: Arc::new(Mutex::new(AiRequests::default())),
            tool_router: Self::tool_router(),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, ConfirmationSessions> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn requests(&self) -> MutexGuard<'_, AiRequests> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn edge(&self) -> Result<Arc<dyn EdgeFunctions>, String> {
        self.edge.clone().ok_or_else(|| EdgeError::NotConfigured.to_string())
    }
}

// ============================================================================
// Service Operations
// ============================================================================

impl FitaiService {
    /// Analyze a meal photo and open a confirmation session for its foods
    async fn analyze_photo(&self, image_path: &str) -> Result<SessionView, String> {
        let client = self.edge()?;
        let path = Path::new(image_path);

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| format!("Failed to read image '{}': {}", image_path, e))?;
        let data_url = edge::image_data_url(&bytes, edge::mime_from_path(path));

        self.requests().food_analysis = RequestState::Loading;
        let result = edge::analyze_food(client.as_ref(), data_url).await;
        self.requests().food_analysis.finish(&result);

        let analysis = result.map_err(|e| e.to_string())?;
        self.open_session(analysis.foods, Some(image_path.to_string()))
    }

    fn open_session(&self, foods: Vec<FoodItem>, image_uri: Option<String>) -> Result<SessionView, String> {
        let session = FoodConfirmation::new(foods, image_uri).map_err(|e| e.to_string())?;
        let mut sessions = self.sessions();
        let id = sessions.open(session);
        info!(session_id = id, "food confirmation session opened");
        sessions.get(id).map(|s| SessionView::new(id, s))
    }

    fn view_session(&self, id: u64) -> Result<SessionView, String> {
        let sessions = self.sessions();
        sessions.get(id).map(|s| SessionView::new(id, s))
    }

    fn edit_item(&self, id: u64, index: usize, field: &str, value: &str) -> Result<SessionView, String> {
        let field = FoodField::from_str(field).ok_or_else(|| {
            format!(
                "Unknown field '{}': expected name, portion_size_grams, calories, protein, carbs or fat",
                field
            )
        })?;

        let mut sessions = self.sessions();
        let session = sessions.get_mut(id)?;
        session.edit(index, field, value).map_err(|e| e.to_string())?;
        Ok(SessionView::new(id, session))
    }

    fn remove_item(&self, id: u64, index: usize) -> Result<SessionView, String> {
        let mut sessions = self.sessions();
        let session = sessions.get_mut(id)?;
        session.remove_item(index).map_err(|e| e.to_string())?;
        Ok(SessionView::new(id, session))
    }

    /// Confirm a session and save it as a meal; the session stays open if saving fails
    fn confirm_session(
        &self,
        id: u64,
        date: Option<&str>,
        meal_type: Option<&str>,
    ) -> Result<ConfirmResponse, String> {
        let session = self.sessions().take(id)?;
        let backup = session.clone();
        let image_uri = session.image_uri().map(str::to_string);
        let (state, items) = session.confirm();

        let logged = meals::save_confirmed_meal(&self.database, date, meal_type, items, image_uri)
            .map_err(|e| {
                warn!(session_id = id, error = %e, "saving confirmed meal failed, session kept open");
                self.sessions().restore(id, backup);
                e
            })?;

        Ok(ConfirmResponse {
            session_id: id,
            state,
            logged,
        })
    }

    fn cancel_session(&self, id: u64) -> Result<CancelResponse, String> {
        let session = self.sessions().take(id)?;
        Ok(CancelResponse {
            session_id: id,
            state: session.cancel(),
        })
    }

    async fn generate_routine(&self, request: WorkoutRoutineRequest) -> Result<WorkoutResponse, String> {
        let client = self.edge()?;

        self.requests().workout_routine = RequestState::Loading;
        let result = edge::generate_routine(client.as_ref(), request).await;
        self.requests().workout_routine.finish(&result);

        result.map_err(|e| e.to_string())
    }

    async fn generate_text(&self, params: ContentGenerationParams) -> Result<ContentGenerationResult, String> {
        let client = self.edge()?;

        self.requests().content = RequestState::Loading;
        let result = edge::generate_content(client.as_ref(), &params).await;
        self.requests().content.finish(&result);

        result.map_err(|e| e.to_string())
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn tool_error(message: String) -> McpError {
    McpError::internal_error(message, None)
}

#[derive(Debug, Serialize)]
struct ConfirmResponse {
    session_id: u64,
    state: ConfirmationState,
    #[serde(flatten)]
    logged: LogMealResponse,
}

#[derive(Debug, Serialize)]
struct CancelResponse {
    session_id: u64,
    state: ConfirmationState,
}

// ============================================================================
// Food Confirmation Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeMealPhotoParams {
    /// Path of a local image file (jpg, png, webp, heic)
    pub image_path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodItemParams {
    pub name: String,
    pub portion_size_grams: f64,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub confidence: f64,
}

impl From<FoodItemParams> for FoodItem {
    fn from(p: FoodItemParams) -> Self {
        FoodItem {
            name: p.name,
            portion_size_grams: p.portion_size_grams,
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fat: p.fat,
            confidence: p.confidence,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StartFoodConfirmationParams {
    pub foods: Vec<FoodItemParams>,
    pub image_uri: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SessionParams {
    pub session_id: u64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EditFoodItemParams {
    pub session_id: u64,
    /// Zero-based position of the item
    pub index: usize,
    /// name, portion_size_grams, calories, protein, carbs or fat
    pub field: String,
    /// Raw text as typed; numbers are read up to the first non-numeric character
    pub value: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveFoodItemParams {
    pub session_id: u64,
    pub index: usize,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConfirmFoodConfirmationParams {
    pub session_id: u64,
    /// ISO date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
    /// breakfast, lunch, dinner, snack or unspecified
    pub meal_type: Option<String>,
}

// ============================================================================
// Meal and Workout Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    pub name: String,
    /// Whole kcal as text, e.g. "450"
    pub calories: String,
    pub protein: Option<String>,
    pub carbs: Option<String>,
    pub fat: Option<String>,
    pub meal_type: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// ISO date (YYYY-MM-DD), defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWorkoutParams {
    /// One of list_workout_types, or any custom name (burns 0 kcal)
    pub workout_type: String,
    /// Whole minutes as text, e.g. "30"
    pub duration: String,
    pub date: Option<String>,
}

// ============================================================================
// AI Generation Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateWorkoutRoutineParams {
    pub goal: String,
    /// Beginner, Intermediate or Advanced (default Intermediate)
    pub fitness_level: Option<String>,
    #[serde(default = "default_days_per_week")]
    pub days_per_week: u32,
    #[serde(default = "default_session_duration")]
    pub session_duration: u32,
}

fn default_days_per_week() -> u32 { WorkoutRoutineRequest::DEFAULT_DAYS_PER_WEEK }
fn default_session_duration() -> u32 { WorkoutRoutineRequest::DEFAULT_SESSION_MINUTES }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateContentParams {
    pub prompt: String,
    /// workout, meal-plan, motivation, tips or custom
    pub content_type: Option<String>,
    /// Overrides the content type's system prompt
    pub system: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub format: Option<String>,
    pub model: Option<String>,
}

// ============================================================================
// Progress and Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetProgressParams {
    /// Last day of the range, defaults to today
    pub end_date: Option<String>,
    /// Number of days, default 7
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    pub name: Option<String>,
    pub age: Option<String>,
    pub height_cm: Option<String>,
    pub weight_kg: Option<String>,
    pub goal: Option<String>,
    pub calorie_goal: Option<f64>,
    pub protein_goal: Option<f64>,
    pub carbs_goal: Option<f64>,
    pub fat_goal: Option<f64>,
    pub workout_goal: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWeightParams {
    pub weight_kg: f64,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddChecklistItemParams {
    pub label: String,
    pub date: Option<String>,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl FitaiService {
    // --- Status ---

    #[tool(description = "Get the current status of the FitAI service including build info, database status, AI configuration and process information")]
    fn fitai_status(&self) -> Result<CallToolResult, McpError> {
        let open = self.sessions().len();
        to_json(&self.status_tracker.get_status(open))
    }

    // --- Food Confirmation ---

    #[tool(description = "Analyze a meal photo with AI and open a food confirmation session with the detected foods. Review and edit the items, then confirm to log the meal.")]
    async fn analyze_meal_photo(&self, Parameters(p): Parameters<AnalyzeMealPhotoParams>) -> Result<CallToolResult, McpError> {
        let view = self.analyze_photo(&p.image_path).await.map_err(tool_error)?;
        to_json(&view)
    }

    #[tool(description = "Open a food confirmation session from an already known list of foods")]
    fn start_food_confirmation(&self, Parameters(p): Parameters<StartFoodConfirmationParams>) -> Result<CallToolResult, McpError> {
        let foods = p.foods.into_iter().map(FoodItem::from).collect();
        let view = self.open_session(foods, p.image_uri).map_err(tool_error)?;
        to_json(&view)
    }

    #[tool(description = "Show the items and running totals of a food confirmation session")]
    fn get_food_confirmation(&self, Parameters(p): Parameters<SessionParams>) -> Result<CallToolResult, McpError> {
        to_json(&self.view_session(p.session_id).map_err(tool_error)?)
    }

    #[tool(description = "Edit one field of a food item. Changing portion_size_grams rescales calories and macros proportionally; changing a nutrient only changes that nutrient.")]
    fn edit_food_item(&self, Parameters(p): Parameters<EditFoodItemParams>) -> Result<CallToolResult, McpError> {
        let view = self
            .edit_item(p.session_id, p.index, &p.field, &p.value)
            .map_err(tool_error)?;
        to_json(&view)
    }

    #[tool(description = "Remove a food item from a confirmation session. The last remaining item cannot be removed.")]
    fn remove_food_item(&self, Parameters(p): Parameters<RemoveFoodItemParams>) -> Result<CallToolResult, McpError> {
        to_json(&self.remove_item(p.session_id, p.index).map_err(tool_error)?)
    }

    #[tool(description = "Confirm a food confirmation session and log it as a meal")]
    fn confirm_food_confirmation(&self, Parameters(p): Parameters<ConfirmFoodConfirmationParams>) -> Result<CallToolResult, McpError> {
        let result = self
            .confirm_session(p.session_id, p.date.as_deref(), p.meal_type.as_deref())
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "Cancel a food confirmation session without logging anything")]
    fn cancel_food_confirmation(&self, Parameters(p): Parameters<SessionParams>) -> Result<CallToolResult, McpError> {
        to_json(&self.cancel_session(p.session_id).map_err(tool_error)?)
    }

    // --- Meals ---

    #[tool(description = "Log a meal by hand. Name and calories are required; values are whole numbers.")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let input = ManualMealInput {
            name: p.name,
            calories: p.calories,
            protein: p.protein,
            carbs: p.carbs,
            fat: p.fat,
            meal_type: p.meal_type,
            date: p.date,
        };
        to_json(&meals::log_manual_meal(&self.database, &input).map_err(tool_error)?)
    }

    #[tool(description = "List the meals logged on a date with their total nutrition")]
    fn list_meals(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        to_json(&meals::list_meals(&self.database, p.date.as_deref()).map_err(tool_error)?)
    }

    #[tool(description = "Delete a logged meal")]
    fn delete_meal(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        to_json(&meals::delete_meal(&self.database, p.id).map_err(tool_error)?)
    }

    // --- Workouts ---

    #[tool(description = "List the built-in workout types with their calories burned per minute")]
    fn list_workout_types(&self) -> Result<CallToolResult, McpError> {
        to_json(&workouts::list_workout_types())
    }

    #[tool(description = "Log a workout. Calories burned are estimated from the workout type and duration.")]
    fn log_workout(&self, Parameters(p): Parameters<LogWorkoutParams>) -> Result<CallToolResult, McpError> {
        let result = workouts::log_workout(&self.database, &p.workout_type, &p.duration, p.date.as_deref())
            .map_err(tool_error)?;
        to_json(&result)
    }

    #[tool(description = "List the workouts logged on a date with their totals")]
    fn list_workouts(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        to_json(&workouts::list_workouts(&self.database, p.date.as_deref()).map_err(tool_error)?)
    }

    #[tool(description = "Delete a logged workout")]
    fn delete_workout(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        to_json(&workouts::delete_workout(&self.database, p.id).map_err(tool_error)?)
    }

    // --- AI Generation ---

    #[tool(description = "Generate a weekly workout routine with AI for a fitness goal")]
    async fn generate_workout_routine(&self, Parameters(p): Parameters<GenerateWorkoutRoutineParams>) -> Result<CallToolResult, McpError> {
        let request = WorkoutRoutineRequest::new(
            &p.goal,
            p.fitness_level.as_deref(),
            Some(p.days_per_week),
            Some(p.session_duration),
        );
        to_json(&self.generate_routine(request).await.map_err(tool_error)?)
    }

    #[tool(description = "Generate fitness content with AI (workout plans, meal plans, motivation, tips or custom). The prompt must be at least 3 characters.")]
    async fn generate_content(&self, Parameters(p): Parameters<GenerateContentParams>) -> Result<CallToolResult, McpError> {
        let params = ContentGenerationParams {
            prompt: p.prompt,
            content_type: p.content_type.as_deref().map(ContentType::from_str).unwrap_or_default(),
            system: p.system,
            temperature: p.temperature,
            max_tokens: p.max_tokens,
            format: p.format,
            model: p.model,
        };
        to_json(&self.generate_text(params).await.map_err(tool_error)?)
    }

    #[tool(description = "Show the latest state (idle, loading, success or error) of the food analysis, workout routine and content generation requests")]
    fn get_request_status(&self) -> Result<CallToolResult, McpError> {
        let requests = self.requests();
        to_json(&*requests)
    }

    // --- Progress ---

    #[tool(description = "Get a day's nutrition and workout totals, progress towards the daily goals, and the current streak")]
    fn get_daily_summary(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        to_json(&progress::get_daily_summary(&self.database, p.date.as_deref()).map_err(tool_error)?)
    }

    #[tool(description = "Get day-by-day calories, protein, workouts and weigh-ins over a range of days (default 7)")]
    fn get_progress(&self, Parameters(p): Parameters<GetProgressParams>) -> Result<CallToolResult, McpError> {
        let result = progress::get_progress(&self.database, p.end_date.as_deref(), p.days).map_err(tool_error)?;
        to_json(&result)
    }

    // --- Profile ---

    #[tool(description = "Get the user profile and daily goals")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        to_json(&profile::get_profile(&self.database).map_err(tool_error)?)
    }

    #[tool(description = "Update the user profile and daily goals. Only the given fields change.")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let form = ProfileForm {
            name: p.name,
            age: p.age,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            goal: p.goal,
            calorie_goal: p.calorie_goal,
            protein_goal: p.protein_goal,
            carbs_goal: p.carbs_goal,
            fat_goal: p.fat_goal,
            workout_goal: p.workout_goal,
        };
        to_json(&profile::update_profile(&self.database, &form).map_err(tool_error)?)
    }

    #[tool(description = "Log a weigh-in in kg. One reading per day; logging again replaces it.")]
    fn log_weight(&self, Parameters(p): Parameters<LogWeightParams>) -> Result<CallToolResult, McpError> {
        to_json(&profile::log_weight(&self.database, p.weight_kg, p.date.as_deref()).map_err(tool_error)?)
    }

    // --- Checklist ---

    #[tool(description = "Get the daily checklist for a date with its completion percentage")]
    fn get_checklist(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        to_json(&checklist::get_checklist(&self.database, p.date.as_deref()).map_err(tool_error)?)
    }

    #[tool(description = "Add an item to the daily checklist")]
    fn add_checklist_item(&self, Parameters(p): Parameters<AddChecklistItemParams>) -> Result<CallToolResult, McpError> {
        let item = checklist::add_checklist_item(&self.database, &p.label, p.date.as_deref()).map_err(tool_error)?;
        to_json(&item)
    }

    #[tool(description = "Mark a checklist item done, or not done if it already was")]
    fn toggle_checklist_item(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        to_json(&checklist::toggle_checklist_item(&self.database, p.id).map_err(tool_error)?)
    }

    #[tool(description = "Delete a checklist item")]
    fn delete_checklist_item(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        to_json(&checklist::delete_checklist_item(&self.database, p.id).map_err(tool_error)?)
    }
}

#[tool_handler]
impl ServerHandler for FitaiService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "fitai".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("FitAI Tracker".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(USAGE_INSTRUCTIONS.trim().into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::fake::FakeEdge;
    use crate::tools::test_db;

    fn food(name: &str, grams: f64, calories: f64) -> FoodItem {
        FoodItem {
            name: name.to_string(),
            portion_size_grams: grams,
            calories,
            protein: 30.0,
            carbs: 10.0,
            fat: 20.0,
            confidence: 0.9,
        }
    }

    fn service(edge: Option<FakeEdge>) -> FitaiService {
        let edge = edge.map(|e| Arc::new(e) as Arc<dyn EdgeFunctions>);
        FitaiService::new(PathBuf::from(":memory:"), test_db(), edge)
    }

    #[test]
    fn test_session_edit_remove_confirm() {
        let svc = service(None);
        let view = svc
            .open_session(vec![food("Chicken Salad", 200.0, 400.0), food("Bread", 50.0, 150.0)], None)
            .unwrap();
        let id = view.session_id;
        assert_eq!(view.totals.calories, 550.0);

        let view = svc.edit_item(id, 0, "portion_size_grams", "100g").unwrap();
        assert_eq!(view.items[0].item.calories, 200.0);
        assert_eq!(view.items[0].item.protein, 15.0);

        assert!(svc.edit_item(id, 0, "sodium", "5").is_err());
        assert!(svc.edit_item(id, 9, "calories", "5").is_err());

        let view = svc.remove_item(id, 1).unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(
            svc.remove_item(id, 0).unwrap_err(),
            "You must have at least one food item."
        );

        let saved = svc.confirm_session(id, Some("2026-01-10"), Some("lunch")).unwrap();
        assert_eq!(saved.state, ConfirmationState::Confirmed);
        assert_eq!(saved.logged.meal.name, "Chicken Salad");
        assert_eq!(saved.logged.meal.nutrition.calories, 200.0);

        // Confirmed sessions are gone
        assert!(svc.view_session(id).is_err());
        assert!(svc.cancel_session(id).is_err());
    }

    #[test]
    fn test_failed_save_keeps_session() {
        let svc = service(None);
        let id = svc.open_session(vec![food("Rice", 150.0, 200.0)], None).unwrap().session_id;

        assert!(svc.confirm_session(id, Some("not-a-date"), None).is_err());
        assert_eq!(svc.view_session(id).unwrap().items.len(), 1);

        assert_eq!(svc.cancel_session(id).unwrap().state, ConfirmationState::Cancelled);
        assert!(svc.view_session(id).is_err());
    }

    #[test]
    fn test_empty_analysis_rejected() {
        let svc = service(None);
        assert_eq!(
            svc.open_session(Vec::new(), None).unwrap_err(),
            "No food detected in the photo"
        );
    }

    #[test]
    fn test_negative_nutrition_rejected() {
        let svc = service(None);
        let err = svc
            .open_session(vec![food("Rice", 150.0, 200.0), food("Soup", -200.0, -400.0)], None)
            .unwrap_err();
        assert!(err.starts_with("Food item 1 is invalid"));
        assert_eq!(svc.sessions().len(), 0);
    }

    #[tokio::test]
    async fn test_ai_not_configured() {
        let svc = service(None);
        let err = svc
            .generate_routine(WorkoutRoutineRequest::new("Get fit", None, None, None))
            .await
            .unwrap_err();
        assert!(err.contains("not configured"));
        assert_eq!(svc.requests().workout_routine.status(), "idle");
    }

    #[tokio::test]
    async fn test_analyze_photo_opens_session() {
        let dir = std::env::temp_dir().join(format!("fitai-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let image = dir.join("lunch.jpg");
        std::fs::write(&image, b"\xff\xd8\xff").unwrap();

        let svc = service(Some(FakeEdge {
            foods: vec![food("Chicken Salad", 200.0, 400.0)],
            ..Default::default()
        }));
        let view = svc.analyze_photo(image.to_str().unwrap()).await.unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.image_uri.as_deref(), image.to_str());
        assert!(svc.requests().food_analysis.data().is_some());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_failed_generation_recorded() {
        let svc = service(Some(FakeEdge {
            fail_with: Some("Failed to generate workout routine".to_string()),
            ..Default::default()
        }));
        let err = svc
            .generate_routine(WorkoutRoutineRequest::new("Get fit", None, None, None))
            .await
            .unwrap_err();
        assert_eq!(err, "Failed to generate workout routine");
        assert_eq!(
            svc.requests().workout_routine.error(),
            Some("Failed to generate workout routine")
        );

        let err = svc
            .generate_text(ContentGenerationParams {
                prompt: "hi".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err, "Prompt must be at least 3 characters.");
        assert!(svc.requests().content.error().is_some());
    }
}
