#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use healthie_core::{
    models::{
        ChatTurn, DailyMeals, Day, ExerciseOption, HealthProfile, MealOption, Plan, Week,
    },
    service::DayMeals,
    ChatSession, GenerativeService, MemoryPlanStore, Planner, PlannerBuilder, TransportError,
};
use tempfile::TempDir;
use tokio::sync::Semaphore;

type Reply<T> = Result<T, TransportError>;

fn meal(name: &str, calories: f64, cost: &str) -> MealOption {
    MealOption {
        name: name.to_string(),
        calories,
        cost: cost.to_string(),
    }
}

fn exercise(name: &str, calories_burned: f64) -> ExerciseOption {
    ExerciseOption {
        name: name.to_string(),
        target: "30 นาที".to_string(),
        calories_burned,
    }
}

/// Builds a plan whose options carry `tag` in their names so two plans are
/// easy to tell apart.
pub fn test_plan(tag: &str) -> Plan {
    let day = |day: Day| DailyMeals {
        daily_cost: String::new(),
        breakfast: vec![
            meal(&format!("{tag} breakfast A"), 300.0, "40-50 บาท"),
            meal(&format!("{tag} breakfast B"), 320.0, "ประมาณ 35 บาท"),
        ],
        breakfast_cost: String::new(),
        lunch: vec![
            meal(&format!("{tag} lunch A"), 500.0, "60-80 บาท"),
            meal(&format!("{tag} lunch B"), 450.0, ""),
            meal(&format!("{tag} lunch C"), 480.0, "70 บาท"),
        ],
        lunch_cost: String::new(),
        dinner: vec![
            meal(&format!("{tag} dinner A"), 400.0, "60-80 บาท"),
            meal(&format!("{tag} dinner B"), 380.0, "90-120 บาท"),
        ],
        dinner_cost: String::new(),
        rationale: format!("{tag} rationale for {}", day.as_str()),
    };
    let exercises = || {
        vec![
            exercise(&format!("{tag} walk"), 150.0),
            exercise(&format!("{tag} cycle"), 200.0),
        ]
    };

    Plan {
        summary: format!("{tag} summary"),
        estimated_cost: String::new(),
        weekly_plan: Week {
            monday: day(Day::Monday),
            tuesday: day(Day::Tuesday),
            wednesday: day(Day::Wednesday),
            thursday: day(Day::Thursday),
            friday: day(Day::Friday),
            saturday: day(Day::Saturday),
            sunday: day(Day::Sunday),
        },
        weekly_exercise_plan: Week {
            monday: exercises(),
            tuesday: exercises(),
            wednesday: exercises(),
            thursday: exercises(),
            friday: exercises(),
            saturday: exercises(),
            sunday: exercises(),
        },
        total_calories_burned: 1050.0,
        recommended_sleep: "7-8 ชั่วโมง".to_string(),
    }
}

pub fn test_profile() -> HealthProfile {
    HealthProfile {
        age: 70,
        height_cm: 165.0,
        weight_kg: 60.0,
        diseases: "เบาหวาน".to_string(),
        ..Default::default()
    }
}

/// A proposal reply carrying `plan`.
pub fn revision_reply(text: &str, plan: &Plan) -> String {
    serde_json::json!({ "responseText": text, "newPlan": plan }).to_string()
}

#[derive(Default)]
struct Queues {
    plans: Mutex<VecDeque<Reply<Plan>>>,
    narratives: Mutex<VecDeque<Reply<String>>>,
    replies: Mutex<VecDeque<Reply<String>>>,
    sent: Mutex<Vec<(Vec<ChatTurn>, String)>>,
    gate: Option<Arc<Semaphore>>,
}

impl Queues {
    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
    }
}

fn pop<T>(queue: &Mutex<VecDeque<Reply<T>>>) -> Reply<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(TransportError::Request("nothing scripted".to_string())))
}

/// Generative service answering from scripted queues.
#[derive(Clone, Default)]
pub struct ScriptedService {
    queues: Arc<Queues>,
}

impl ScriptedService {
    /// Narrative and chat calls wait until the returned semaphore has a
    /// permit for them.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let service = Self {
            queues: Arc::new(Queues {
                gate: Some(Arc::clone(&gate)),
                ..Default::default()
            }),
        };
        (service, gate)
    }

    pub fn plan(&self, plan: Reply<Plan>) -> &Self {
        self.queues.plans.lock().unwrap().push_back(plan);
        self
    }

    pub fn narrative(&self, narrative: Reply<String>) -> &Self {
        self.queues.narratives.lock().unwrap().push_back(narrative);
        self
    }

    pub fn reply(&self, reply: Reply<String>) -> &Self {
        self.queues.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn sent(&self) -> Vec<(Vec<ChatTurn>, String)> {
        self.queues.sent.lock().unwrap().clone()
    }
}

struct ScriptedSession {
    queues: Arc<Queues>,
}

#[async_trait]
impl ChatSession for ScriptedSession {
    async fn send(&self, history: &[ChatTurn], text: &str) -> Reply<String> {
        self.queues
            .sent
            .lock()
            .unwrap()
            .push((history.to_vec(), text.to_string()));
        self.queues.pass_gate().await;
        pop(&self.queues.replies)
    }
}

#[async_trait]
impl GenerativeService for ScriptedService {
    fn create_conversation(
        &self,
        _system_instruction: &str,
        _seed_history: Vec<ChatTurn>,
    ) -> Arc<dyn ChatSession> {
        Arc::new(ScriptedSession {
            queues: Arc::clone(&self.queues),
        })
    }

    async fn generate_plan(&self, _profile: &HealthProfile) -> Reply<Plan> {
        pop(&self.queues.plans)
    }

    async fn generate_day_narrative(
        &self,
        _day: Day,
        _meals: &DayMeals,
        _profile: &HealthProfile,
    ) -> Reply<String> {
        self.queues.pass_gate().await;
        pop(&self.queues.narratives)
    }
}

/// Planner over an in-memory store with the "base" plan generated.
pub async fn planner_with_plan(service: &ScriptedService) -> (Arc<MemoryPlanStore>, Planner) {
    let store = Arc::new(MemoryPlanStore::new());
    let planner = PlannerBuilder::new()
        .with_store(store.clone())
        .with_service(Arc::new(service.clone()))
        .with_profile(test_profile())
        .build()
        .await
        .expect("Failed to create planner");
    service.plan(Ok(test_plan("base")));
    planner
        .generate(test_profile())
        .await
        .expect("Failed to generate plan");
    (store, planner)
}

/// Temporary directory and database path for SQLite-backed tests.
pub fn create_test_environment() -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("healthie.db");
    (temp_dir, db_path)
}
