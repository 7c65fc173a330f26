//! Shared fixtures for unit tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::{
    models::{
        ChatTurn, DailyMeals, Day, ExerciseOption, HealthProfile, MealOption, Medication, Plan,
        Week,
    },
    service::{ChatSession, DayMeals, GenerativeService, TransportError},
};

fn meal(name: &str, calories: f64, cost: &str) -> MealOption {
    MealOption {
        name: name.to_string(),
        calories,
        cost: cost.to_string(),
    }
}

fn exercise(name: &str, target: &str, calories_burned: f64) -> ExerciseOption {
    ExerciseOption {
        name: name.to_string(),
        target: target.to_string(),
        calories_burned,
    }
}

fn day_meals(day: Day) -> DailyMeals {
    DailyMeals {
        daily_cost: "160-210 บาท".to_string(),
        breakfast: vec![
            meal("โจ๊กหมู", 300.0, "40-50 บาท"),
            meal("ข้าวต้มปลา", 350.0, "50-60 บาท"),
            meal("ขนมปังโฮลวีต", 250.0, ""),
        ],
        breakfast_cost: "40-50 บาท".to_string(),
        lunch: vec![
            meal("ข้าวกล้องผัดผัก", 500.0, "60-80 บาท"),
            meal("ก๋วยเตี๋ยวน้ำใส", 450.0, "50 บาท"),
        ],
        lunch_cost: "60-80 บาท".to_string(),
        dinner: vec![
            meal("แกงจืดเต้าหู้", 400.0, "60-80 บาท"),
            meal("ปลานึ่งมะนาว", 380.0, "120-150 บาท"),
        ],
        dinner_cost: "60-80 บาท".to_string(),
        rationale: format!("narrative for {}", day.as_str()),
    }
}

fn day_exercises() -> Vec<ExerciseOption> {
    vec![
        exercise("เดินเร็ว", "30 นาที", 150.0),
        exercise("ปั่นจักรยาน", "20 นาที", 200.0),
        exercise("ยืดเหยียด", "15 นาที", 50.0),
    ]
}

/// A valid plan whose default day totals 1200 kcal and "160-210 บาท".
pub(crate) fn sample_plan() -> Plan {
    Plan {
        summary: "แผนสุขภาพสำหรับผู้สูงอายุ".to_string(),
        estimated_cost: "1,120 - 1,470 บาท".to_string(),
        weekly_plan: Week {
            monday: day_meals(Day::Monday),
            tuesday: day_meals(Day::Tuesday),
            wednesday: day_meals(Day::Wednesday),
            thursday: day_meals(Day::Thursday),
            friday: day_meals(Day::Friday),
            saturday: day_meals(Day::Saturday),
            sunday: day_meals(Day::Sunday),
        },
        weekly_exercise_plan: Week {
            monday: day_exercises(),
            tuesday: day_exercises(),
            wednesday: day_exercises(),
            thursday: day_exercises(),
            friday: day_exercises(),
            saturday: day_exercises(),
            sunday: day_exercises(),
        },
        total_calories_burned: 1050.0,
        recommended_sleep: "ควรนอนหลับ 7-8 ชั่วโมงต่อคืน".to_string(),
    }
}

/// A second, distinguishable plan used as a revision proposal.
pub(crate) fn revised_plan() -> Plan {
    let mut plan = sample_plan();
    plan.summary = "แผนที่ปรับแล้ว".to_string();
    for day in Day::ALL {
        let meals = plan.weekly_plan.get_mut(day);
        meals.breakfast.truncate(1);
        meals.rationale = format!("revised narrative for {}", day.as_str());
    }
    plan
}

pub(crate) fn sample_profile() -> HealthProfile {
    HealthProfile {
        age: 68,
        height_cm: 160.0,
        weight_kg: 64.0,
        diseases: "ความดันโลหิตสูง".to_string(),
        exercise: vec!["เดิน".to_string(), "ปั่นจักรยาน".to_string()],
        takes_medication: true,
        medications: vec![Medication {
            name: "Amlodipine".to_string(),
            dosage: "5 mg".to_string(),
            time: "เช้า".to_string(),
        }],
        ..Default::default()
    }
}

type Reply<T> = Result<T, TransportError>;

/// Queued responses and a record of what was asked.
#[derive(Default)]
pub(crate) struct Script {
    pub plans: Mutex<VecDeque<Reply<Plan>>>,
    pub narratives: Mutex<VecDeque<Reply<String>>>,
    pub replies: Mutex<VecDeque<Reply<String>>>,
    /// Seed history of every session opened
    pub sessions: Mutex<Vec<Vec<ChatTurn>>>,
    /// `(history, text)` of every chat request
    pub sent: Mutex<Vec<(Vec<ChatTurn>, String)>>,
    /// When set, narrative and chat calls wait for a permit
    pub gate: Option<Arc<Semaphore>>,
}

impl Script {
    async fn pass_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

fn next<T>(queue: &Mutex<VecDeque<Reply<T>>>, what: &str) -> Reply<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(TransportError::Request(format!("no scripted {what}"))))
}

/// A generative service answering from queues.
#[derive(Clone, Default)]
pub(crate) struct ScriptedService {
    pub script: Arc<Script>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls block until the returned semaphore receives permits.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let service = Self {
            script: Arc::new(Script {
                gate: Some(Arc::clone(&gate)),
                ..Default::default()
            }),
        };
        (service, gate)
    }

    pub fn push_plan(&self, plan: Reply<Plan>) -> &Self {
        self.script.plans.lock().unwrap().push_back(plan);
        self
    }

    pub fn push_narrative(&self, narrative: Reply<String>) -> &Self {
        self.script.narratives.lock().unwrap().push_back(narrative);
        self
    }

    pub fn push_reply(&self, reply: Reply<String>) -> &Self {
        self.script.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn sent(&self) -> Vec<(Vec<ChatTurn>, String)> {
        self.script.sent.lock().unwrap().clone()
    }

    pub fn sessions(&self) -> Vec<Vec<ChatTurn>> {
        self.script.sessions.lock().unwrap().clone()
    }
}

struct ScriptedSession {
    script: Arc<Script>,
}

#[async_trait]
impl ChatSession for ScriptedSession {
    async fn send(&self, history: &[ChatTurn], text: &str) -> Reply<String> {
        self.script
            .sent
            .lock()
            .unwrap()
            .push((history.to_vec(), text.to_string()));
        self.script.pass_gate().await;
        next(&self.script.replies, "reply")
    }
}

#[async_trait]
impl GenerativeService for ScriptedService {
    fn create_conversation(
        &self,
        _system_instruction: &str,
        seed_history: Vec<ChatTurn>,
    ) -> Arc<dyn ChatSession> {
        self.script.sessions.lock().unwrap().push(seed_history);
        Arc::new(ScriptedSession {
            script: Arc::clone(&self.script),
        })
    }

    async fn generate_plan(&self, _profile: &HealthProfile) -> Reply<Plan> {
        next(&self.script.plans, "plan")
    }

    async fn generate_day_narrative(
        &self,
        _day: Day,
        _meals: &DayMeals,
        _profile: &HealthProfile,
    ) -> Reply<String> {
        self.script.pass_gate().await;
        next(&self.script.narratives, "narrative")
    }
}

/// A proposal reply carrying `plan`.
pub(crate) fn revision_reply(text: &str, plan: &Plan) -> String {
    serde_json::json!({ "responseText": text, "newPlan": plan }).to_string()
}
