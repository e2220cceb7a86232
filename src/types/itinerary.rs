use crate::response_schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A generated trip plan. Built once from a validated service response and never mutated;
/// a new generation produces a new instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[response_schema(name = "TripItinerary")]
pub struct TripItinerary {
    /// Destination name as it should appear in the document (e.g. "东京")
    #[schemars(length(min = 1))]
    pub destination_name: String,
    /// Headline of the plan (e.g. "东京三日游")
    #[schemars(length(min = 1))]
    pub trip_title: String,
    /// One-paragraph overview of the trip
    #[schemars(length(min = 1))]
    pub summary: String,
    /// Items to bring, in display order
    pub packing_list: Vec<String>,
    /// Estimated local spend per category, in CNY
    pub budget_breakdown: Vec<BudgetCategory>,
    /// Day-by-day plan, ordered by day number
    pub days: Vec<TripDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BudgetCategory {
    /// Spending category (e.g. 住宿, 餐饮, 交通, 活动/门票)
    pub category: String,
    /// Estimated cost in CNY
    #[schemars(range(min = 0))]
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TripDay {
    /// 1-based day counter
    pub day_number: u32,
    /// Short theme for the day
    pub theme: String,
    /// Activities in chronological order
    pub activities: Vec<TripActivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TripActivity {
    /// Display time such as "09:00" or "上午"; never parsed
    pub time: String,
    /// Name of the activity or attraction
    pub activity: String,
    /// What to do there
    pub description: String,
    /// Real place name
    pub location: String,
}

impl TripItinerary {
    /// Sum of every budget amount. An empty breakdown totals 0.
    pub fn budget_total(&self) -> f64 {
        self.budget_breakdown.iter().map(|entry| entry.amount).sum()
    }

    pub fn activity_count(&self) -> usize {
        self.days.iter().map(|day| day.activities.len()).sum()
    }
}
