//! Heuristic fallback planner
//!
//! Derives a day-by-day plan from the profile and goals text with no remote
//! dependency. Output uses the same Priorities / Plan / Notes sections the
//! remote model is asked for, so callers see one shape regardless of source.
//! It cannot fail and never returns empty text.

use profilestore::Profile;
use tracing::debug;

/// Goal chunks used when the user supplied nothing usable
pub const DEFAULT_CHUNKS: [&str; 3] = ["general review", "make progress on main project", "study/practice"];

/// Advisory notes disclosing the offline origin of the plan
pub const OFFLINE_NOTES: [&str; 2] = [
    "This plan was generated offline because the remote planner was unavailable.",
    "Re-run /plan once remote access is restored for a more tailored plan.",
];

/// Hours per day assumed when the profile gives no availability
pub const DEFAULT_HOURS_PER_DAY: f64 = 1.0;

/// Lower bound on the estimate attached to each item
pub const MIN_MINUTES_PER_ITEM: i64 = 20;

const MAX_PRIORITIES: usize = 5;
const MIN_ITEMS_PER_DAY: usize = 2;
const MAX_ITEMS_PER_DAY: usize = 4;

/// One bullet in a day's plan
#[derive(Debug, Clone, PartialEq)]
pub struct PlanItem {
    pub task: String,
    pub minutes: i64,
}

/// Structured form of a heuristic plan, rendered to text for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicPlan {
    pub priorities: Vec<String>,
    pub days: Vec<Vec<PlanItem>>,
    pub notes: Vec<String>,
}

impl HeuristicPlan {
    /// Render as Priorities, Plan (days separated by a blank line), Notes
    pub fn render(&self) -> String {
        let mut out = String::from("Priorities:\n");
        for priority in &self.priorities {
            out.push_str(&format!("- {}\n", priority));
        }

        out.push_str("\nPlan:\n");
        let days: Vec<String> = self
            .days
            .iter()
            .enumerate()
            .map(|(i, items)| {
                let mut day = format!("D{}:\n", i + 1);
                for item in items {
                    day.push_str(&format!("- {} (~{} min)\n", item.task, item.minutes));
                }
                day
            })
            .collect();
        out.push_str(&days.join("\n"));

        out.push_str("\nNotes:\n");
        let notes: Vec<String> = self.notes.iter().map(|n| format!("- {}", n)).collect();
        out.push_str(&notes.join("\n"));
        out
    }
}

/// Deterministic local planner
#[derive(Debug, Clone, Copy)]
pub struct FallbackPlanner {
    planning_days: u32,
}

impl FallbackPlanner {
    pub fn new(planning_days: u32) -> Self {
        Self { planning_days }
    }

    /// Horizon actually planned: never less than one day
    pub fn days(&self) -> usize {
        self.planning_days.max(1) as usize
    }

    /// Build the structured plan
    pub fn build(&self, profile: &Profile, goals_text: Option<&str>) -> HeuristicPlan {
        let days = self.days();
        let hours_per_day = effective_hours_per_day(profile, days);
        let chunks = goal_chunks(goals_text);
        let items_per_day = items_per_day(chunks.len());
        let minutes = minutes_per_item(hours_per_day, items_per_day);
        debug!(
            %days,
            %hours_per_day,
            chunk_count = chunks.len(),
            %items_per_day,
            %minutes,
            "FallbackPlanner::build: resolved"
        );

        let priorities = chunks.iter().take(MAX_PRIORITIES).cloned().collect();

        HeuristicPlan {
            priorities,
            days: schedule(&chunks, days, items_per_day, minutes),
            notes: OFFLINE_NOTES.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Build and render the plan text
    pub fn plan(&self, profile: &Profile, goals_text: Option<&str>) -> String {
        self.build(profile, goals_text).render()
    }
}

/// Daily hours: explicit daily figure, else weekly spread over the horizon, else 1.0
pub fn effective_hours_per_day(profile: &Profile, days: usize) -> f64 {
    if let Some(daily) = profile.hours_per_day {
        return daily;
    }
    if let Some(weekly) = profile.hours_per_week {
        let days = days.max(1) as f64;
        return (weekly / days * 100.0).round() / 100.0;
    }
    DEFAULT_HOURS_PER_DAY
}

/// Split goals on newline, comma or semicolon; default triple when nothing remains
pub fn goal_chunks(goals_text: Option<&str>) -> Vec<String> {
    let chunks: Vec<String> = goals_text
        .unwrap_or("")
        .split(['\n', ',', ';'])
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();

    if chunks.is_empty() {
        debug!("goal_chunks: no usable goals, using defaults");
        return DEFAULT_CHUNKS.iter().map(|c| c.to_string()).collect();
    }
    chunks
}

/// Fill `days` x `items_per_day` slots by cycling through the chunks
///
/// The cycle runs across day boundaries rather than restarting each day.
pub fn schedule(chunks: &[String], days: usize, items_per_day: usize, minutes: i64) -> Vec<Vec<PlanItem>> {
    if chunks.is_empty() {
        return vec![Vec::new(); days];
    }

    (0..days)
        .map(|day| {
            (0..items_per_day)
                .map(|slot| PlanItem {
                    task: chunks[(day * items_per_day + slot) % chunks.len()].clone(),
                    minutes,
                })
                .collect()
        })
        .collect()
}

/// Items per day: chunk count clamped to 2..=4
pub fn items_per_day(chunk_count: usize) -> usize {
    chunk_count.clamp(MIN_ITEMS_PER_DAY, MAX_ITEMS_PER_DAY)
}

/// Minutes per item: even split of the daily budget, floored at 20
pub fn minutes_per_item(hours_per_day: f64, items_per_day: usize) -> i64 {
    let minutes_per_day = (hours_per_day * 60.0).floor() as i64;
    let items = items_per_day.max(1) as i64;
    minutes_per_day.div_euclid(items).max(MIN_MINUTES_PER_ITEM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile::new("Ada", "student")
    }

    #[test]
    fn test_minute_floor() {
        // 0.1h/day is 6 minutes; split four ways would be 1
        assert_eq!(minutes_per_item(0.1, 4), 20);
        assert_eq!(minutes_per_item(0.0, 2), 20);
    }

    #[test]
    fn test_minutes_even_split() {
        assert_eq!(minutes_per_item(2.0, 4), 30);
        assert_eq!(minutes_per_item(1.0, 2), 30);
        assert_eq!(minutes_per_item(1.5, 4), 22);
        assert_eq!(minutes_per_item(3.0, 3), 60);
    }

    #[test]
    fn test_weekly_to_daily() {
        let p = profile().with_hours_per_week(14.0);
        assert_eq!(effective_hours_per_day(&p, 7), 2.0);

        let p = profile().with_hours_per_week(10.0);
        assert_eq!(effective_hours_per_day(&p, 7), 1.43);
        assert_eq!(effective_hours_per_day(&p, 3), 3.33);
    }

    #[test]
    fn test_daily_wins_over_weekly() {
        let p = profile().with_hours_per_day(3.0).with_hours_per_week(7.0);
        assert_eq!(effective_hours_per_day(&p, 7), 3.0);
    }

    #[test]
    fn test_default_hours() {
        assert_eq!(effective_hours_per_day(&profile(), 7), 1.0);
    }

    #[test]
    fn test_goal_chunks_split_and_trim() {
        let chunks = goal_chunks(Some("thesis on SSL;  db course ,\nguitar\n\n; ,"));
        assert_eq!(chunks, vec!["thesis on SSL", "db course", "guitar"]);
    }

    #[test]
    fn test_goal_chunks_default() {
        let expected: Vec<String> = DEFAULT_CHUNKS.iter().map(|c| c.to_string()).collect();
        assert_eq!(goal_chunks(None), expected);
        assert_eq!(goal_chunks(Some("")), expected);
        assert_eq!(goal_chunks(Some(" ,;\n ")), expected);
    }

    #[test]
    fn test_items_per_day_clamped() {
        assert_eq!(items_per_day(1), 2);
        assert_eq!(items_per_day(2), 2);
        assert_eq!(items_per_day(3), 3);
        assert_eq!(items_per_day(4), 4);
        assert_eq!(items_per_day(9), 4);
    }

    #[test]
    fn test_round_robin_wraps() {
        let chunks = vec!["a".to_string(), "b".to_string()];
        let days = schedule(&chunks, 2, 3, 20);

        let day1: Vec<&str> = days[0].iter().map(|i| i.task.as_str()).collect();
        let day2: Vec<&str> = days[1].iter().map(|i| i.task.as_str()).collect();
        assert_eq!(day1, vec!["a", "b", "a"]);
        assert_eq!(day2, vec!["b", "a", "b"]);
        assert!(days.iter().flatten().all(|i| i.minutes == 20));
    }

    #[test]
    fn test_two_chunks_fill_two_slots() {
        let plan = FallbackPlanner::new(2).build(&profile(), Some("a, b"));
        for day in &plan.days {
            let tasks: Vec<&str> = day.iter().map(|i| i.task.as_str()).collect();
            assert_eq!(tasks, vec!["a", "b"]);
        }
    }

    #[test]
    fn test_round_robin_continues_across_days() {
        let plan = FallbackPlanner::new(2).build(&profile(), Some("a; b; c"));
        let day1: Vec<&str> = plan.days[0].iter().map(|i| i.task.as_str()).collect();
        let day2: Vec<&str> = plan.days[1].iter().map(|i| i.task.as_str()).collect();
        assert_eq!(day1, vec!["a", "b", "c"]);
        assert_eq!(day2, vec!["a", "b", "c"]);

        let plan = FallbackPlanner::new(2).build(&profile(), Some("a, b, c, d, e"));
        let day2: Vec<&str> = plan.days[1].iter().map(|i| i.task.as_str()).collect();
        assert_eq!(day2, vec!["e", "a", "b", "c"]);
    }

    #[test]
    fn test_priorities_capped_at_five() {
        let plan = FallbackPlanner::new(1).build(&profile(), Some("1,2,3,4,5,6,7"));
        assert_eq!(plan.priorities, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_empty_goals_use_default_priorities() {
        let plan = FallbackPlanner::new(7).build(&profile(), Some(""));
        assert_eq!(
            plan.priorities,
            vec!["general review", "make progress on main project", "study/practice"]
        );
    }

    #[test]
    fn test_zero_days_clamped_to_one() {
        let plan = FallbackPlanner::new(0).build(&profile(), None);
        assert_eq!(plan.days.len(), 1);
    }

    #[test]
    fn test_render_layout() {
        let text = FallbackPlanner::new(2).plan(&profile().with_hours_per_day(1.0), Some("read, write"));
        let expected = "\
Priorities:
- read
- write

Plan:
D1:
- read (~30 min)
- write (~30 min)

D2:
- read (~30 min)
- write (~30 min)

Notes:
- This plan was generated offline because the remote planner was unavailable.
- Re-run /plan once remote access is restored for a more tailored plan.";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_deterministic() {
        let planner = FallbackPlanner::new(7);
        let p = profile().with_hours_per_week(10.0);
        let first = planner.plan(&p, Some("thesis; db course; guitar"));
        for _ in 0..5 {
            assert_eq!(planner.plan(&p, Some("thesis; db course; guitar")), first);
        }
    }

    #[test]
    fn test_never_empty() {
        let text = FallbackPlanner::new(0).plan(&Profile::default(), None);
        assert!(!text.trim().is_empty());
        assert!(text.contains("Priorities:"));
        assert!(text.contains("Plan:"));
        assert!(text.contains("Notes:"));
    }
}
