use super::*;

fn tasks() -> Vec<Task> {
    vec![
        Task::new("a", "Write report", 5, 3),
        Task::new("b", "Buy milk", 1, 1).with_status(TaskStatus::Done),
        Task::new("c", "Ship release", 4, 5).with_status(TaskStatus::InProgress),
        Task::new("d", "Call mom", 2, 4).with_status(TaskStatus::Other),
    ]
}

fn ids(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().filter_map(Task::layout_id).collect()
}

// =============================================================
// TaskStatus
// =============================================================

#[test]
fn status_serde_names() {
    let cases = [
        (TaskStatus::Todo, "\"todo\""),
        (TaskStatus::InProgress, "\"in-progress\""),
        (TaskStatus::Done, "\"done\""),
    ];
    for (status, expected) in cases {
        assert_eq!(serde_json::to_string(&status).unwrap(), expected);
        let back: TaskStatus = serde_json::from_str(expected).unwrap();
        assert_eq!(back, status);
    }
}

#[test]
fn status_unknown_string_is_other() {
    let status: TaskStatus = serde_json::from_str("\"blocked\"").unwrap();
    assert_eq!(status, TaskStatus::Other);
}

#[test]
fn status_cycle_visits_all_three() {
    let mut s = TaskStatus::Todo;
    s = s.cycled();
    assert_eq!(s, TaskStatus::InProgress);
    s = s.cycled();
    assert_eq!(s, TaskStatus::Done);
    s = s.cycled();
    assert_eq!(s, TaskStatus::Todo);
}

#[test]
fn status_cycle_other_restarts() {
    assert_eq!(TaskStatus::Other.cycled(), TaskStatus::Todo);
}

// =============================================================
// Task
// =============================================================

#[test]
fn task_from_host_json() {
    let raw = r#"{ "id": "42", "title": "Gym", "priority": 3, "importance": 2, "status": "in-progress" }"#;
    let task: Task = serde_json::from_str(raw).unwrap();
    assert_eq!(task.layout_id(), Some("42"));
    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(task.title, "Gym");
}

#[test]
fn task_missing_id_has_no_layout_id() {
    let raw = r#"{ "title": "Draft", "priority": 3, "importance": 2 }"#;
    let task: Task = serde_json::from_str(raw).unwrap();
    assert_eq!(task.layout_id(), None);
    assert_eq!(task.status, TaskStatus::Todo);
}

#[test]
fn task_empty_id_has_no_layout_id() {
    let task = Task::new("", "Nameless", 1, 1);
    assert_eq!(task.layout_id(), None);
}

#[test]
fn task_radius_uses_sizing() {
    let task = Task::new("x", "Big", 5, 5);
    assert!((task.radius() - 80.0).abs() < 1e-9);
}

// =============================================================
// TaskFilter
// =============================================================

#[test]
fn filter_all_keeps_everything() {
    assert_eq!(ids(&TaskFilter::All.apply(&tasks())), vec!["a", "b", "c", "d"]);
}

#[test]
fn filter_by_status() {
    assert_eq!(ids(&TaskFilter::Todo.apply(&tasks())), vec!["a"]);
    assert_eq!(ids(&TaskFilter::InProgress.apply(&tasks())), vec!["c"]);
    assert_eq!(ids(&TaskFilter::Done.apply(&tasks())), vec!["b"]);
}

#[test]
fn filter_high_priority() {
    assert_eq!(ids(&TaskFilter::HighPriority.apply(&tasks())), vec!["a", "c"]);
}

#[test]
fn filter_serde_names() {
    let f: TaskFilter = serde_json::from_str("\"high-priority\"").unwrap();
    assert_eq!(f, TaskFilter::HighPriority);
}
