use serde_json::Value;

const MISSING: &str = "N/A";

/// Renders a field for display: strings unquoted, other values as JSON text.
fn field(item: &Value, key: &str) -> String {
    match item.get(key) {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn items(document: &Value) -> &[Value] {
    document.as_array().map(Vec::as_slice).unwrap_or_default()
}

/// One `ID: .., Name: ..` line per project.
pub fn format_projects(projects: &Value) -> String {
    let projects = items(projects);
    if projects.is_empty() {
        return "No projects found.".to_string();
    }

    projects
        .iter()
        .map(|p| format!("ID: {}, Name: {}", field(p, "id"), field(p, "name")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per task. Due date and priority appear only when they carry
/// information (priority 1 is the API's default).
pub fn format_tasks(tasks: &Value) -> String {
    let tasks = items(tasks);
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }

    tasks
        .iter()
        .map(|task| {
            let mut line = format!(
                "ID: {}, Content: {}",
                field(task, "id"),
                field(task, "content")
            );
            if let Some(due) = task.get("due").filter(|d| is_truthy(d)) {
                line.push_str(&format!(", Due: {}", field(due, "date")));
            }
            if let Some(priority) = task.get("priority").filter(|p| p.as_i64() != Some(1)) {
                line.push_str(&format!(", Priority: {}", priority));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(_) => true,
    }
}
