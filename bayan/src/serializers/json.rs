use crate::evaluator::Solution;
use crate::keywords::Keyword;
use crate::knowledge_base::KnowledgeBase;
use crate::BayanError;
use serde_json::{Map, Value};

/// Serialize one JSON value as a Bayan term
fn serialize_value(value: &Value) -> Result<String, BayanError> {
    match value {
        Value::String(s) => Ok(format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(if *b { "true" } else { "false" }.to_string()),
        Value::Array(items) => {
            let items = items
                .iter()
                .map(serialize_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("[{}]", items.join(", ")))
        }
        Value::Null => Err(BayanError::Engine(
            "null has no Bayan representation".to_string(),
        )),
        Value::Object(_) => Err(BayanError::Engine(
            "Nested objects have no Bayan representation".to_string(),
        )),
    }
}

fn validate_predicate_name(name: &str) -> Result<(), BayanError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_alphanumeric() || c == '_');
    if !valid_start || !valid_rest {
        return Err(BayanError::Engine(format!(
            "'{}' is not a valid predicate name",
            name
        )));
    }
    if Keyword::lookup(name).is_some_and(|keyword| !keyword.is_builtin_predicate()) {
        return Err(BayanError::Engine(format!(
            "'{}' is a reserved keyword and cannot name a predicate",
            name
        )));
    }
    Ok(())
}

/// Convert a JSON table of facts into Bayan source
///
/// The input maps predicate names to lists of argument rows:
/// `{"parent": [["Ahmed", "Ali"], ["Ali", "Omar"]]}`. A row that is not an
/// array is treated as a single argument.
pub fn to_bayan_syntax(json: &str) -> Result<String, BayanError> {
    let root: Value = serde_json::from_str(json)
        .map_err(|e| BayanError::Engine(format!("Invalid JSON: {}", e)))?;
    let Value::Object(predicates) = root else {
        return Err(BayanError::Engine(
            "Expected a JSON object mapping predicate names to rows".to_string(),
        ));
    };

    let mut source = String::new();
    for (name, rows) in &predicates {
        validate_predicate_name(name)?;
        let Value::Array(rows) = rows else {
            return Err(BayanError::Engine(format!(
                "Expected an array of rows for '{}', got {}",
                name, rows
            )));
        };
        for row in rows {
            let arguments = match row {
                Value::Array(items) => items
                    .iter()
                    .map(serialize_value)
                    .collect::<Result<Vec<_>, _>>()?,
                single => vec![serialize_value(single)?],
            };
            if arguments.is_empty() {
                source.push_str(&format!("fact {};\n", name));
            } else {
                source.push_str(&format!("fact {}({});\n", name, arguments.join(", ")));
            }
        }
    }
    Ok(source)
}

/// Export the ground facts of a knowledge base in the format read by [`to_bayan_syntax`]
pub fn facts_to_json(knowledge_base: &KnowledgeBase) -> Result<Value, BayanError> {
    let mut predicates = Map::new();
    for key in knowledge_base.predicates() {
        let mut rows = Vec::new();
        for clause in knowledge_base.clauses_for(key) {
            if !clause.is_fact() || !clause.head.arguments.iter().all(|arg| arg.is_ground()) {
                continue;
            }
            let row = serde_json::to_value(&clause.head.arguments)
                .map_err(|e| BayanError::Engine(format!("Failed to serialize fact: {}", e)))?;
            rows.push(row);
        }
        if !rows.is_empty() {
            let entry = predicates
                .entry(key.name.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(existing) = entry {
                existing.extend(rows);
            }
        }
    }
    Ok(Value::Object(predicates))
}

/// Solutions as a JSON array of objects mapping variable names to values
pub fn solutions_to_json(solutions: &[Solution]) -> Result<Value, BayanError> {
    serde_json::to_value(solutions)
        .map_err(|e| BayanError::Engine(format!("Failed to serialize solutions: {}", e)))
}
