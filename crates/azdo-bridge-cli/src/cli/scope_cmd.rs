use super::*;
use serde_json::{Value, json};

pub(super) fn handle_scope(args: ScopeArgs) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&scope_report(&args)?)?);
    Ok(())
}

pub(super) fn scope_report(args: &ScopeArgs) -> anyhow::Result<Value> {
    let scope = translate(&args.group, args.project.as_deref().unwrap_or_default());
    let level = format!("{:?}", scope.level()).to_lowercase();
    let mut report = serde_json::to_value(&scope).context("serialize scope")?;
    if let Value::Object(fields) = &mut report {
        fields.insert("level".to_string(), json!(level));
    }
    Ok(report)
}
