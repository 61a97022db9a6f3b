use tracing::warn;

use super::path::{get_nested, set_nested};

/// Enforce that the workspace layer can only make the gate stricter.
///
/// Call after merging the workspace layer. `baseline` is the merged config
/// before the workspace layer was applied, so enforcement works even when no
/// user config exists.
///
/// - `gate.confirmation_timeout_secs` can only shrink.
/// - `gate.extra_deny` and `gate.extra_confirm` can only gain entries.
pub fn enforce_restrictions(
    merged: &mut toml::Value,
    baseline: &toml::Value,
    workspace_layer: &toml::Value,
) {
    clamp_max_int(
        merged,
        baseline,
        workspace_layer,
        &["gate", "confirmation_timeout_secs"],
        "gate.confirmation_timeout_secs",
    );
    union_arrays(
        merged,
        baseline,
        workspace_layer,
        &["gate", "extra_deny"],
        "gate.extra_deny",
    );
    union_arrays(
        merged,
        baseline,
        workspace_layer,
        &["gate", "extra_confirm"],
        "gate.extra_confirm",
    );
}

/// Clamp an integer field so workspace cannot increase it beyond baseline.
fn clamp_max_int(
    merged: &mut toml::Value,
    baseline: &toml::Value,
    workspace: &toml::Value,
    path: &[&str],
    field_name: &str,
) {
    let baseline_val = get_nested(baseline, path).and_then(toml::Value::as_integer);
    let ws_val = get_nested(workspace, path).and_then(toml::Value::as_integer);

    if let (Some(base_v), Some(ws_v)) = (baseline_val, ws_val)
        && ws_v > base_v
    {
        warn!(
            "Workspace config tried to increase {field_name} from {base_v} to {ws_v}; \
             clamping to {base_v}"
        );
        set_nested(merged, path, toml::Value::Integer(base_v));
    }
}

/// Union the workspace array with the baseline array: workspace can only add
/// entries, not remove them.
fn union_arrays(
    merged: &mut toml::Value,
    baseline: &toml::Value,
    workspace: &toml::Value,
    path: &[&str],
    field_name: &str,
) {
    let baseline_arr = get_nested(baseline, path).and_then(|v| v.as_array().cloned());
    let ws_present = get_nested(workspace, path).is_some_and(toml::Value::is_array);

    if let (Some(baseline_items), true) = (baseline_arr, ws_present) {
        let mut result = get_nested(merged, path)
            .and_then(|v| v.as_array().cloned())
            .unwrap_or_default();

        for item in baseline_items {
            if !result.contains(&item) {
                warn!(
                    "Workspace config removed an entry from {field_name}; restoring it \
                     (workspace can only add, not remove)"
                );
                result.push(item);
            }
        }

        set_nested(merged, path, toml::Value::Array(result));
    }
}
