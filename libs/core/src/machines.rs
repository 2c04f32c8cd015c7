//! Canonical machine set and jet preselection from card custom fields.

use serde_json::Value;

/// The three waterjet machines a board tracks, in display order.
pub const JETS: [&str; 3] = ["Waterjet 1", "Waterjet 2", "Waterjet 3"];

/// Custom field consulted for jet preselection, compared case-insensitively.
const MACHINE_FIELD: &str = "machine(s)";

/// Guesses a jet selection from a card's `Machine(s)` custom field.
///
/// Both dropdown selections and free-text values count. Text is split on
/// commas and newlines, and a chunk selects a machine when it mentions it by
/// number (`#2`) or by name (`waterjet 2`), case-insensitively. Returns the
/// matched jets in canonical order, or `None` when the field is absent or
/// nothing matches.
#[must_use]
pub fn guess_jets(card: &Value) -> Option<Vec<String>> {
    let items = card.get("customFieldItems")?.as_array()?;
    let fields = card.get("customFields")?.as_array()?;
    if items.is_empty() || fields.is_empty() {
        return None;
    }

    let mut selected = [false; JETS.len()];

    for item in items {
        let Some(field_id) = item.get("idCustomField").and_then(Value::as_str) else {
            continue;
        };
        let Some(field) = fields
            .iter()
            .find(|f| f.get("id").and_then(Value::as_str) == Some(field_id))
        else {
            continue;
        };

        let name = field.get("name").and_then(Value::as_str).unwrap_or("");
        if name.trim().to_lowercase() != MACHINE_FIELD {
            continue;
        }

        // Dropdown value: resolve the selected option's label.
        if let Some(id_value) = item.get("idValue").and_then(Value::as_str) {
            if let Some(option) = field
                .get("options")
                .and_then(Value::as_array)
                .and_then(|options| {
                    options
                        .iter()
                        .find(|o| o.get("id").and_then(Value::as_str) == Some(id_value))
                })
            {
                let text = option
                    .pointer("/value/text")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                mark_chunk(text, &mut selected);
            }
        }

        // Free-text value: each comma or newline separated chunk can name a
        // machine.
        if let Some(text) = item.pointer("/value/text").and_then(Value::as_str) {
            for chunk in text.split([',', '\n']) {
                mark_chunk(chunk.trim(), &mut selected);
            }
        }
    }

    let picked: Vec<String> = JETS
        .iter()
        .zip(selected)
        .filter_map(|(jet, on)| on.then(|| (*jet).to_string()))
        .collect();
    if picked.is_empty() {
        None
    } else {
        Some(picked)
    }
}

fn mark_chunk(chunk: &str, selected: &mut [bool; JETS.len()]) {
    let text = chunk.to_lowercase();
    if text.is_empty() {
        return;
    }
    for (i, flag) in selected.iter_mut().enumerate() {
        if text.contains(&format!("#{}", i + 1)) || text.contains(&format!("waterjet {}", i + 1)) {
            *flag = true;
        }
    }
}

/// Jet selection a fresh tracker starts from: the guessed machines when the
/// card names them, otherwise the full machine set.
#[must_use]
pub fn default_jets(card: Option<&Value>) -> Vec<String> {
    card.and_then(guess_jets)
        .unwrap_or_else(|| JETS.iter().map(|j| (*j).to_string()).collect())
}
