//! Line-item input normalization
//!
//! Guest clients submit order lines in several shapes: structured JSON
//! objects, JSON-encoded strings, and (from older chat-app builds)
//! malformed fragments like `square_item_id: "X", quantity: 2`. This
//! module turns all of them into a single resolved [`LineItem`] form, or a
//! [`NormalizeError`] for inputs that carry neither a catalog reference
//! nor a usable name/price pair.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw inbound item, as supplied by a client or decoded from a string.
///
/// Every field is optional; `quantity` and `price` accept any JSON value
/// and are coerced during normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLineItem {
    pub square_item_id: Option<String>,
    pub name: Option<String>,
    pub price: Option<Value>,
    pub quantity: Option<Value>,
    pub note: Option<String>,
}

/// Tagged input variant: a structured record, or a free-form string that
/// still has to be decoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ItemInput {
    Structured(RawLineItem),
    Text(String),
}

/// Fully normalized line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub target: LineItemTarget,
    pub quantity: i64,
    pub note: String,
}

/// What the line resolves to: a catalog reference or an ad-hoc pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineItemTarget {
    Catalog { square_item_id: String },
    AdHoc { name: String, price: i64 },
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum NormalizeError {
    #[error("item is neither JSON nor a recognizable fragment: {0:?}")]
    Unparseable(String),

    #[error("item has neither a catalog reference nor a name/price pair")]
    MissingTarget,
}

/// Normalize a single input item.
pub fn normalize_item(input: ItemInput) -> Result<LineItem, NormalizeError> {
    match input {
        ItemInput::Structured(raw) => from_raw(raw),
        ItemInput::Text(text) => {
            let raw = match serde_json::from_str::<RawLineItem>(&text) {
                Ok(raw) => raw,
                Err(_) => extract_fragment(&text)
                    .ok_or_else(|| NormalizeError::Unparseable(preview(&text)))?,
            };
            from_raw(raw)
        }
    }
}

/// Normalize a batch, partitioning into usable items and dropped inputs.
pub fn normalize_items(inputs: Vec<ItemInput>) -> (Vec<LineItem>, Vec<NormalizeError>) {
    let mut items = Vec::with_capacity(inputs.len());
    let mut dropped = Vec::new();
    for input in inputs {
        match normalize_item(input) {
            Ok(item) => items.push(item),
            Err(e) => dropped.push(e),
        }
    }
    (items, dropped)
}

fn from_raw(raw: RawLineItem) -> Result<LineItem, NormalizeError> {
    // Optional fields never reject an item on their own
    let quantity = coerce_quantity(raw.quantity.as_ref());
    let note = raw.note.unwrap_or_default();

    if let Some(id) = raw.square_item_id
        && !id.trim().is_empty()
    {
        return Ok(LineItem {
            target: LineItemTarget::Catalog {
                square_item_id: id.trim().to_string(),
            },
            quantity,
            note,
        });
    }

    match (raw.name, raw.price.as_ref().and_then(coerce_i64)) {
        (Some(name), Some(price)) if !name.trim().is_empty() => Ok(LineItem {
            target: LineItemTarget::AdHoc {
                name: name.trim().to_string(),
                price,
            },
            quantity,
            note,
        }),
        _ => Err(NormalizeError::MissingTarget),
    }
}

/// Missing or invalid quantities default to 1; anything below 1 is lifted
/// to 1 rather than rejecting the item.
fn coerce_quantity(value: Option<&Value>) -> i64 {
    value.and_then(coerce_i64).filter(|q| *q >= 1).unwrap_or(1)
}

fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Best-effort extraction from a malformed fragment.
///
/// Accepts anything that still names a `square_item_id`; quantity is
/// picked up when present. Returns None when no item reference exists.
fn extract_fragment(text: &str) -> Option<RawLineItem> {
    let id = extract_string_value(text, "square_item_id")?;
    let quantity = extract_integer_value(text, "quantity").map(Value::from);
    Some(RawLineItem {
        square_item_id: Some(id),
        quantity,
        ..Default::default()
    })
}

fn extract_string_value(text: &str, key: &str) -> Option<String> {
    let at = text.find(key)?;
    let rest = text[at + key.len()..].trim_start_matches([' ', '\t', ':', '=']);
    let value = if let Some(stripped) = rest.strip_prefix('"') {
        stripped.split('"').next()?
    } else if let Some(stripped) = rest.strip_prefix('\'') {
        stripped.split('\'').next()?
    } else {
        rest.split([',', ' ', '\t', '}', '\n']).next()?
    };
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

fn extract_integer_value(text: &str, key: &str) -> Option<i64> {
    let at = text.find(key)?;
    let digits: String = text[at + key.len()..]
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn preview(text: &str) -> String {
    const MAX: usize = 80;
    if text.len() <= MAX {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX).collect();
        format!("{cut}…")
    }
}
