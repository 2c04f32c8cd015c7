//! Checklist-item collaborators.
//!
//! Trackers can link to a checklist item on their card, and the edit surface
//! needs the card's items to offer and resolve that link. What is reachable
//! depends on capability:
//! - [`RestChecklist`] queries the board API with stored credentials.
//! - [`SnapshotChecklist`] reads a card snapshot without any credentials;
//!   snapshots vary by host version, so parsing is shape-tolerant.
//! - [`NoChecklist`] is for contexts with no checklist capability at all.
//!
//! Every source degrades to an empty list instead of failing; a missing
//! checklist never blocks tracker work. [`ChecklistChain`] composes sources
//! in preference order.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// Default board API endpoint for the REST source.
pub const DEFAULT_API_BASE: &str = "https://api.trello.com/1";

/// One checklist item on the card, flattened across checklists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub id: String,
    pub name: String,
    pub checklist_name: String,
}

/// Lists the checklist items available for linking.
#[async_trait]
pub trait ChecklistSource: Send + Sync {
    /// Returns the card's checklist items, or an empty list when the source
    /// cannot deliver.
    async fn list_items(&self) -> Vec<ChecklistItem>;
}

/// Sorts items by checklist name, then item name.
pub fn sort_items(items: &mut [ChecklistItem]) {
    items.sort_by(|a, b| {
        a.checklist_name
            .cmp(&b.checklist_name)
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Display name for a linked item id, if the list knows it.
pub fn item_name(items: &[ChecklistItem], id: &str) -> Option<String> {
    items
        .iter()
        .find(|item| item.id == id)
        .map(|item| item.name.clone())
}

#[derive(Debug, Deserialize)]
struct RestChecklistBody {
    name: Option<String>,
    #[serde(default, rename = "checkItems")]
    check_items: Vec<RestCheckItem>,
}

#[derive(Debug, Deserialize)]
struct RestCheckItem {
    id: String,
    name: String,
}

/// Authorized REST source: full item listing via the board API.
pub struct RestChecklist {
    client: reqwest::Client,
    base_url: String,
    card_id: String,
    key: String,
    token: String,
}

impl RestChecklist {
    pub fn new(
        base_url: impl Into<String>,
        card_id: impl Into<String>,
        key: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
            card_id: card_id.into(),
            key: key.into(),
            token: token.into(),
        }
    }

    async fn fetch(&self) -> Result<Vec<ChecklistItem>, reqwest::Error> {
        let url = format!("{}/cards/{}/checklists", self.base_url, self.card_id);
        let checklists: Vec<RestChecklistBody> = self
            .client
            .get(&url)
            .query(&[
                ("checkItems", "all"),
                ("fields", "name"),
                ("checkItem_fields", "name"),
                ("key", self.key.as_str()),
                ("token", self.token.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut items = Vec::new();
        for checklist in checklists {
            let checklist_name = checklist
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "Checklist".to_string());
            for item in checklist.check_items {
                items.push(ChecklistItem {
                    id: item.id,
                    name: item.name,
                    checklist_name: checklist_name.clone(),
                });
            }
        }
        sort_items(&mut items);
        Ok(items)
    }
}

#[async_trait]
impl ChecklistSource for RestChecklist {
    async fn list_items(&self) -> Vec<ChecklistItem> {
        match self.fetch().await {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, "checklist fetch failed; continuing without items");
                Vec::new()
            }
        }
    }
}

/// Credential-free source reading a card snapshot.
///
/// Snapshot checklists have appeared under `checkItems`, `items`, and
/// `checkItemStates`, with item ids under `id` or `idCheckItem`; entries
/// missing an id or a name are dropped and duplicates collapse to the first
/// occurrence.
pub struct SnapshotChecklist {
    card: Value,
}

impl SnapshotChecklist {
    pub fn new(card: Value) -> Self {
        Self { card }
    }
}

fn parse_snapshot(card: &Value) -> Vec<ChecklistItem> {
    let mut items = Vec::new();
    let Some(lists) = card.get("checklists").and_then(Value::as_array) else {
        return items;
    };

    let mut seen = HashSet::new();
    for list in lists {
        let list_name = list
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or("Checklist");

        let entries = ["checkItems", "items", "checkItemStates"]
            .iter()
            .find_map(|key| list.get(*key).and_then(Value::as_array));
        let Some(entries) = entries else {
            continue;
        };

        for entry in entries {
            let id = entry
                .get("id")
                .and_then(Value::as_str)
                .or_else(|| entry.get("idCheckItem").and_then(Value::as_str));
            let name = entry.get("name").and_then(Value::as_str);
            let (Some(id), Some(name)) = (id, name) else {
                continue;
            };
            if id.is_empty() || name.is_empty() {
                continue;
            }
            if !seen.insert(id.to_string()) {
                continue;
            }
            items.push(ChecklistItem {
                id: id.to_string(),
                name: name.to_string(),
                checklist_name: list_name.to_string(),
            });
        }
    }

    sort_items(&mut items);
    items
}

#[async_trait]
impl ChecklistSource for SnapshotChecklist {
    async fn list_items(&self) -> Vec<ChecklistItem> {
        parse_snapshot(&self.card)
    }
}

/// Source for contexts with no checklist capability.
pub struct NoChecklist;

#[async_trait]
impl ChecklistSource for NoChecklist {
    async fn list_items(&self) -> Vec<ChecklistItem> {
        Vec::new()
    }
}

/// Tries the primary source first, falling back when it yields nothing.
pub struct ChecklistChain<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> ChecklistChain<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl<P: ChecklistSource, F: ChecklistSource> ChecklistSource for ChecklistChain<P, F> {
    async fn list_items(&self) -> Vec<ChecklistItem> {
        let items = self.primary.list_items().await;
        if !items.is_empty() {
            return items;
        }
        self.fallback.list_items().await
    }
}
