//! Test fixtures - entity definitions and solution descriptors.

use serde_json::{json, Value};

/// Minimal descriptor: everything defaulted under the descriptor directory.
pub const EMPTY_SOLUTION: &str = "# modeldex test solution\n";

/// Builder for an entity definition document.
///
/// ```ignore
/// let doc = EntityDoc::new("Customer")
///     .attribute("id", "int")
///     .source("/Raw/Sales/Customer/Customer", &[("id", "id")])
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct EntityDoc {
    name: String,
    description: Option<String>,
    tags: Vec<String>,
    attributes: Vec<Value>,
    sources: Vec<Value>,
    relationships: Vec<Value>,
}

impl EntityDoc {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            tags: Vec::new(),
            attributes: Vec::new(),
            sources: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn attribute(mut self, name: &str, data_type: &str) -> Self {
        self.attributes.push(json!({
            "name": name,
            "dataType": { "type": data_type, "nullable": false }
        }));
        self
    }

    /// A `model` source; `mapping` pairs are `(local, referenced)`.
    pub fn source(mut self, locator: &str, mapping: &[(&str, &str)]) -> Self {
        let mapping: Vec<Value> = mapping
            .iter()
            .map(|(local, referenced)| json!({ "target": local, "source": referenced }))
            .collect();
        self.sources.push(json!({
            "type": "model",
            "locator": locator,
            "mapping": mapping
        }));
        self
    }

    /// An external `source` entry; never resolved.
    pub fn external_source(mut self, locator: &str) -> Self {
        self.sources.push(json!({ "type": "source", "locator": locator }));
        self
    }

    /// A relationship; `fields` pairs are `(local, referenced key)`.
    pub fn relationship(mut self, locator: &str, role: &str, fields: &[(&str, &str)]) -> Self {
        let fields: Vec<Value> = fields
            .iter()
            .map(|(local, key)| json!({ "attribute": local, "keyAttribute": key }))
            .collect();
        self.relationships.push(json!({
            "locator": locator,
            "role": role,
            "fields": fields
        }));
        self
    }

    pub fn build(self) -> Value {
        let mut entity = json!({
            "name": self.name,
            "displayName": self.name,
            "tags": self.tags,
            "attribute": self.attributes,
        });
        if let Some(description) = self.description {
            entity["description"] = json!(description);
        }
        json!({
            "type": "entity",
            "entity": entity,
            "functions": { "sources": self.sources },
            "relationships": self.relationships
        })
    }
}

/// A keyed entity with only an `id` attribute.
pub fn keyed(name: &str) -> EntityDoc {
    EntityDoc::new(name).attribute("id", "int")
}

/// Raw -> Stage -> Core -> Curated customer chain, plus an unrelated Raw product.
pub fn customer_chain() -> Vec<(&'static str, Value)> {
    vec![
        (
            "/Raw/Sales/Customer/Customer",
            keyed("Customer").attribute("name", "string").build(),
        ),
        (
            "/Stage/Sales/Customer/Customer",
            keyed("Customer")
                .attribute("name", "string")
                .source("/Raw/Sales/Customer/Customer", &[("id", "id"), ("name", "name")])
                .build(),
        ),
        (
            "/Core/Sales/Customer/Customer",
            keyed("Customer")
                .source("/Stage/Sales/Customer/Customer", &[("id", "id")])
                .build(),
        ),
        (
            "/Curated/Sales/Customer/CustomerMart",
            keyed("CustomerMart")
                .source("/Core/Sales/Customer/Customer", &[("id", "id")])
                .build(),
        ),
        (
            "/Raw/Finance/Ledger/Account",
            keyed("Account").attribute("balance", "decimal").build(),
        ),
    ]
}
