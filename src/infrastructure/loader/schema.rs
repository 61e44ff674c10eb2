//! Structural validation of entity definitions
//!
//! Walks the raw JSON document and collects every violation instead of
//! stopping at the first one. Unknown keys are allowed; they still count
//! towards the fingerprint.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde_json::{Map, Value};

use crate::domain::entities::{
    Attribute, CardinalityRole, MappingPair, ParameterValue, ReferenceDecl,
};
use crate::domain::value_objects::Layer;
use crate::error::SchemaViolation;

const ENTITY_TYPE: &str = "entity";
const LEGACY_HINT: &str =
    "deprecated v1 definition; migrate to the v2 format (\"type\": \"entity\" with a \"functions\" block)";

/// The parts of a definition the index needs.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Definition {
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub attributes: Vec<Attribute>,
    pub sources: Vec<ReferenceDecl>,
    pub relationships: Vec<ReferenceDecl>,
    pub parameters: BTreeMap<String, ParameterValue>,
    pub tags: BTreeSet<String>,
}

/// Validate `document`, returning the extracted definition or every violation.
pub(crate) fn check_definition(document: &Value) -> Result<Definition, Vec<SchemaViolation>> {
    let mut checker = Checker::default();
    let definition = checker.definition(document);
    match definition {
        Some(definition) if checker.violations.is_empty() => Ok(definition),
        _ => Err(checker.violations),
    }
}

#[derive(Default)]
struct Checker {
    violations: Vec<SchemaViolation>,
}

impl Checker {
    fn violation(&mut self, pointer: impl Into<String>, message: impl Into<String>) {
        self.violations.push(SchemaViolation::new(pointer, message));
    }

    fn definition(&mut self, document: &Value) -> Option<Definition> {
        let Some(root) = document.as_object() else {
            self.violation("", "definition must be a JSON object");
            return None;
        };

        self.check_type(root);

        let entity = match root.get("entity") {
            Some(Value::Object(entity)) => entity,
            Some(_) => {
                self.violation("/entity", "must be an object");
                return None;
            }
            None => {
                self.violation("/entity", "missing required field");
                return None;
            }
        };

        let name = self.non_empty_string(entity, "name", "/entity");
        let display_name = self.optional_string(entity, "displayName", "/entity");
        let description = self.optional_string(entity, "description", "/entity");
        let tags = self.tags(entity);
        let parameters = self.parameters(entity);
        let attributes = self.attributes(entity);

        let local: HashSet<&str> = attributes.iter().map(|a| a.name.as_str()).collect();
        let sources = self.sources(root, &local);
        let relationships = self.relationships(root, &local);

        let name = name?;
        Some(Definition {
            display_name: display_name.unwrap_or_else(|| name.clone()),
            name,
            description,
            attributes,
            sources,
            relationships,
            parameters,
            tags,
        })
    }

    fn check_type(&mut self, root: &Map<String, Value>) {
        let legacy_block = root.contains_key("function");
        match root.get("type") {
            Some(Value::String(t)) if t == ENTITY_TYPE && !legacy_block => {}
            Some(Value::String(t)) if t == ENTITY_TYPE || Layer::from_token(t).is_some() => {
                self.violation("/type", LEGACY_HINT);
            }
            None if legacy_block => self.violation("/type", LEGACY_HINT),
            None => self.violation("/type", "missing required field (expected \"entity\")"),
            Some(other) => {
                self.violation("/type", format!("expected \"entity\", found {}", other))
            }
        }
    }

    fn non_empty_string(
        &mut self,
        object: &Map<String, Value>,
        key: &str,
        parent: &str,
    ) -> Option<String> {
        let pointer = format!("{}/{}", parent, key);
        match object.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(Value::String(_)) => {
                self.violation(pointer, "must not be empty");
                None
            }
            Some(_) => {
                self.violation(pointer, "must be a string");
                None
            }
            None => {
                self.violation(pointer, "missing required field");
                None
            }
        }
    }

    fn optional_string(
        &mut self,
        object: &Map<String, Value>,
        key: &str,
        parent: &str,
    ) -> Option<String> {
        match object.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.violation(format!("{}/{}", parent, key), "must be a string");
                None
            }
        }
    }

    fn optional_bool(&mut self, object: &Map<String, Value>, key: &str, parent: &str) -> Option<bool> {
        match object.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => {
                self.violation(format!("{}/{}", parent, key), "must be a boolean");
                None
            }
        }
    }

    fn optional_u32(&mut self, object: &Map<String, Value>, key: &str, parent: &str) -> Option<u32> {
        match object.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => match value.as_u64().and_then(|n| u32::try_from(n).ok()) {
                Some(n) => Some(n),
                None => {
                    self.violation(
                        format!("{}/{}", parent, key),
                        "must be a non-negative integer",
                    );
                    None
                }
            },
        }
    }

    /// Optional array; anything else is a violation and yields no items.
    fn optional_array<'v>(
        &mut self,
        object: &'v Map<String, Value>,
        key: &str,
        parent: &str,
    ) -> &'v [Value] {
        match object.get(key) {
            None | Some(Value::Null) => &[],
            Some(Value::Array(items)) => items,
            Some(_) => {
                self.violation(format!("{}/{}", parent, key), "must be an array");
                &[]
            }
        }
    }

    fn tags(&mut self, entity: &Map<String, Value>) -> BTreeSet<String> {
        let mut tags = BTreeSet::new();
        for (i, tag) in self.optional_array(entity, "tags", "/entity").iter().enumerate() {
            match tag {
                Value::String(s) => {
                    tags.insert(s.clone());
                }
                _ => self.violation(format!("/entity/tags/{}", i), "must be a string"),
            }
        }
        tags
    }

    fn parameters(&mut self, entity: &Map<String, Value>) -> BTreeMap<String, ParameterValue> {
        let mut parameters = BTreeMap::new();
        for (i, item) in self
            .optional_array(entity, "parameters", "/entity")
            .iter()
            .enumerate()
        {
            let pointer = format!("/entity/parameters/{}", i);
            let Some(object) = item.as_object() else {
                self.violation(pointer, "must be an object");
                continue;
            };
            let name = self.non_empty_string(object, "name", &pointer);
            let value = match object.get("value") {
                Some(Value::Bool(b)) => Some(ParameterValue::Flag(*b)),
                Some(Value::Number(n)) => match n.as_i64() {
                    Some(i) => Some(ParameterValue::Integer(i)),
                    None => n.as_f64().map(ParameterValue::Decimal),
                },
                Some(Value::String(s)) => Some(ParameterValue::Text(s.clone())),
                Some(_) => {
                    self.violation(format!("{}/value", pointer), "must be a scalar value");
                    None
                }
                None => {
                    self.violation(format!("{}/value", pointer), "missing required field");
                    None
                }
            };
            if let (Some(name), Some(value)) = (name, value) {
                if parameters.contains_key(&name) {
                    self.violation(
                        format!("{}/name", pointer),
                        format!("duplicate parameter '{}'", name),
                    );
                } else {
                    parameters.insert(name, value);
                }
            }
        }
        parameters
    }

    fn attributes(&mut self, entity: &Map<String, Value>) -> Vec<Attribute> {
        let mut attributes: Vec<Attribute> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (i, item) in self
            .optional_array(entity, "attribute", "/entity")
            .iter()
            .enumerate()
        {
            let pointer = format!("/entity/attribute/{}", i);
            let Some(object) = item.as_object() else {
                self.violation(pointer, "must be an object");
                continue;
            };

            let name = self.non_empty_string(object, "name", &pointer);
            let attribute_type = self.optional_string(object, "attributeType", &pointer);
            let data_type = self.data_type(object, &pointer);

            let (Some(name), Some((data_type, nullable, precision, scale))) = (name, data_type)
            else {
                continue;
            };
            if !seen.insert(name.clone()) {
                self.violation(
                    format!("{}/name", pointer),
                    format!("duplicate attribute '{}'", name),
                );
                continue;
            }
            attributes.push(Attribute {
                name,
                data_type,
                nullable,
                precision,
                scale,
                attribute_type,
            });
        }
        attributes
    }

    #[allow(clippy::type_complexity)]
    fn data_type(
        &mut self,
        attribute: &Map<String, Value>,
        parent: &str,
    ) -> Option<(String, bool, Option<u32>, Option<u32>)> {
        let pointer = format!("{}/dataType", parent);
        let object = match attribute.get("dataType") {
            Some(Value::Object(object)) => object,
            Some(_) => {
                self.violation(pointer, "must be an object");
                return None;
            }
            None => {
                self.violation(pointer, "missing required field");
                return None;
            }
        };

        let type_name = self.non_empty_string(object, "type", &pointer);
        let nullable = self.optional_bool(object, "nullable", &pointer);
        let precision = self.optional_u32(object, "precision", &pointer);
        let scale = self.optional_u32(object, "scale", &pointer);

        if let (Some(p), Some(s)) = (precision, scale) {
            if s > p {
                self.violation(
                    format!("{}/scale", pointer),
                    format!("scale {} exceeds precision {}", s, p),
                );
                return None;
            }
        }

        Some((type_name?, nullable.unwrap_or(true), precision, scale))
    }

    fn sources(&mut self, root: &Map<String, Value>, local: &HashSet<&str>) -> Vec<ReferenceDecl> {
        let functions = match root.get("functions") {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Object(functions)) => functions,
            Some(_) => {
                self.violation("/functions", "must be an object");
                return Vec::new();
            }
        };

        let mut sources = Vec::new();
        for (i, item) in self
            .optional_array(functions, "sources", "/functions")
            .iter()
            .enumerate()
        {
            let pointer = format!("/functions/sources/{}", i);
            let Some(object) = item.as_object() else {
                self.violation(pointer, "must be an object");
                continue;
            };

            match object.get("type").and_then(Value::as_str) {
                Some("model") => {}
                Some("source") => continue,
                Some(other) => {
                    self.violation(
                        format!("{}/type", pointer),
                        format!("expected \"model\" or \"source\", found \"{}\"", other),
                    );
                    continue;
                }
                None => {
                    self.violation(format!("{}/type", pointer), "missing required field");
                    continue;
                }
            }

            let locator = self.non_empty_string(object, "locator", &pointer);
            let mappings = self.mappings(object, &pointer, "mapping", "target", "source", local);
            if let Some(locator) = locator {
                sources.push(ReferenceDecl::source(locator, mappings));
            }
        }
        sources
    }

    fn relationships(
        &mut self,
        root: &Map<String, Value>,
        local: &HashSet<&str>,
    ) -> Vec<ReferenceDecl> {
        let mut relationships = Vec::new();
        for (i, item) in self.optional_array(root, "relationships", "").iter().enumerate() {
            let pointer = format!("/relationships/{}", i);
            let Some(object) = item.as_object() else {
                self.violation(pointer, "must be an object");
                continue;
            };

            let locator = self.non_empty_string(object, "locator", &pointer);
            let role = match object.get("role") {
                Some(Value::String(token)) => {
                    let role = CardinalityRole::from_token(token);
                    if role.is_none() {
                        self.violation(
                            format!("{}/role", pointer),
                            format!(
                                "unknown role \"{}\" (expected oneToOne, oneToMany, manyToOne or manyToMany)",
                                token
                            ),
                        );
                    }
                    role
                }
                Some(_) => {
                    self.violation(format!("{}/role", pointer), "must be a string");
                    None
                }
                None => {
                    self.violation(format!("{}/role", pointer), "missing required field");
                    None
                }
            };
            let fields =
                self.mappings(object, &pointer, "fields", "attribute", "keyAttribute", local);

            if let (Some(locator), Some(role)) = (locator, role) {
                relationships.push(ReferenceDecl::relationship(locator, role, fields));
            }
        }
        relationships
    }

    /// Column pairs of a reference. `local_key` must name a declared attribute.
    fn mappings(
        &mut self,
        object: &Map<String, Value>,
        parent: &str,
        key: &str,
        local_key: &str,
        referenced_key: &str,
        local: &HashSet<&str>,
    ) -> Vec<MappingPair> {
        let mut pairs = Vec::new();
        for (i, item) in self.optional_array(object, key, parent).iter().enumerate() {
            let pointer = format!("{}/{}/{}", parent, key, i);
            let Some(entry) = item.as_object() else {
                self.violation(pointer, "must be an object");
                continue;
            };
            let local_name = self.non_empty_string(entry, local_key, &pointer);
            let referenced = self.non_empty_string(entry, referenced_key, &pointer);

            if let Some(name) = &local_name {
                if !local.contains(name.as_str()) {
                    self.violation(
                        format!("{}/{}", pointer, local_key),
                        format!("'{}' is not a declared attribute", name),
                    );
                    continue;
                }
            }
            if let (Some(local_name), Some(referenced)) = (local_name, referenced) {
                pairs.push(MappingPair::new(local_name, referenced));
            }
        }
        pairs
    }
}
