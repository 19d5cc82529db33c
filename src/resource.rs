//! Resource kinds exposed over HTTP and the fields each one stores.

use serde_json::{Map, Value};

/// A stored record body: flat JSON object of field name to value.
pub type Document = Map<String, Value>;

/// Key under which the identifier is returned alongside a record's fields.
pub const ID_KEY: &str = "_id";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const PRODUCT_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "nombre", kind: FieldKind::Text },
    FieldSpec { name: "precio", kind: FieldKind::Number },
    FieldSpec { name: "descripcion", kind: FieldKind::Text },
];

const USER_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "nombre", kind: FieldKind::Text },
    FieldSpec { name: "edad", kind: FieldKind::Number },
    FieldSpec { name: "correo", kind: FieldKind::Text },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Product,
    User,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Product, ResourceKind::User];

    /// Resolve the kind served under a URL path segment.
    pub fn from_path(segment: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.path_segment() == segment)
    }

    pub fn path_segment(self) -> &'static str {
        match self {
            ResourceKind::Product => "productos",
            ResourceKind::User => "usuarios",
        }
    }

    /// Collection (table) name in the document store.
    pub fn collection(self) -> &'static str {
        self.path_segment()
    }

    /// Singular label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Product => "product",
            ResourceKind::User => "user",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            ResourceKind::Product => PRODUCT_FIELDS,
            ResourceKind::User => USER_FIELDS,
        }
    }

    /// Keep only this kind's declared fields, casting values the way the
    /// field kind expects. Unknown keys (including `_id`) are dropped.
    pub fn project(self, body: Document) -> Document {
        let mut out = Document::new();
        for (key, value) in body {
            if let Some(field) = self.fields().iter().find(|f| f.name == key) {
                out.insert(key, cast(field.kind, value));
            }
        }
        out
    }
}

/// Lenient cast: numbers and booleans become strings for text fields, numeric
/// strings become numbers for number fields. Anything else passes through.
fn cast(kind: FieldKind, value: Value) -> Value {
    match (kind, value) {
        (FieldKind::Text, Value::Number(n)) => Value::String(n.to_string()),
        (FieldKind::Text, Value::Bool(b)) => Value::String(b.to_string()),
        (FieldKind::Number, Value::String(s)) => parse_number(&s).unwrap_or(Value::String(s)),
        (_, v) => v,
    }
}

fn parse_number(s: &str) -> Option<Value> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(Value::Number(i.into()));
    }
    s.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}
