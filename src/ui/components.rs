//! UI component registry
//!
//! Maps view, action and field names to component identifiers. Rendering
//! layers look components up here so that a form for any registered model
//! can be assembled from its field kinds. Every default entry points at the
//! pass-through component until a rendering layer registers its own.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fields::FieldKind;

/// Component every default entry resolves to
pub const PASSTHROUGH: &str = "Passthrough";

const VIEWS: [&str; 2] = ["DetailView", "ListView"];
const ACTIONS: [&str; 3] = ["PostAction", "SaveAction", "RemoveAction"];
const RELATED_FIELDS: [&str; 2] = ["RelatedModelField", "RelatedModelListField"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    Views,
    Actions,
    Fields,
}

impl ComponentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::Actions => "actions",
            Self::Fields => "fields",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Component name used for fields of `kind`
pub fn field_component_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "TextField",
        FieldKind::Email => "EmailField",
        FieldKind::Url => "URLField",
        FieldKind::Password => "PasswordField",
        FieldKind::Number => "NumberField",
        FieldKind::Integer => "IntegerField",
        FieldKind::AutoNumber => "AutoNumberField",
        FieldKind::Boolean => "BooleanField",
        FieldKind::Selection => "SelectField",
        FieldKind::MultiSelection => "MultiSelectField",
        FieldKind::Date => "DateField",
        FieldKind::Time => "TimeField",
        FieldKind::DateTime => "DateTimeField",
    }
}

/// Component lookup table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRegistry {
    views: BTreeMap<String, String>,
    actions: BTreeMap<String, String>,
    fields: BTreeMap<String, String>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        let field_names = FieldKind::ALL
            .into_iter()
            .map(field_component_name)
            .chain(RELATED_FIELDS);

        Self {
            views: passthrough(VIEWS),
            actions: passthrough(ACTIONS),
            fields: passthrough(field_names),
        }
    }
}

fn passthrough<'a>(names: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, String> {
    names
        .into_iter()
        .map(|n| (n.to_string(), PASSTHROUGH.to_string()))
        .collect()
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the component for `name`, replacing any previous entry
    pub fn register(
        &mut self,
        category: ComponentCategory,
        name: impl Into<String>,
        component: impl Into<String>,
    ) {
        self.table_mut(category).insert(name.into(), component.into());
    }

    pub fn get(&self, category: ComponentCategory, name: &str) -> Option<&str> {
        self.table(category).get(name).map(String::as_str)
    }

    /// Component rendering fields of `kind`
    pub fn field_component(&self, kind: FieldKind) -> Option<&str> {
        self.get(ComponentCategory::Fields, field_component_name(kind))
    }

    /// Names registered in `category`, sorted
    pub fn names(&self, category: ComponentCategory) -> impl Iterator<Item = &str> {
        self.table(category).keys().map(String::as_str)
    }

    fn table(&self, category: ComponentCategory) -> &BTreeMap<String, String> {
        match category {
            ComponentCategory::Views => &self.views,
            ComponentCategory::Actions => &self.actions,
            ComponentCategory::Fields => &self.fields,
        }
    }

    fn table_mut(&mut self, category: ComponentCategory) -> &mut BTreeMap<String, String> {
        match category {
            ComponentCategory::Views => &mut self.views,
            ComponentCategory::Actions => &mut self.actions,
            ComponentCategory::Fields => &mut self.fields,
        }
    }
}
