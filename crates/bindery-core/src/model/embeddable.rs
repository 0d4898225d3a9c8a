use super::Attribute;

/// An embeddable class descriptor. Component binding walks these attributes
/// whenever an element, map key or regular attribute is of embeddable type.
#[derive(Debug, Clone)]
pub struct EmbeddableClass {
    /// Embeddable class name
    pub name: String,

    pub attributes: Vec<Attribute>,

    /// Name of the property pointing back at the owner, if declared
    pub parent_property: Option<String>,
}

impl EmbeddableClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: vec![],
            parent_property: None,
        }
    }

    pub fn with_attributes(name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            name: name.into(),
            attributes,
            parent_property: None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}
