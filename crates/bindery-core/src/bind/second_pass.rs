use crate::model::PluralAttribute;

/// A deferred binding step.
///
/// Second passes are plain data: names and roles, resolved by lookup against
/// the collector when the worklist drains. They never hold references into
/// the mapping model.
#[derive(Debug, Clone)]
pub enum SecondPass {
    /// Resolve the type of the basic value at the locator
    BasicValueType(ValueLocator),

    /// Bind the table, key, element and index of a collection
    Collection {
        role: String,
        attribute: PluralAttribute,
    },
}

/// Addresses one basic value inside the collector-owned mapping model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueLocator {
    /// A property of an entity; components are searched one level deep
    Property { entity: String, property: String },

    /// The element of a collection
    CollectionElement { role: String },

    /// The list index or map key of a collection
    CollectionIndex { role: String },

    /// The surrogate identifier of an id-bag collection
    CollectionIdentifier { role: String },

    /// A property of a component element of a collection
    ElementProperty { role: String, property: String },

    /// A property of a component map key of a collection
    IndexProperty { role: String, property: String },
}

/// What a second pass reported when executed.
#[derive(Debug)]
pub enum Outcome {
    Complete,

    /// The task cannot run yet; it is re-queued behind the rest of the
    /// worklist
    Deferred(SecondPass),
}

impl SecondPass {
    /// A short description for unresolved-worklist diagnostics.
    pub fn describe(&self) -> String {
        match self {
            SecondPass::BasicValueType(locator) => locator.describe(),
            SecondPass::Collection { role, .. } => format!("collection '{role}'"),
        }
    }
}

impl ValueLocator {
    pub fn describe(&self) -> String {
        match self {
            ValueLocator::Property { entity, property } => {
                format!("type of '{entity}.{property}'")
            }
            ValueLocator::CollectionElement { role } => {
                format!("element type of collection '{role}'")
            }
            ValueLocator::CollectionIndex { role } => {
                format!("index type of collection '{role}'")
            }
            ValueLocator::CollectionIdentifier { role } => {
                format!("identifier type of collection '{role}'")
            }
            ValueLocator::ElementProperty { role, property } => {
                format!("element property '{property}' of collection '{role}'")
            }
            ValueLocator::IndexProperty { role, property } => {
                format!("key property '{property}' of collection '{role}'")
            }
        }
    }
}
