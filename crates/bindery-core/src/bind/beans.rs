use indexmap::IndexMap;

/// Resolves managed bean classes named by custom type annotations.
pub trait ManagedBeanRegistry {
    /// Whether the named class can be produced as a managed bean.
    fn contains(&self, class_name: &str) -> bool;

    /// Whether the named bean class accepts configuration parameters.
    fn accepts_parameters(&self, class_name: &str) -> bool;
}

/// Default registry. Any class can be produced (direct instantiation is the
/// fallback), and a class accepts parameters only when registered as doing
/// so.
#[derive(Debug, Default)]
pub struct SimpleBeanRegistry {
    parameterized: IndexMap<String, bool>,
}

impl SimpleBeanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class_name: impl Into<String>, accepts_parameters: bool) {
        self.parameterized
            .insert(class_name.into(), accepts_parameters);
    }
}

impl ManagedBeanRegistry for SimpleBeanRegistry {
    fn contains(&self, _class_name: &str) -> bool {
        true
    }

    fn accepts_parameters(&self, class_name: &str) -> bool {
        self.parameterized.get(class_name).copied().unwrap_or(false)
    }
}
