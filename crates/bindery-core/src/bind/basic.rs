use super::naming;
use super::second_pass::{SecondPass, ValueLocator};
use super::MetadataCollector;
use crate::mapping::{
    type_params, BasicValue, Column, Formula, NationalizationSupport, Selectable, SqlTypeCode,
    TableId, TypeDescriptor, TypeResolution,
};
use crate::model::{
    AccessType, Attribute, BasicTypeKind, ClassRef, ColumnSpec, ConverterDescriptor, EnumStorage,
    KindOverrides, Mutability, PluralAttribute, TemporalKind, TypeOverrides,
};
use crate::{Error, Result};

use indexmap::IndexMap;
use tracing::debug;

/// What part of a mapping a basic value stands for.
///
/// The kind is fixed at construction. It selects which override group of the
/// attribute applies and which implicit column name is used; nothing
/// re-dispatches on it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Attribute,
    MapKey,
    CollectionElement,
    CollectionId,
    ListIndex,
}

/// Binds one basic-typed value.
///
/// All configuration is captured and validated at construction; `make` can
/// run at any point afterwards, in any binder order, and is idempotent.
#[derive(Debug)]
pub struct BasicValueBinder {
    kind: ValueKind,

    table: TableId,

    owner: String,

    /// Property path used in parameters and diagnostics
    property: String,

    /// Attribute name used for implicit column naming
    attribute_name: String,

    access: AccessType,

    declared: ClassRef,

    columns: Vec<ColumnSpec>,

    /// The override group the kind selected
    overrides: TypeOverrides,

    temporal: Option<TemporalKind>,

    enumerated: Option<EnumStorage>,

    lob: bool,

    nationalized: bool,

    converter: Option<ConverterDescriptor>,

    immutable: bool,

    is_id: bool,

    is_version: bool,

    made: Option<BasicValue>,
}

impl ValueKind {
    fn select(self, groups: &KindOverrides) -> &TypeOverrides {
        match self {
            Self::Attribute => &groups.attribute,
            Self::MapKey => &groups.map_key,
            Self::CollectionElement => &groups.element,
            Self::CollectionId => &groups.collection_id,
            Self::ListIndex => &groups.list_index,
        }
    }

    fn implicit_column_name(self, attribute: &str) -> String {
        match self {
            Self::Attribute | Self::CollectionElement => naming::element_column(attribute),
            Self::MapKey => naming::map_key_column(attribute),
            Self::CollectionId => naming::identifier_column(),
            Self::ListIndex => naming::order_column(attribute),
        }
    }
}

impl BasicValueBinder {
    pub fn for_attribute(attribute: &Attribute, table: TableId) -> Result<Self> {
        Self {
            kind: ValueKind::Attribute,
            table,
            owner: attribute.declaring_class.clone(),
            property: attribute.name.clone(),
            attribute_name: attribute.name.clone(),
            access: attribute.access,
            declared: attribute.class_ref.clone(),
            columns: attribute.columns.clone(),
            overrides: ValueKind::Attribute.select(&attribute.overrides).clone(),
            temporal: None,
            enumerated: None,
            lob: attribute.lob,
            nationalized: attribute.nationalized,
            converter: attribute.converter.clone(),
            immutable: attribute.immutable,
            is_id: attribute.is_id,
            is_version: attribute.is_version,
            made: None,
        }
        .validated()
    }

    pub fn for_element(plural: &PluralAttribute, table: TableId) -> Result<Self> {
        Self {
            kind: ValueKind::CollectionElement,
            table,
            owner: plural.declaring_class.clone(),
            property: plural.name.clone(),
            attribute_name: plural.name.clone(),
            access: plural.access,
            declared: plural.declared.element.clone(),
            columns: plural.element_columns.clone(),
            overrides: ValueKind::CollectionElement.select(&plural.overrides).clone(),
            temporal: None,
            enumerated: None,
            lob: plural.lob,
            nationalized: plural.nationalized,
            converter: plural.converter.clone(),
            immutable: false,
            is_id: false,
            is_version: false,
            made: None,
        }
        .validated()
    }

    /// `key` is the resolved map-key class; `@MapKeyClass` resolution happens
    /// before the binder is constructed.
    pub fn for_map_key(plural: &PluralAttribute, key: ClassRef, table: TableId) -> Result<Self> {
        let spec = plural.map_key.clone().unwrap_or_default();

        Self {
            kind: ValueKind::MapKey,
            table,
            owner: plural.declaring_class.clone(),
            property: format!("{}.key", plural.name),
            attribute_name: plural.name.clone(),
            access: plural.access,
            declared: key,
            columns: spec.columns,
            overrides: ValueKind::MapKey.select(&plural.overrides).clone(),
            temporal: None,
            enumerated: None,
            lob: false,
            nationalized: false,
            converter: spec.converter,
            immutable: false,
            is_id: false,
            is_version: false,
            made: None,
        }
        .validated()
    }

    pub fn for_list_index(plural: &PluralAttribute, table: TableId) -> Result<Self> {
        let column = match &plural.order_column {
            Some(spec) => ColumnSpec {
                name: spec.name.clone(),
                nullable: spec.nullable,
                ..ColumnSpec::default()
            },
            None => ColumnSpec::implicit(),
        };

        Self {
            kind: ValueKind::ListIndex,
            table,
            owner: plural.declaring_class.clone(),
            property: format!("{}.index", plural.name),
            attribute_name: plural.name.clone(),
            access: plural.access,
            declared: ClassRef::basic("int", BasicTypeKind::I32),
            columns: vec![column],
            overrides: ValueKind::ListIndex.select(&plural.overrides).clone(),
            temporal: None,
            enumerated: None,
            lob: false,
            nationalized: false,
            converter: None,
            immutable: false,
            is_id: false,
            is_version: false,
            made: None,
        }
        .validated()
    }

    pub fn for_collection_id(plural: &PluralAttribute, table: TableId) -> Result<Self> {
        let spec = match &plural.collection_id {
            Some(spec) => spec,
            None => {
                return Err(Error::annotation(format!(
                    "id-bag collection '{}' has no collection id annotation",
                    plural.role()
                )))
            }
        };

        Self {
            kind: ValueKind::CollectionId,
            table,
            owner: plural.declaring_class.clone(),
            property: format!("{}.id", plural.name),
            attribute_name: plural.name.clone(),
            access: plural.access,
            declared: ClassRef::basic("long", BasicTypeKind::I64),
            columns: spec.column.clone().into_iter().collect(),
            overrides: ValueKind::CollectionId.select(&plural.overrides).clone(),
            temporal: None,
            enumerated: None,
            lob: false,
            nationalized: false,
            converter: None,
            immutable: false,
            is_id: false,
            is_version: false,
            made: None,
        }
        .validated()
    }

    /// Rejects present-but-malformed temporal and enumerated specs, and
    /// extracts the well-formed ones.
    fn validated(mut self) -> Result<Self> {
        if let Some(spec) = self.overrides.temporal {
            self.temporal = Some(spec.kind.ok_or_else(|| {
                Error::illegal_state(format!(
                    "temporal annotation present without a precision on '{}.{}'",
                    self.owner, self.property
                ))
            })?);
        }

        if let Some(spec) = self.overrides.enumerated {
            self.enumerated = Some(spec.storage.ok_or_else(|| {
                Error::illegal_state(format!(
                    "enumerated annotation present without a storage form on '{}.{}'",
                    self.owner, self.property
                ))
            })?);
        }

        Ok(self)
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Builds the value.
    ///
    /// The first call validates the column set, creates (or reuses) the
    /// physical columns, and either resolves the type on the spot (when the
    /// collector is already draining second passes) or registers a type
    /// second pass for `locator`. The caller stores the returned value at
    /// that locator. Later calls return the same value.
    pub fn make(
        &mut self,
        collector: &mut MetadataCollector,
        locator: ValueLocator,
    ) -> Result<BasicValue> {
        if let Some(made) = &self.made {
            return Ok(made.clone());
        }

        self.check_column_consistency()?;

        let mut value = BasicValue::new(
            self.table,
            self.owner.clone(),
            self.property.clone(),
            self.access,
            self.declared.clone(),
        );

        value.custom_type = self.overrides.custom_type.clone();
        value.explicit_java_type = self.overrides.java_type.clone();
        value.explicit_sql_code = self.overrides.jdbc_type_code;
        value.explicit_mutability = self.overrides.mutability;
        value.temporal = self.temporal;
        value.enumerated = self.enumerated;
        value.lob = self.lob;
        value.nationalized = self.nationalized;
        value.immutable = self.immutable;
        value.is_id = self.is_id;
        value.is_version = self.is_version;

        if let Some(converter) = &self.converter {
            if value.custom_type.is_some() {
                debug!(
                    "skipping converter {} for '{}.{}': explicit type takes precedence",
                    converter.class_name, self.owner, self.property
                );
            } else if self.is_id || self.is_version {
                debug!(
                    "skipping converter {} for '{}.{}': identifier and version attributes are not converted",
                    converter.class_name, self.owner, self.property
                );
            } else if self.temporal.is_some() || self.enumerated.is_some() {
                debug!(
                    "skipping converter {} for '{}.{}': temporal and enumerated attributes are not converted",
                    converter.class_name, self.owner, self.property
                );
            } else {
                value.converter = Some(converter.clone());
            }
        }

        let specs = if self.columns.is_empty() {
            vec![ColumnSpec::implicit()]
        } else {
            self.columns.clone()
        };

        value.insertable = specs[0].insertable;
        value.updatable = specs[0].updatable;

        for spec in &specs {
            let selectable = self.bind_column(collector, spec);
            value.columns.push(selectable);
        }

        if collector.in_second_pass() {
            let resolution = resolve_type(&value, collector)?;
            apply_resolution(collector, &mut value, resolution);
        } else {
            collector.add_second_pass(SecondPass::BasicValueType(locator));
        }

        self.made = Some(value.clone());
        Ok(value)
    }

    fn check_column_consistency(&self) -> Result<()> {
        let mut specs = self.columns.iter();
        let Some(first) = specs.next() else {
            return Ok(());
        };

        for spec in specs {
            if spec.insertable != first.insertable {
                return Err(Error::mapping(format!(
                    "property '{}.{}' mixes insertable and non-insertable columns",
                    self.owner, self.property
                )));
            }
            if spec.updatable != first.updatable {
                return Err(Error::mapping(format!(
                    "property '{}.{}' mixes updatable and non-updatable columns",
                    self.owner, self.property
                )));
            }
        }

        Ok(())
    }

    /// Creates the column for one spec, or reuses an existing column of the
    /// same name on the table.
    fn bind_column(&self, collector: &mut MetadataCollector, spec: &ColumnSpec) -> Selectable {
        if let Some(expression) = &spec.formula {
            return Selectable::Formula(Formula {
                expression: expression.clone(),
            });
        }

        let name = spec
            .name
            .clone()
            .unwrap_or_else(|| self.kind.implicit_column_name(&self.attribute_name));

        let table = collector.table_mut(self.table);
        if let Some(existing) = table.column_id_by_name(&name) {
            return Selectable::Column(existing);
        }

        let mut column = Column::named(name);
        column.length = spec.length;
        column.precision = spec.precision;
        column.scale = spec.scale;
        column.nullable = spec.nullable && !self.is_id && !self.is_version;
        column.unique = spec.unique;
        column.definition = spec.definition.clone();

        Selectable::Column(table.add_column(column))
    }
}

/// Resolves the type of the basic value at `locator` and writes the outcome
/// back into the value and its columns. Idempotent.
pub(crate) fn fill_simple_value(
    collector: &mut MetadataCollector,
    locator: &ValueLocator,
) -> Result<()> {
    if collector.basic_value(locator).is_resolved() {
        return Ok(());
    }

    let resolution = resolve_type(collector.basic_value(locator), collector)?;

    let columns = collector.basic_value(locator).columns.clone();
    let sql_code = resolution.sql_code;
    collector.basic_value_mut(locator).resolution = Some(resolution);
    propagate_sql_code(collector, &columns, sql_code);

    Ok(())
}

fn apply_resolution(
    collector: &mut MetadataCollector,
    value: &mut BasicValue,
    resolution: TypeResolution,
) {
    let sql_code = resolution.sql_code;
    value.resolution = Some(resolution);
    propagate_sql_code(collector, &value.columns, sql_code);
}

fn propagate_sql_code(
    collector: &mut MetadataCollector,
    columns: &[Selectable],
    sql_code: SqlTypeCode,
) {
    for selectable in columns {
        if let Some(id) = selectable.as_column() {
            let column = collector.table_mut(id.table).column_mut(id);
            if column.sql_code.is_none() {
                column.sql_code = Some(sql_code);
            }
        }
    }
}

/// Resolves the final type of a basic value: the descriptor, the SQL type
/// code, the mutability plan and the dynamic parameter map.
///
/// Pure with respect to the collector; callers decide where the outcome is
/// stored.
pub fn resolve_type(value: &BasicValue, collector: &MetadataCollector) -> Result<TypeResolution> {
    let descriptor = resolve_descriptor(value, collector)?;
    let sql_code = resolve_sql_code(value, &descriptor, collector)?;
    let mutability = resolve_mutability(value, &descriptor);
    let parameters = resolve_parameters(value, collector);

    Ok(TypeResolution {
        descriptor,
        sql_code,
        mutability,
        parameters,
    })
}

fn resolve_descriptor(
    value: &BasicValue,
    collector: &MetadataCollector,
) -> Result<TypeDescriptor> {
    // An explicit custom type short-circuits every other source.
    if let Some(custom) = &value.custom_type {
        return Ok(TypeDescriptor::Custom {
            class_name: custom.class_name.clone(),
        });
    }

    if let Some(name) = &value.explicit_java_type {
        return Ok(match collector.type_definition(name) {
            Some(definition) => TypeDescriptor::Custom {
                class_name: definition.class_name.clone(),
            },
            None => TypeDescriptor::JavaType {
                class_name: name.clone(),
            },
        });
    }

    if let Some(converter) = &value.converter {
        return Ok(TypeDescriptor::Converted {
            converter: converter.class_name.clone(),
            domain_type: converter.domain_type.clone(),
        });
    }

    if value.declared.is_enum() || value.enumerated.is_some() {
        return Ok(TypeDescriptor::Enumerated {
            class_name: value.declared.name.clone(),
            storage: value.enumerated.unwrap_or(EnumStorage::Ordinal),
        });
    }

    if let Some(kind) = value.temporal {
        return Ok(TypeDescriptor::Temporal { kind });
    }

    if let Some(kind) = value.declared.as_basic() {
        return Ok(TypeDescriptor::Standard { kind });
    }

    if value.declared.is_serializable() {
        return Ok(TypeDescriptor::Serialized {
            class_name: value.declared.name.clone(),
        });
    }

    Err(Error::mapping(format!(
        "could not determine a basic type for '{}.{}' of type {}",
        value.owner, value.property, value.declared.name
    )))
}

fn resolve_sql_code(
    value: &BasicValue,
    descriptor: &TypeDescriptor,
    collector: &MetadataCollector,
) -> Result<SqlTypeCode> {
    let mut code = match descriptor {
        TypeDescriptor::Custom { .. } | TypeDescriptor::JavaType { .. } => value
            .declared
            .as_basic()
            .map(BasicTypeKind::default_sql_code)
            .unwrap_or(SqlTypeCode::Varchar),
        TypeDescriptor::Converted { .. } => match &value.converter {
            Some(converter) => converter.relational_type.default_sql_code(),
            None => SqlTypeCode::Varchar,
        },
        TypeDescriptor::Enumerated { storage, .. } => match storage {
            EnumStorage::Ordinal => SqlTypeCode::SmallInt,
            EnumStorage::Name => SqlTypeCode::Varchar,
        },
        TypeDescriptor::Temporal { kind } => match kind {
            TemporalKind::Date => SqlTypeCode::Date,
            TemporalKind::Time => SqlTypeCode::Time,
            TemporalKind::Timestamp => SqlTypeCode::Timestamp,
        },
        TypeDescriptor::Serialized { .. } => SqlTypeCode::VarBinary,
        TypeDescriptor::Standard { kind } => match kind {
            BasicTypeKind::Bool => collector.database().boolean_code,
            other => other.default_sql_code(),
        },
    };

    if value.lob {
        code = code.lob_variant();
    }

    if value.nationalized {
        match collector.database().nationalization {
            NationalizationSupport::Explicit => code = code.nationalized_variant(),
            NationalizationSupport::Implicit => {}
            NationalizationSupport::Unsupported => {
                return Err(Error::unsupported_feature(format!(
                    "the database does not support nationalized character data ('{}.{}')",
                    value.owner, value.property
                )));
            }
        }
    }

    // An explicit type-code override beats everything above.
    if let Some(explicit) = value.explicit_sql_code {
        code = explicit;
    }

    Ok(code)
}

fn resolve_mutability(value: &BasicValue, descriptor: &TypeDescriptor) -> Mutability {
    if let Some(explicit) = value.explicit_mutability {
        return explicit;
    }

    if value.immutable || value.declared.immutable {
        return Mutability::Immutable;
    }

    if value.converter.as_ref().is_some_and(|c| c.immutable) {
        return Mutability::Immutable;
    }

    if value.custom_type.as_ref().is_some_and(|c| c.immutable) {
        return Mutability::Immutable;
    }

    match descriptor {
        TypeDescriptor::Enumerated { .. } => Mutability::Immutable,
        TypeDescriptor::Temporal { .. } => Mutability::Mutable,
        TypeDescriptor::Standard { kind } => kind.default_mutability(),
        _ => value
            .declared
            .as_basic()
            .map(BasicTypeKind::default_mutability)
            .unwrap_or(Mutability::Mutable),
    }
}

fn resolve_parameters(
    value: &BasicValue,
    collector: &MetadataCollector,
) -> IndexMap<String, String> {
    let mut parameters = IndexMap::new();

    parameters.insert(type_params::ENTITY.to_string(), value.owner.clone());
    parameters.insert(type_params::PROPERTY.to_string(), value.property.clone());
    parameters.insert(
        type_params::ACCESS.to_string(),
        value.access.as_str().to_string(),
    );
    parameters.insert(
        type_params::RETURNED_CLASS.to_string(),
        value.declared.name.clone(),
    );

    if let Some(custom) = &value.custom_type {
        parameters.extend(
            custom
                .parameters
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
    } else if let Some(name) = &value.explicit_java_type {
        if let Some(definition) = collector.type_definition(name) {
            parameters.extend(
                definition
                    .parameters
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
    }

    parameters.extend(value.parameters.iter().map(|(k, v)| (k.clone(), v.clone())));

    parameters
}
