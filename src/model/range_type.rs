use serde::Serialize;
use std::fmt;
use std::ops::Index;

use crate::error::{Result, WcsError};
use crate::model::scalar::Scalar;

/// Whether a field holds measured quantities or category codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum FieldKind {
    Quantity { unit_of_measure: String },
    Category { codespace: String },
}

/// A reserved cell value meaning "no data", with an optional reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NilValue {
    pub value: Scalar,
    pub reason: Option<String>,
}

impl NilValue {
    pub fn new(value: Scalar) -> NilValue {
        NilValue {
            value,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl fmt::Display for NilValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        match self.reason.as_deref() {
            Some(reason) if !reason.is_empty() => write!(f, ": {}", reason),
            _ => Ok(()),
        }
    }
}

/// One band of a coverage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    name: String,
    label: Option<String>,
    description: Option<String>,
    definition: Option<String>,
    nil_values: Vec<NilValue>,
    kind: FieldKind,
}

impl Field {
    pub fn quantity(name: impl Into<String>, unit_of_measure: impl Into<String>) -> Field {
        Field::new(
            name.into(),
            FieldKind::Quantity {
                unit_of_measure: unit_of_measure.into(),
            },
        )
    }

    pub fn category(name: impl Into<String>, codespace: impl Into<String>) -> Field {
        Field::new(
            name.into(),
            FieldKind::Category {
                codespace: codespace.into(),
            },
        )
    }

    fn new(name: String, kind: FieldKind) -> Field {
        Field {
            name,
            label: None,
            description: None,
            definition: None,
            nil_values: Vec::new(),
            kind,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    /// Adds a nil value unless an equal one is already declared.
    pub fn with_nil_value(mut self, nil: NilValue) -> Self {
        if !self.nil_values.contains(&nil) {
            self.nil_values.push(nil);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// URI of the definition of the represented property.
    pub fn definition(&self) -> Option<&str> {
        self.definition.as_deref()
    }

    pub fn nil_values(&self) -> &[NilValue] {
        &self.nil_values
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_quantity(&self) -> bool {
        matches!(self.kind, FieldKind::Quantity { .. })
    }

    /// Unit of measure; `Some` exactly for quantities.
    pub fn unit_of_measure(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Quantity { unit_of_measure } => Some(unit_of_measure),
            FieldKind::Category { .. } => None,
        }
    }

    /// Code space URL; `Some` exactly for categories.
    pub fn codespace(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Category { codespace } => Some(codespace),
            FieldKind::Quantity { .. } => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = "\n      ";
        write!(f, "    {}:", self.name)?;
        let kind = if self.is_quantity() { "Quantity" } else { "Category" };
        write!(f, "{indent}type: {kind}")?;
        if let Some(label) = &self.label {
            write!(f, "{indent}label: {label}")?;
        }
        if let Some(description) = &self.description {
            write!(f, "{indent}description: {description}")?;
        }
        if let Some(definition) = &self.definition {
            write!(f, "{indent}definition: {definition}")?;
        }
        if !self.nil_values.is_empty() {
            let nils: Vec<String> = self.nil_values.iter().map(NilValue::to_string).collect();
            write!(f, "{indent}nil values: {}", nils.join(","))?;
        }
        match &self.kind {
            FieldKind::Category { codespace } => write!(f, "{indent}codespace: {codespace}"),
            FieldKind::Quantity { unit_of_measure } => write!(f, "{indent}uom: {unit_of_measure}"),
        }
    }
}

/// The ordered fields of a coverage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeType {
    fields: Vec<Field>,
}

impl RangeType {
    pub fn new(fields: Vec<Field>) -> Result<RangeType> {
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|other| other.name == field.name) {
                return Err(WcsError::invalid("duplicate field name", field.name.as_str()));
            }
        }
        Ok(RangeType { fields })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(Field::name).collect()
    }
}

impl Index<usize> for RangeType {
    type Output = Field;

    fn index(&self, index: usize) -> &Field {
        &self.fields[index]
    }
}

impl Index<&str> for RangeType {
    type Output = Field;

    fn index(&self, name: &str) -> &Field {
        self.field(name)
            .unwrap_or_else(|| panic!("no field named '{}'", name))
    }
}

impl<'a> IntoIterator for &'a RangeType {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for RangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  range type fields:")?;
        for field in &self.fields {
            write!(f, "\n{}", field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray() -> Field {
        Field::quantity("Gray", "10^0")
            .with_label("Gray")
            .with_definition("http://www.opengis.net/def/dataType/OGC/0/float32")
            .with_nil_value(NilValue::new(Scalar::Int(99999)))
    }

    #[test]
    fn test_quantity_has_uom_only() {
        let field = gray();
        assert!(field.is_quantity());
        assert_eq!(field.unit_of_measure(), Some("10^0"));
        assert_eq!(field.codespace(), None);
    }

    #[test]
    fn test_category_has_codespace_only() {
        let field = Field::category("land_use", "http://codes/landuse");
        assert!(!field.is_quantity());
        assert_eq!(field.unit_of_measure(), None);
        assert_eq!(field.codespace(), Some("http://codes/landuse"));
    }

    #[test]
    fn test_nil_values_are_deduplicated() {
        let field = gray()
            .with_nil_value(NilValue::new(Scalar::Int(99999)))
            .with_nil_value(NilValue::new(Scalar::Int(-9999)).with_reason("fill"));
        assert_eq!(
            field.nil_values(),
            &[
                NilValue::new(Scalar::Int(99999)),
                NilValue::new(Scalar::Int(-9999)).with_reason("fill")
            ]
        );
    }

    #[test]
    fn test_duplicate_field_names_rejected() {
        assert!(matches!(
            RangeType::new(vec![gray(), gray()]),
            Err(WcsError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_lookup() {
        let range_type = RangeType::new(vec![
            gray(),
            Field::category("land_use", "http://codes/landuse"),
        ])
        .unwrap();
        assert_eq!(range_type.field_names(), vec!["Gray", "land_use"]);
        assert_eq!(range_type[1].name(), "land_use");
        assert_eq!(range_type["Gray"], range_type[0]);
        assert!(range_type.field("Red").is_none());
        assert!(range_type.get(2).is_none());
    }

    #[test]
    fn test_display() {
        let range_type = RangeType::new(vec![gray()]).unwrap();
        assert_eq!(
            range_type.to_string(),
            "  range type fields:\n    Gray:\n      type: Quantity\n      label: Gray\n      definition: http://www.opengis.net/def/dataType/OGC/0/float32\n      nil values: 99999\n      uom: 10^0"
        );
        let nil = NilValue::new(Scalar::Int(0)).with_reason("http://www.opengis.net/def/nil/OGC/0/unknown");
        assert_eq!(nil.to_string(), "0: http://www.opengis.net/def/nil/OGC/0/unknown");
    }
}
