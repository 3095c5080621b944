use crate::crs::Crs;
use crate::error::{Result, WcsError};
use crate::model::{
    Axis, BoundingBox, Field, FullCoverage, NilValue, Node, RangeType, Resolution, Scalar,
};
use crate::xml::Element;

/// The `CoverageDescription` elements of a DescribeCoverage response.
///
/// `root` may be the `CoverageDescriptions` wrapper or a bare description.
pub fn coverage_descriptions(root: &Element) -> Vec<&Element> {
    if root.name() == "CoverageDescription" {
        return vec![root];
    }
    root.children_named("CoverageDescription").collect()
}

/// Builds the full model of one `CoverageDescription` element.
pub fn parse_description(description: &Element) -> Result<FullCoverage> {
    let name = description.require_child("CoverageId")?.text();

    let general_grid = description
        .require_child("DomainSet")?
        .require_child("GeneralGrid")?;
    let native_bbox = parse_geo_axes(general_grid)?;
    let grid_bbox = parse_grid_limits(general_grid.require_child("GridLimits")?)?;

    let data_record = description
        .require_child("RangeType")?
        .require_child("DataRecord")?;
    let fields = data_record
        .children_named("field")
        .map(parse_field)
        .collect::<Result<Vec<_>>>()?;
    let range_type = RangeType::new(fields)?;

    let metadata = description
        .child("Metadata")
        .or_else(|| description.child("metadata"))
        .map(Node::from_metadata)
        .unwrap_or_else(|| Node::Map(Vec::new()));

    Ok(FullCoverage::new(name, native_bbox, grid_bbox, range_type).with_metadata(metadata))
}

/// The geo axes of a `GeneralGrid`, in `axisLabels` order.
fn parse_geo_axes(general_grid: &Element) -> Result<BoundingBox> {
    let crs = Crs::parse(general_grid.require_attr("srsName")?)?;
    let labels: Vec<&str> = general_grid
        .require_attr("axisLabels")?
        .split_whitespace()
        .collect();

    let mut axes = Vec::new();
    for element in general_grid.children() {
        if matches!(element.name(), "RegularAxis" | "IrregularAxis") {
            let axis = parse_axis(element)?;
            let position = labels
                .iter()
                .position(|label| *label == axis.name())
                .ok_or_else(|| WcsError::invalid("axis not listed in axisLabels", axis.name()))?;
            axes.push((position, axis));
        }
    }
    axes.sort_by_key(|(position, _)| *position);

    BoundingBox::geo(crs, axes.into_iter().map(|(_, axis)| axis).collect())
}

fn parse_axis(element: &Element) -> Result<Axis> {
    let name = element.require_attr("axisLabel")?;
    let coefficients: Vec<&Element> = element.children_named("C").collect();

    let axis = match (element.attr("resolution"), coefficients.is_empty()) {
        (Some(resolution), true) => {
            Axis::regular(
                name,
                Scalar::parse(element.require_attr("lowerBound")?)?,
                Scalar::parse(element.require_attr("upperBound")?)?,
                Resolution::parse(resolution),
            )?
        }
        (None, false) => {
            let coefficients = coefficients
                .into_iter()
                .map(|c| Scalar::parse(c.text()))
                .collect::<Result<Vec<_>>>()?;
            Axis::irregular(name, coefficients)?
        }
        _ => {
            return Err(WcsError::AmbiguousSampling {
                axis: name.to_string(),
            });
        }
    };

    Ok(match element.attr("uomLabel") {
        Some(uom) => axis.with_unit_of_measure(uom),
        None => axis,
    })
}

/// `GridLimits/IndexAxis` as a grid bounding box with unit resolution.
fn parse_grid_limits(grid_limits: &Element) -> Result<BoundingBox> {
    let axes = grid_limits
        .children_named("IndexAxis")
        .map(|index_axis| {
            let name = index_axis.require_attr("axisLabel")?;
            let low = parse_index(index_axis, "lowerBound")?;
            let high = parse_index(index_axis, "upperBound")?;
            Axis::regular(name, low, high, 1.0)
        })
        .collect::<Result<Vec<_>>>()?;
    BoundingBox::grid(axes)
}

fn parse_index(index_axis: &Element, attr: &str) -> Result<Scalar> {
    let raw = index_axis.require_attr(attr)?;
    raw.trim()
        .parse::<i64>()
        .map(Scalar::Int)
        .map_err(|_| WcsError::invalid(format!("grid {attr}"), raw))
}

fn parse_field(element: &Element) -> Result<Field> {
    let name = element.require_attr("name")?;
    let component = element
        .first_child()
        .ok_or_else(|| WcsError::missing("Quantity", element.name()))?;

    let mut field = match component.name() {
        "Quantity" => {
            let uom = component.require_child("uom")?.require_attr("code")?;
            Field::quantity(name, uom)
        }
        "Category" => {
            let codespace = component.require_child("codeSpace")?.require_attr("href")?;
            Field::category(name, codespace)
        }
        other => return Err(WcsError::invalid(format!("kind of field '{name}'"), other)),
    };

    if let Some(definition) = component.attr("definition") {
        field = field.with_definition(definition);
    }
    if let Some(label) = component.child("label") {
        field = field.with_label(label.text());
    }
    if let Some(description) = component.child("description") {
        field = field.with_description(description.text());
    }

    let nil_values = component
        .child("nilValues")
        .and_then(|n| n.child("NilValues"))
        .into_iter()
        .flat_map(|n| n.children_named("nilValue"));
    for nil in nil_values {
        let value = if field.is_quantity() {
            Scalar::parse_numeric_or_text(nil.text())
        } else {
            Scalar::Text(nil.text().to_string())
        };
        let mut nil_value = NilValue::new(value);
        if let Some(reason) = nil.attr("reason").filter(|r| !r.is_empty()) {
            nil_value = nil_value.with_reason(reason);
        }
        field = field.with_nil_value(nil_value);
    }

    Ok(field)
}
