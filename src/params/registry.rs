use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{LoupeError, LoupeResult};
use crate::params::model::{EffectParameters, NUM_REGIONS, Region};

/// Value type of a registered parameter, as the host sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ParamKind {
    /// On/off toggle.
    Bool,
    /// Unbounded scalar.
    Double,
    /// Normalized 2D position (also used for 2D sizes).
    Position,
}

/// A parameter value exchanged with the host.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ParamValue {
    /// Value of a [`ParamKind::Bool`] parameter.
    Bool(bool),
    /// Value of a [`ParamKind::Double`] parameter.
    Double(f64),
    /// Value of a [`ParamKind::Position`] parameter.
    Position(Point),
}

impl ParamValue {
    /// Kind of this value.
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Bool(_) => ParamKind::Bool,
            Self::Double(_) => ParamKind::Double,
            Self::Position(_) => ParamKind::Position,
        }
    }

    /// Parse a textual value (`true`/`false`/`1`/`0`, a number, or `x,y`) for the given kind.
    pub fn parse(kind: ParamKind, text: &str) -> LoupeResult<Self> {
        let text = text.trim();
        let number = |s: &str| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| LoupeError::validation(format!("'{s}' is not a number")))
        };
        match kind {
            ParamKind::Bool => match text {
                "true" | "1" | "on" => Ok(Self::Bool(true)),
                "false" | "0" | "off" => Ok(Self::Bool(false)),
                _ => Err(LoupeError::validation(format!("'{text}' is not a boolean"))),
            },
            ParamKind::Double => Ok(Self::Double(number(text)?)),
            ParamKind::Position => {
                let (x, y) = text.split_once(',').ok_or_else(|| {
                    LoupeError::validation(format!("'{text}' is not a position (expected x,y)"))
                })?;
                Ok(Self::Position(Point::new(number(x)?, number(y)?)))
            }
        }
    }
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Position(p) => write!(f, "{},{}", p.x, p.y),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RegionField {
    Enable,
    SourceCenter,
    SourceSize,
    DestCenter,
    DestZoom,
}

const REGION_FIELDS: [RegionField; 5] = [
    RegionField::Enable,
    RegionField::SourceCenter,
    RegionField::SourceSize,
    RegionField::DestCenter,
    RegionField::DestZoom,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParamId {
    ShowWireframe,
    ShowMagnified,
    OutlineWidth,
    PointerWidth,
    PointerOutlineWidth,
    FadeDuration,
    EndTime,
    Region(usize, RegionField),
}

const GLOBAL_PARAMS: [ParamId; 7] = [
    ParamId::ShowWireframe,
    ParamId::ShowMagnified,
    ParamId::OutlineWidth,
    ParamId::PointerWidth,
    ParamId::PointerOutlineWidth,
    ParamId::FadeDuration,
    ParamId::EndTime,
];

/// Total number of registered parameters.
pub const PARAM_COUNT: usize = GLOBAL_PARAMS.len() + NUM_REGIONS * REGION_FIELDS.len();

/// Host-facing description of one registered parameter.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ParamInfo {
    /// Registration index.
    pub index: usize,
    /// Stable machine identifier, e.g. `region1_dest_zoom`.
    pub identifier: String,
    /// Human-readable label for host UIs.
    pub label: String,
    /// Longer description including unit conventions.
    pub description: &'static str,
    /// Value type.
    pub kind: ParamKind,
}

fn param_id(index: usize) -> Option<ParamId> {
    if let Some(id) = GLOBAL_PARAMS.get(index) {
        return Some(*id);
    }
    let rel = index - GLOBAL_PARAMS.len();
    let region = rel / REGION_FIELDS.len();
    if region >= NUM_REGIONS {
        return None;
    }
    Some(ParamId::Region(region, REGION_FIELDS[rel % REGION_FIELDS.len()]))
}

fn describe(index: usize, id: ParamId) -> ParamInfo {
    let (identifier, label, description, kind): (String, String, &'static str, ParamKind) =
        match id {
            ParamId::ShowWireframe => (
                "show_wireframe".into(),
                "Wire Frame".into(),
                "Show wire frame for positioning.",
                ParamKind::Bool,
            ),
            ParamId::ShowMagnified => (
                "show_magnified".into(),
                "Show Magnified".into(),
                "Show magnified region.",
                ParamKind::Bool,
            ),
            ParamId::OutlineWidth => (
                "outline_width".into(),
                "Outline Width".into(),
                "The width of the outline drawn around the magnified region (in 100 pixels at 1080p).",
                ParamKind::Double,
            ),
            ParamId::PointerWidth => (
                "pointer_width".into(),
                "Pointer Width".into(),
                "The width of the pointer line (in 100 pixels at 1080p).",
                ParamKind::Double,
            ),
            ParamId::PointerOutlineWidth => (
                "pointer_outline_width".into(),
                "Pointer Outline Width".into(),
                "The width of the pointer bubble outline (in 100 pixels at 1080p).",
                ParamKind::Double,
            ),
            ParamId::FadeDuration => (
                "fade_duration".into(),
                "Fade Duration".into(),
                "The duration of the fade in/out (in 10 seconds).",
                ParamKind::Double,
            ),
            ParamId::EndTime => (
                "end_time".into(),
                "End Time".into(),
                "The time after which the image should be back to normal (in 1000 seconds).",
                ParamKind::Double,
            ),
            ParamId::Region(i, field) => match field {
                RegionField::Enable => (
                    format!("region{i}_enable"),
                    format!("Enable region {i}"),
                    "Enable another magnification region.",
                    ParamKind::Bool,
                ),
                RegionField::SourceCenter => (
                    format!("region{i}_source_center"),
                    format!("Region {i} Source Center"),
                    "The center of the source rectangle.",
                    ParamKind::Position,
                ),
                RegionField::SourceSize => (
                    format!("region{i}_source_size"),
                    format!("Region {i} Source Size"),
                    "The size of the source rectangle (relative to the frame height).",
                    ParamKind::Position,
                ),
                RegionField::DestCenter => (
                    format!("region{i}_dest_center"),
                    format!("Region {i} Destination Center"),
                    "The center of the destination rectangle.",
                    ParamKind::Position,
                ),
                RegionField::DestZoom => (
                    format!("region{i}_dest_zoom"),
                    format!("Region {i} Destination Zoom"),
                    "The magnification factor of the destination (in 10x).",
                    ParamKind::Double,
                ),
            },
        };
    ParamInfo {
        index,
        identifier,
        label,
        description,
        kind,
    }
}

/// Description of the parameter registered at `index`, if any.
pub fn param_info(index: usize) -> Option<ParamInfo> {
    param_id(index).map(|id| describe(index, id))
}

/// All registered parameters in registration order.
pub fn param_infos() -> Vec<ParamInfo> {
    (0..PARAM_COUNT).filter_map(param_info).collect()
}

/// Registration index of the parameter with the given identifier.
pub fn param_index(identifier: &str) -> Option<usize> {
    (0..PARAM_COUNT).find(|&i| param_info(i).is_some_and(|info| info.identifier == identifier))
}

fn unknown(index: usize) -> LoupeError {
    LoupeError::validation(format!(
        "parameter index {index} out of range (0..{PARAM_COUNT})"
    ))
}

fn region_value(region: &Region, field: RegionField) -> ParamValue {
    match field {
        RegionField::Enable => ParamValue::Bool(region.enabled),
        RegionField::SourceCenter => ParamValue::Position(region.source_center),
        RegionField::SourceSize => {
            ParamValue::Position(Point::new(region.source_size.x, region.source_size.y))
        }
        RegionField::DestCenter => ParamValue::Position(region.dest_center),
        RegionField::DestZoom => ParamValue::Double(region.dest_zoom),
    }
}

impl EffectParameters {
    /// Current value of the parameter registered at `index`.
    pub fn get_param(&self, index: usize) -> LoupeResult<ParamValue> {
        let id = param_id(index).ok_or_else(|| unknown(index))?;
        Ok(match id {
            ParamId::ShowWireframe => ParamValue::Bool(self.show_wireframe),
            ParamId::ShowMagnified => ParamValue::Bool(self.show_magnified),
            ParamId::OutlineWidth => ParamValue::Double(self.outline_width),
            ParamId::PointerWidth => ParamValue::Double(self.pointer_width),
            ParamId::PointerOutlineWidth => ParamValue::Double(self.pointer_outline_width),
            ParamId::FadeDuration => ParamValue::Double(self.fade_duration),
            ParamId::EndTime => ParamValue::Double(self.end_time),
            ParamId::Region(i, field) => region_value(&self.regions[i], field),
        })
    }

    /// Store `value` into the parameter registered at `index`.
    ///
    /// The value kind must match the registered kind; the value itself is not range-checked.
    pub fn set_param(&mut self, index: usize, value: ParamValue) -> LoupeResult<()> {
        let id = param_id(index).ok_or_else(|| unknown(index))?;
        let expected = describe(index, id);
        let mismatch = || {
            LoupeError::validation(format!(
                "parameter '{}' expects {:?}, got {:?}",
                expected.identifier,
                expected.kind,
                value.kind()
            ))
        };

        match (id, value) {
            (ParamId::ShowWireframe, ParamValue::Bool(v)) => self.show_wireframe = v,
            (ParamId::ShowMagnified, ParamValue::Bool(v)) => self.show_magnified = v,
            (ParamId::OutlineWidth, ParamValue::Double(v)) => self.outline_width = v,
            (ParamId::PointerWidth, ParamValue::Double(v)) => self.pointer_width = v,
            (ParamId::PointerOutlineWidth, ParamValue::Double(v)) => {
                self.pointer_outline_width = v;
            }
            (ParamId::FadeDuration, ParamValue::Double(v)) => self.fade_duration = v,
            (ParamId::EndTime, ParamValue::Double(v)) => self.end_time = v,
            (ParamId::Region(i, field), value) => {
                let region = &mut self.regions[i];
                match (field, value) {
                    (RegionField::Enable, ParamValue::Bool(v)) => region.enabled = v,
                    (RegionField::SourceCenter, ParamValue::Position(p)) => {
                        region.source_center = p;
                    }
                    (RegionField::SourceSize, ParamValue::Position(p)) => {
                        region.source_size = Vec2::new(p.x, p.y);
                    }
                    (RegionField::DestCenter, ParamValue::Position(p)) => region.dest_center = p,
                    (RegionField::DestZoom, ParamValue::Double(v)) => region.dest_zoom = v,
                    _ => return Err(mismatch()),
                }
            }
            _ => return Err(mismatch()),
        }
        Ok(())
    }

    /// Store `value` into the parameter with the given identifier.
    pub fn set_param_by_name(&mut self, identifier: &str, value: ParamValue) -> LoupeResult<()> {
        let index = param_index(identifier)
            .ok_or_else(|| LoupeError::validation(format!("unknown parameter '{identifier}'")))?;
        self.set_param(index, value)
    }

    /// Parse `identifier=value` and apply it.
    pub fn apply_assignment(&mut self, assignment: &str) -> LoupeResult<()> {
        let (identifier, text) = assignment.split_once('=').ok_or_else(|| {
            LoupeError::validation(format!("'{assignment}' is not of the form name=value"))
        })?;
        let identifier = identifier.trim();
        let index = param_index(identifier)
            .ok_or_else(|| LoupeError::validation(format!("unknown parameter '{identifier}'")))?;
        let kind = param_info(index).ok_or_else(|| unknown(index))?.kind;
        self.set_param(index, ParamValue::parse(kind, text)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/registry.rs"]
mod tests;
