use indexmap::IndexMap;

use crate::types::{Field, FieldSelection, ParsedAgent};

/// Field name → freshly allocated value, in selection order.
///
/// Every value is an owned `String` copied out of the agent, so nothing a
/// caller does to a projection can reach the cached [`ParsedAgent`].
pub type Projection = IndexMap<&'static str, String>;

/// Shape `agent` into the selected output fields. Fields whose underlying
/// value is absent or empty are left out rather than emitted blank.
pub fn project(agent: &ParsedAgent, selection: &FieldSelection) -> Projection {
    selection
        .iter()
        .filter_map(|field| extract(agent, field).map(|value| (field.as_str(), value)))
        .collect()
}

fn extract(agent: &ParsedAgent, field: Field) -> Option<String> {
    let value = match field {
        Field::Name => Some(agent.name.clone()),
        Field::Os => Some(agent.os.to_string()),
        Field::OsName => Some(agent.os.name.clone()),
        Field::OsVersion => agent.os.version.to_text(),
        Field::OsMajor => agent.os.version.major.clone(),
        Field::OsMinor => agent.os.version.minor.clone(),
        Field::Device => agent.device.clone(),
        Field::Version => agent.version.to_text(),
        Field::Major => agent.version.major.clone(),
        Field::Minor => agent.version.minor.clone(),
        Field::Patch => agent.version.patch.clone(),
        Field::Build => agent.version.patch_minor.clone(),
    };
    value.filter(|v| !v.is_empty())
}
