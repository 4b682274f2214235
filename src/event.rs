use serde_json::{Map, Value};

/// A log record: a tree of JSON values addressed by field references.
///
/// A reference is either a bare top-level name (`message`) or a bracketed
/// path (`[http][user_agent]`). Anything that isn't a well-formed bracketed
/// path is taken as one literal top-level key.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    fields: Map<String, Value>,
}

impl Event {
    pub fn get(&self, reference: &str) -> Option<&Value> {
        let path = parse_reference(reference);
        let (last, parents) = path.split_last()?;
        let mut map = &self.fields;
        for key in parents {
            map = map.get(*key)?.as_object()?;
        }
        map.get(*last)
    }

    /// Set `reference` to `value`, creating intermediate objects and
    /// replacing any non-object found along the way.
    pub fn set(&mut self, reference: &str, value: impl Into<Value>) {
        let path = parse_reference(reference);
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut map = &mut self.fields;
        for key in parents {
            let slot = map
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            map = match slot {
                Value::Object(m) => m,
                _ => return,
            };
        }
        map.insert(last.to_string(), value.into());
    }

    pub fn remove(&mut self, reference: &str) -> Option<Value> {
        let path = parse_reference(reference);
        let (last, parents) = path.split_last()?;
        let mut map = &mut self.fields;
        for key in parents {
            map = map.get_mut(*key)?.as_object_mut()?;
        }
        map.remove(*last)
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.get(reference).is_some()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl From<Map<String, Value>> for Event {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl TryFrom<Value> for Event {
    type Error = Value;

    /// Only JSON objects are events; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(other),
        }
    }
}

/// Split a field reference into its path segments.
pub(crate) fn parse_reference(reference: &str) -> Vec<&str> {
    let Some(mut rest) = reference.strip_prefix('[') else {
        return vec![reference];
    };
    let mut path = Vec::new();
    loop {
        let Some(end) = rest.find(']') else {
            return vec![reference];
        };
        let segment = &rest[..end];
        if segment.is_empty() || segment.contains('[') {
            return vec![reference];
        }
        path.push(segment);
        rest = &rest[end + 1..];
        if rest.is_empty() {
            return path;
        }
        match rest.strip_prefix('[') {
            Some(r) => rest = r,
            None => return vec![reference],
        }
    }
}
