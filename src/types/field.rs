use indexmap::IndexSet;
use std::str::FromStr;

use crate::error::Error;

/// One output field of the projector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Major,
    Minor,
    Patch,
    Build,
    Os,
    OsName,
    OsMajor,
    OsMinor,
    OsVersion,
    Device,
    Version,
}

impl Field {
    /// The full vocabulary, in default emission order.
    pub const ALL: [Field; 12] = [
        Self::Name,
        Self::Major,
        Self::Minor,
        Self::Patch,
        Self::Build,
        Self::Os,
        Self::OsName,
        Self::OsMajor,
        Self::OsMinor,
        Self::OsVersion,
        Self::Device,
        Self::Version,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::Build => "build",
            Self::Os => "os",
            Self::OsName => "os_name",
            Self::OsMajor => "os_major",
            Self::OsMinor => "os_minor",
            Self::OsVersion => "os_version",
            Self::Device => "device",
            Self::Version => "version",
        }
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| Error::UnknownField(s.to_owned()))
    }
}

/// Ordered, duplicate-free set of fields to emit. Defaults to all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection(IndexSet<Field>);

impl FieldSelection {
    pub fn all() -> Self {
        Self(Field::ALL.into_iter().collect())
    }

    /// Parse field names; a repeated name keeps its first position.
    pub fn from_names<I, S>(names: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|n| n.as_ref().parse::<Field>())
            .collect::<Result<IndexSet<_>, _>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.iter().copied()
    }
}

impl Default for FieldSelection {
    fn default() -> Self {
        Self::all()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_vocabulary() {
        for field in Field::ALL {
            assert_eq!(field.as_str().parse::<Field>().unwrap(), field);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = FieldSelection::from_names(["name", "browser"]).unwrap_err();
        assert!(matches!(err, Error::UnknownField(ref n) if n == "browser"));
    }

    #[test]
    fn duplicates_keep_first_position() {
        let sel = FieldSelection::from_names(["os", "name", "os"]).unwrap();
        assert_eq!(sel.iter().collect::<Vec<_>>(), vec![Field::Os, Field::Name]);
    }

    #[test]
    fn default_is_every_field_in_order() {
        let sel = FieldSelection::default();
        assert_eq!(sel.len(), 12);
        assert_eq!(sel.iter().next(), Some(Field::Name));
        assert_eq!(sel.iter().last(), Some(Field::Version));
    }
}
