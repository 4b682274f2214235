use std::fmt;

/// Sentinel used by the classifier when no database entry matched.
pub const OTHER: &str = "Other";

/// One classification result. Shared read-only out of the cache as
/// `Arc<ParsedAgent>`; clone it if you need to mutate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAgent {
    pub name: String,
    pub version: VersionInfo,
    pub os: OsInfo,
    pub device: Option<String>,
}

/// Dotted version split into its parts. Every part is kept verbatim as a
/// string (`"05"`, `"0b2"`) and any part may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionInfo {
    pub major: Option<String>,
    pub minor: Option<String>,
    pub patch: Option<String>,
    pub patch_minor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsInfo {
    pub name: String,
    pub version: VersionInfo,
}

impl ParsedAgent {
    /// The result for a string nothing in the database recognises.
    pub fn other() -> Self {
        Self {
            name: OTHER.to_owned(),
            version: VersionInfo::default(),
            os: OsInfo {
                name: OTHER.to_owned(),
                version: VersionInfo::default(),
            },
            device: Some(OTHER.to_owned()),
        }
    }
}

impl VersionInfo {
    pub fn from_parts(parts: [Option<String>; 4]) -> Self {
        let [major, minor, patch, patch_minor] = parts;
        Self {
            major,
            minor,
            patch,
            patch_minor,
        }
    }

    pub fn parts(&self) -> [Option<&str>; 4] {
        [
            self.major.as_deref(),
            self.minor.as_deref(),
            self.patch.as_deref(),
            self.patch_minor.as_deref(),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.parts().iter().all(Option::is_none)
    }

    /// Present parts joined with `.`, or `None` when every part is absent.
    pub fn to_text(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.to_string())
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in self.parts().into_iter().flatten() {
            if !first {
                f.write_str(".")?;
            }
            f.write_str(part)?;
            first = false;
        }
        Ok(())
    }
}

impl fmt::Display for OsInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.version.is_empty() {
            write!(f, " {}", self.version)?;
        }
        Ok(())
    }
}
