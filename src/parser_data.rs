use super::db;

// ---------------------------------------------------------------------------
// Internal data structs carried inside CompiledParser<T>
// ---------------------------------------------------------------------------

/// Replacement templates for a user-agent entry. `None` means "use the
/// positional capture group" (family = 1, v1 = 2, ... v4 = 5).
pub(crate) struct UserAgentData {
    pub family_template: Option<String>,
    pub version_templates: [Option<String>; 4],
}

pub(crate) struct OsData {
    pub name_template: Option<String>,
    pub version_templates: [Option<String>; 4],
}

pub(crate) struct DeviceData {
    pub device_template: Option<String>,
}

impl From<db::UserAgentEntry> for UserAgentData {
    fn from(e: db::UserAgentEntry) -> Self {
        Self {
            family_template: e.family_replacement,
            version_templates: [
                e.v1_replacement,
                e.v2_replacement,
                e.v3_replacement,
                e.v4_replacement,
            ],
        }
    }
}

impl From<db::OsEntry> for OsData {
    fn from(e: db::OsEntry) -> Self {
        Self {
            name_template: e.os_replacement,
            version_templates: [
                e.os_v1_replacement,
                e.os_v2_replacement,
                e.os_v3_replacement,
                e.os_v4_replacement,
            ],
        }
    }
}

impl From<db::DeviceEntry> for DeviceData {
    fn from(e: db::DeviceEntry) -> Self {
        Self {
            device_template: e.device_replacement,
        }
    }
}
