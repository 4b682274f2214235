use serde::Deserialize;

// ---------------------------------------------------------------------------
// ua-parser regex database  (regexes.yaml)
//
// Three ordered lists; within each list the first matching entry wins.
// Keys this crate has no use for (brand/model replacements, ...) are ignored.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct RegexFile {
    #[serde(default)]
    pub user_agent_parsers: Vec<UserAgentEntry>,
    #[serde(default)]
    pub os_parsers: Vec<OsEntry>,
    #[serde(default)]
    pub device_parsers: Vec<DeviceEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserAgentEntry {
    pub regex: String,
    #[serde(default)]
    pub regex_flag: Option<String>,
    #[serde(default)]
    pub family_replacement: Option<String>,
    #[serde(default)]
    pub v1_replacement: Option<String>,
    #[serde(default)]
    pub v2_replacement: Option<String>,
    #[serde(default)]
    pub v3_replacement: Option<String>,
    #[serde(default)]
    pub v4_replacement: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsEntry {
    pub regex: String,
    #[serde(default)]
    pub regex_flag: Option<String>,
    #[serde(default)]
    pub os_replacement: Option<String>,
    #[serde(default)]
    pub os_v1_replacement: Option<String>,
    #[serde(default)]
    pub os_v2_replacement: Option<String>,
    #[serde(default)]
    pub os_v3_replacement: Option<String>,
    #[serde(default)]
    pub os_v4_replacement: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeviceEntry {
    pub regex: String,
    #[serde(default)]
    pub regex_flag: Option<String>,
    #[serde(default)]
    pub device_replacement: Option<String>,
}
