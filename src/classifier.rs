use super::db;
use super::error::{Error, Result};
use super::parser::{full_pattern, CompiledParser};
use super::parser_data::*;
use super::substitution::template_or_group;
use super::types::*;
use std::path::Path;

/// The database compiled into the binary, used when no `regexes` path is set.
const BUNDLED_REGEXES: &str = include_str!("../regexes/regexes.yaml");

/// Turns a raw user-agent string into a [`ParsedAgent`].
///
/// Implementations must be pure: the same input always yields an equal
/// result. Callers never pass blank input.
pub trait Classify: Send + Sync {
    fn classify(&self, raw: &str) -> Result<ParsedAgent>;
}

impl<C: Classify + ?Sized> Classify for std::sync::Arc<C> {
    fn classify(&self, raw: &str) -> Result<ParsedAgent> {
        (**self).classify(raw)
    }
}

/// Regex-database classifier reading the ua-parser `regexes.yaml` format.
pub struct UserAgentParser {
    ua_parser: CompiledParser<UserAgentData>,
    os_parser: CompiledParser<OsData>,
    device_parser: CompiledParser<DeviceData>,
}

impl UserAgentParser {
    /// Build from the database shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_yaml_str(BUNDLED_REGEXES)
    }

    /// Load a `regexes.yaml` file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: db::RegexFile = serde_yaml::from_str(yaml)?;

        // The three lists are independent; compile them concurrently.
        let (ua_parser, (os_parser, device_parser)) = rayon::join(
            || {
                CompiledParser::build(file.user_agent_parsers.into_iter().map(|e| {
                    let pattern = full_pattern(&e.regex, e.regex_flag.as_deref());
                    (pattern, UserAgentData::from(e))
                }))
            },
            || {
                rayon::join(
                    || {
                        CompiledParser::build(file.os_parsers.into_iter().map(|e| {
                            let pattern = full_pattern(&e.regex, e.regex_flag.as_deref());
                            (pattern, OsData::from(e))
                        }))
                    },
                    || {
                        CompiledParser::build(file.device_parsers.into_iter().map(|e| {
                            let pattern = full_pattern(&e.regex, e.regex_flag.as_deref());
                            (pattern, DeviceData::from(e))
                        }))
                    },
                )
            },
        );

        let parser = Self {
            ua_parser: ua_parser?,
            os_parser: os_parser?,
            device_parser: device_parser?,
        };
        tracing::debug!(
            user_agents = parser.ua_parser.len(),
            oss = parser.os_parser.len(),
            devices = parser.device_parser.len(),
            "user agent database loaded"
        );
        Ok(parser)
    }

    /// Parse a User-Agent string. Unrecognised parts fall back to `"Other"`.
    pub fn parse(&self, ua: &str) -> Result<ParsedAgent> {
        let fail = |source: fancy_regex::Error| Error::Classification {
            input: ua.to_owned(),
            source,
        };

        let mut agent = ParsedAgent::other();

        // 1. Client
        if let Some(m) = self.ua_parser.match_first(ua).map_err(fail)? {
            if let Some(name) = template_or_group(m.data.family_template.as_deref(), &m.captures, 1)
            {
                agent.name = name;
            }
            agent.version = versions(&m.data.version_templates, &m.captures);
        }

        // 2. OS
        if let Some(m) = self.os_parser.match_first(ua).map_err(fail)? {
            if let Some(name) = template_or_group(m.data.name_template.as_deref(), &m.captures, 1) {
                agent.os.name = name;
            }
            agent.os.version = versions(&m.data.version_templates, &m.captures);
        }

        // 3. Device
        if let Some(m) = self.device_parser.match_first(ua).map_err(fail)? {
            if let Some(device) =
                template_or_group(m.data.device_template.as_deref(), &m.captures, 1)
            {
                agent.device = Some(device);
            }
        }

        Ok(agent)
    }
}

impl Classify for UserAgentParser {
    fn classify(&self, raw: &str) -> Result<ParsedAgent> {
        self.parse(raw)
    }
}

/// v1..v4 from templates, falling back to capture groups 2..5.
fn versions(templates: &[Option<String>; 4], captures: &fancy_regex::Captures) -> VersionInfo {
    let mut parts: [Option<String>; 4] = Default::default();
    for (i, part) in parts.iter_mut().enumerate() {
        *part = template_or_group(templates[i].as_deref(), captures, i + 2);
    }
    VersionInfo::from_parts(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DB: &str = r#"
user_agent_parsers:
  - regex: '(OPR)/(\d+)\.(\d+)\.(\d+)'
    family_replacement: 'Opera'
  - regex: '(Chrome)/(\d+)\.(\d+)\.(\d+)\.(\d+)'
  - regex: 'mybot'
    regex_flag: 'i'
    family_replacement: 'MyBot'
    v1_replacement: '2'
os_parsers:
  - regex: '(Windows NT 6\.1)'
    os_replacement: 'Windows'
    os_v1_replacement: '7'
  - regex: '(Linux)'
device_parsers:
  - regex: '(iPhone)'
  - regex: 'Android [\d.]+; ([^;)]+)\)'
    device_replacement: 'Phone $1'
"#;

    fn parser() -> UserAgentParser {
        UserAgentParser::from_yaml_str(DB).unwrap()
    }

    #[test]
    fn positional_groups() {
        let a = parser()
            .parse("Mozilla/5.0 (X11; Linux x86_64) Chrome/26.0.1410.63 Safari/537.31")
            .unwrap();
        assert_eq!(a.name, "Chrome");
        assert_eq!(a.version.major.as_deref(), Some("26"));
        assert_eq!(a.version.patch_minor.as_deref(), Some("63"));
        assert_eq!(a.os.name, "Linux");
        assert!(a.os.version.is_empty());
        assert_eq!(a.device.as_deref(), Some(OTHER));
    }

    #[test]
    fn replacements_and_order() {
        let a = parser()
            .parse("Mozilla/5.0 (Windows NT 6.1) Chrome/45.0.2454.85 OPR/32.0.1948")
            .unwrap();
        assert_eq!(a.name, "Opera");
        assert_eq!(a.version.to_string(), "32.0.1948");
        assert_eq!(a.os.to_string(), "Windows 7");
    }

    #[test]
    fn case_insensitive_flag() {
        let a = parser().parse("MYBOT crawler").unwrap();
        assert_eq!(a.name, "MyBot");
        assert_eq!(a.version.major.as_deref(), Some("2"));
        assert_eq!(a.version.minor, None);
    }

    #[test]
    fn device_template_substitution() {
        let a = parser().parse("Mozilla/5.0 (Linux; Android 10; K)").unwrap();
        assert_eq!(a.device.as_deref(), Some("Phone K"));
    }

    #[test]
    fn non_ascii_pattern_is_still_tried() {
        let p = UserAgentParser::from_yaml_str("user_agent_parsers:\n  - regex: '(Ärger)/(\\d+)'\n")
            .unwrap();
        let a = p.parse("Mozilla Ärger/7").unwrap();
        assert_eq!(a.name, "Ärger");
        assert_eq!(a.version.major.as_deref(), Some("7"));
    }

    #[test]
    fn unknown_input_is_other() {
        assert_eq!(parser().parse("lorem ipsum").unwrap(), ParsedAgent::other());
    }

    #[test]
    fn bundled_database_loads() {
        let p = UserAgentParser::bundled().unwrap();
        let a = p.classify("curl/8.4.0").unwrap();
        assert_eq!(a.name, "curl");
        assert_eq!(a.version.to_string(), "8.4.0");
    }

    #[test]
    fn invalid_regex_is_a_load_error() {
        let err = UserAgentParser::from_yaml_str("user_agent_parsers:\n  - regex: '(unclosed'\n")
            .err()
            .unwrap();
        assert!(matches!(err, Error::Regex(_)));
    }
}
