use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const UNKNOWN_ADDRESS: &str = "unknown";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    #[default]
    None,
}

impl RiskLevel {
    /// Lenient parse; anything unrecognised is treated as no risk.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::None,
        }
    }

    pub fn is_vulnerable(self) -> bool {
        matches!(self, Self::High | Self::Medium)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::None => "None",
        }
    }
}

/// One observed connection as reported by the scanner. Every field is
/// optional on the wire; defaults are applied when the graph is built.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FlowRecord {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub risk: Option<String>,
    #[serde(default)]
    pub vulnerability_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_port")]
    pub port: Option<u64>,
}

/// Accepts a number or a numeric string. Anything else (negative, text,
/// objects) reads as absent so the record itself still deserializes.
fn lenient_port<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let port = match &value {
        None | Some(Value::Null) => None,
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        Some(_) => None,
    };
    if port.is_none() && value.as_ref().is_some_and(|value| !value.is_null()) {
        log::debug!("ignoring unusable port {value:?}");
    }
    Ok(port)
}

impl FlowRecord {
    pub fn risk_level(&self) -> RiskLevel {
        self.risk.as_deref().map(RiskLevel::parse).unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub address: String,
    pub port: u16,
}

impl Endpoint {
    /// Splits `address:port` on the last colon. Returns `None` when there is
    /// no colon or no address; an unparseable port degrades to 0.
    pub fn parse(raw: &str) -> Option<Self> {
        let (address, port) = raw.trim().rsplit_once(':')?;
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        Some(Self {
            address: address.to_owned(),
            port: port.trim().parse().unwrap_or(0),
        })
    }

    pub fn parse_or_unknown(raw: Option<&str>) -> Self {
        match raw.and_then(Self::parse) {
            Some(endpoint) => endpoint,
            None => {
                log::debug!("malformed endpoint {raw:?}, substituting {UNKNOWN_ADDRESS}");
                Self::unknown()
            }
        }
    }

    pub fn unknown() -> Self {
        Self {
            address: UNKNOWN_ADDRESS.to_owned(),
            port: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_splits_on_last_colon() {
        let endpoint = Endpoint::parse("192.168.1.10:50000").unwrap();
        assert_eq!(endpoint.address, "192.168.1.10");
        assert_eq!(endpoint.port, 50000);

        let bracketed = Endpoint::parse("[fe80::1]:443").unwrap();
        assert_eq!(bracketed.address, "[fe80::1]");
        assert_eq!(bracketed.port, 443);
    }

    #[test]
    fn malformed_endpoints_fall_back_to_sentinel() {
        for raw in [None, Some(""), Some("Unknown"), Some(":443"), Some("   ")] {
            let endpoint = Endpoint::parse_or_unknown(raw);
            assert_eq!(endpoint, Endpoint::unknown(), "input {raw:?}");
        }
    }

    #[test]
    fn bad_port_keeps_address() {
        let endpoint = Endpoint::parse("10.0.0.1:https").unwrap();
        assert_eq!(endpoint.address, "10.0.0.1");
        assert_eq!(endpoint.port, 0);

        let overflow = Endpoint::parse("10.0.0.1:70000").unwrap();
        assert_eq!(overflow.port, 0);
    }

    #[test]
    fn port_field_is_read_leniently() {
        let records: Vec<FlowRecord> = serde_json::from_str(
            r#"[
                {"source": "a:1", "destination": "b:2", "port": 443},
                {"source": "a:1", "destination": "b:2", "port": " 8443 "},
                {"source": "a:1", "destination": "b:2", "port": "https"},
                {"source": "a:1", "destination": "b:2", "port": -5},
                {"source": "a:1", "destination": "b:2", "port": {"tcp": 22}},
                {"source": "a:1", "destination": "b:2", "port": null},
                {"source": "a:1", "destination": "b:2"}
            ]"#,
        )
        .unwrap();

        let ports = records.iter().map(|record| record.port).collect::<Vec<_>>();
        assert_eq!(
            ports,
            vec![Some(443), Some(8443), None, None, None, None, None]
        );
    }

    #[test]
    fn risk_parse_is_case_insensitive_and_lenient() {
        assert_eq!(RiskLevel::parse("HIGH"), RiskLevel::High);
        assert_eq!(RiskLevel::parse(" medium "), RiskLevel::Medium);
        assert_eq!(RiskLevel::parse("Low"), RiskLevel::Low);
        assert_eq!(RiskLevel::parse("Critical"), RiskLevel::None);
        assert!(RiskLevel::Medium.is_vulnerable());
        assert!(!RiskLevel::Low.is_vulnerable());
    }
}
