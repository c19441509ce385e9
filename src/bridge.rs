use log::debug;
use serde::Deserialize;

use crate::app_config::{AppConfig, ConfigPatch};

/// ホストから届くメッセージ
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum HostMessage {
    /// 空港コードの更新
    #[serde(rename = "VXT_AIRPORT_UPDATE")]
    AirportUpdate {
        code: String,
        /// ホストが計算した所在地(使わない)
        #[serde(default)]
        location: Option<String>,
    },
    /// APIトークンの更新
    #[serde(rename = "VXT_TOKEN_UPDATE")]
    TokenUpdate { token: String },
    /// 設定の更新
    #[serde(rename = "VXT_CONFIG_UPDATE")]
    ConfigUpdate { config: ConfigPatch },
    #[serde(other)]
    Unknown,
}

impl HostMessage {
    /// 1行分のJSONを解釈する
    /// 空行・解釈できない行・未知の種類はNone
    pub(crate) fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match serde_json::from_str::<HostMessage>(line) {
            Ok(HostMessage::Unknown) => {
                debug!("Ignoring host message with unknown type");
                None
            }
            Ok(message) => Some(message),
            Err(e) => {
                debug!("Ignoring undecodable host message: {e}");
                None
            }
        }
    }

    /// 設定に反映する
    /// 変更があった場合はtrueを返す
    pub(crate) fn apply(&self, config: &mut AppConfig) -> bool {
        let before = config.clone();
        match self {
            // 所在地は空港コードから再計算する
            HostMessage::AirportUpdate { code, .. } => config.set_airport(code),
            HostMessage::TokenUpdate { token } => config.set_token(token),
            HostMessage::ConfigUpdate { config: patch } => config.merge(patch),
            HostMessage::Unknown => {}
        }
        *config != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_parse_line() {
        // [正常系] 3種類のメッセージ
        assert_eq!(
            HostMessage::parse_line(r#"{"type":"VXT_AIRPORT_UPDATE","code":"BCN","location":"BARCELONA"}"#),
            Some(HostMessage::AirportUpdate {
                code: "BCN".to_string(),
                location: Some("BARCELONA".to_string()),
            })
        );
        assert_eq!(
            HostMessage::parse_line(r#"{"type":"VXT_TOKEN_UPDATE","token":"abc"}"#),
            Some(HostMessage::TokenUpdate {
                token: "abc".to_string()
            })
        );
        let message = HostMessage::parse_line(
            r#"{"type":"VXT_CONFIG_UPDATE","config":{"rowsCount":"10","showDefaultTicker":"false"}}"#,
        );
        assert!(matches!(message, Some(HostMessage::ConfigUpdate { .. })));

        // [異常系] 未知の種類・壊れたJSON・空行は無視
        assert_eq!(
            HostMessage::parse_line(r#"{"type":"VXT_SOMETHING_ELSE","value":1}"#),
            None
        );
        assert_eq!(HostMessage::parse_line("{not json"), None);
        assert_eq!(HostMessage::parse_line(r#"{"type":"VXT_TOKEN_UPDATE"}"#), None);
        assert_eq!(HostMessage::parse_line("   "), None);
    }

    #[test]
    fn test_apply() {
        let mut config = AppConfig::from(&Config::default());

        // [正常系] ホストの所在地ではなくローカルの対応表を使う
        let message = HostMessage::AirportUpdate {
            code: "DEL".to_string(),
            location: Some("SOMEWHERE".to_string()),
        };
        assert!(message.apply(&mut config));
        assert_eq!(config.airport_code, "DEL");
        assert_eq!(config.airport_location, "DELHI");

        // [正常系] 同じ内容なら変更なし
        assert!(!message.apply(&mut config));

        let message = HostMessage::TokenUpdate {
            token: "t0ken".to_string(),
        };
        assert!(message.apply(&mut config));
        assert_eq!(config.api_token, "t0ken");

        // [正常系] 到着順に関係なくマージされる
        let message = HostMessage::parse_line(
            r#"{"type":"VXT_CONFIG_UPDATE","config":{"rowsCount":"7","iataCodeCity":"WAW"}}"#,
        )
        .unwrap();
        assert!(message.apply(&mut config));
        assert_eq!(config.rows_count, 7);
        assert_eq!(config.airport_location, "WARSAW");
        assert_eq!(config.api_token, "t0ken");

        assert!(!HostMessage::Unknown.apply(&mut config));
    }
}
