use std::fmt;
use std::str::FromStr;

use log::warn;
use serde::Deserialize;

use crate::config::Config;
use crate::ticker::TickerDirection;

/// 空港コードに対応する都市名が見つからない場合の表示
pub(crate) const UNKNOWN_LOCATION: &str = "UNKNOWN";

/// IATAコードから都市名への対応表
const IATA_TO_CITY: [(&str, &str); 5] = [
    ("WAW", "WARSAW"),
    ("BCN", "BARCELONA"),
    ("BER", "BERLIN"),
    ("KE", "NAIROBI"),
    ("DEL", "DELHI"),
];

/// IATAコードから都市名を引く
pub(crate) fn city_name(code: &str) -> Option<&'static str> {
    let code = code.trim();
    IATA_TO_CITY
        .iter()
        .find(|(iata, _)| iata.eq_ignore_ascii_case(code))
        .map(|(_, city)| *city)
}

/// 空港コードから所在地を導出する
/// ホストが計算した所在地は信用せず、常にここで再計算する
pub(crate) fn location_for(code: &str) -> String {
    city_name(code).unwrap_or(UNKNOWN_LOCATION).to_string()
}

/// 表示するテーブルの組み合わせ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub(crate) enum Template {
    #[default]
    #[serde(rename = "flightScheduleMain")]
    Main,
    #[serde(rename = "flightScheduleDepartures")]
    Departures,
    #[serde(rename = "flightScheduleArrivals")]
    Arrivals,
}

impl Template {
    pub(crate) fn shows_departures(self) -> bool {
        matches!(self, Template::Main | Template::Departures)
    }

    pub(crate) fn shows_arrivals(self) -> bool {
        matches!(self, Template::Main | Template::Arrivals)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UnknownTemplate(pub(crate) String);

impl fmt::Display for UnknownTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown template: {}", self.0)
    }
}

impl FromStr for Template {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flightScheduleMain" => Ok(Template::Main),
            "flightScheduleDepartures" => Ok(Template::Departures),
            "flightScheduleArrivals" => Ok(Template::Arrivals),
            other => Err(UnknownTemplate(other.to_string())),
        }
    }
}

/// ホストから届くオプション値
/// 文字列・数値・真偽値のいずれでも届きうる
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum OptionValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl OptionValue {
    /// 空でない文字列として取り出す
    fn as_text(&self) -> Option<String> {
        match self {
            OptionValue::Text(s) if !s.is_empty() => Some(s.clone()),
            OptionValue::Number(n) if *n != 0.0 && n.is_finite() => Some(n.to_string()),
            _ => None,
        }
    }

    /// 1以上の整数として取り出す
    /// 0・空文字・解釈できない値は「未指定」と同じ扱い
    fn as_count(&self) -> Option<u64> {
        let n = match self {
            OptionValue::Number(n) => *n,
            OptionValue::Text(s) => s.trim().parse::<f64>().ok()?,
            OptionValue::Bool(_) => return None,
        };
        (n.is_finite() && n >= 1.0).then_some(n as u64)
    }

    /// 値として"true"かどうか
    /// 文字列"false"は存在していても偽になる
    fn as_flag(&self) -> bool {
        match self {
            OptionValue::Bool(b) => *b,
            OptionValue::Text(s) => s == "true",
            OptionValue::Number(_) => false,
        }
    }
}

/// ホストから届く部分的な設定
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub(crate) struct ConfigPatch {
    #[serde(rename = "inputuserTickerText", default)]
    pub(crate) ticker_text: Option<OptionValue>,
    #[serde(rename = "userTickerDirection", default)]
    pub(crate) ticker_direction: Option<OptionValue>,
    #[serde(rename = "userTickerSpeed", default)]
    pub(crate) ticker_speed: Option<OptionValue>,
    #[serde(rename = "userTickerFrequency", default)]
    pub(crate) ticker_frequency: Option<OptionValue>,
    #[serde(rename = "showDefaultTicker", default)]
    pub(crate) show_default_ticker: Option<OptionValue>,
    #[serde(rename = "rowsCount", default)]
    pub(crate) rows_count: Option<OptionValue>,
    #[serde(default)]
    pub(crate) template: Option<OptionValue>,
    #[serde(rename = "Token", default)]
    pub(crate) token: Option<OptionValue>,
    #[serde(rename = "iataCodeCity", default)]
    pub(crate) airport_code: Option<OptionValue>,
}

/// 表示に関わる全ての設定
/// ブリッジワーカーが所有し、スナップショットとして配布する
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AppConfig {
    pub(crate) ticker_text: String,
    pub(crate) ticker_direction: TickerDirection,
    pub(crate) ticker_speed: u32,
    pub(crate) ticker_frequency: u32,
    pub(crate) show_default_ticker: bool,
    pub(crate) rows_count: usize,
    pub(crate) template: Template,
    pub(crate) airport_code: String,
    /// 空港コードから導出した都市名
    pub(crate) airport_location: String,
    pub(crate) api_token: String,
}

impl From<&Config> for AppConfig {
    fn from(config: &Config) -> Self {
        Self {
            ticker_text: config.ticker.text.clone(),
            ticker_direction: config.ticker.direction,
            ticker_speed: config.ticker.speed,
            ticker_frequency: config.ticker.frequency,
            show_default_ticker: config.ticker.show_default,
            rows_count: config.table.rows,
            template: config.table.template,
            airport_code: config.airport.clone(),
            airport_location: location_for(&config.airport),
            api_token: config.token.clone(),
        }
    }
}

impl AppConfig {
    /// 部分的な設定をマージする
    /// 指定されていない項目は現在の値のまま
    pub(crate) fn merge(&mut self, patch: &ConfigPatch) {
        if let Some(text) = patch.ticker_text.as_ref().and_then(OptionValue::as_text) {
            self.ticker_text = text;
        }
        if let Some(direction) = patch
            .ticker_direction
            .as_ref()
            .and_then(OptionValue::as_text)
        {
            self.ticker_direction = TickerDirection::from_option(&direction);
        }
        if let Some(speed) = patch.ticker_speed.as_ref().and_then(OptionValue::as_count) {
            self.ticker_speed = u32::try_from(speed).unwrap_or(u32::MAX);
        }
        if let Some(frequency) = patch
            .ticker_frequency
            .as_ref()
            .and_then(OptionValue::as_count)
        {
            self.ticker_frequency = u32::try_from(frequency).unwrap_or(u32::MAX);
        }
        if let Some(show) = patch.show_default_ticker.as_ref() {
            self.show_default_ticker = show.as_flag();
        }
        if let Some(rows) = patch.rows_count.as_ref().and_then(OptionValue::as_count) {
            self.rows_count = usize::try_from(rows).unwrap_or(usize::MAX);
        }
        if let Some(template) = patch.template.as_ref().and_then(OptionValue::as_text) {
            match template.parse() {
                Ok(template) => self.template = template,
                Err(e) => warn!("Ignoring template update: {e}"),
            }
        }
        if let Some(token) = patch.token.as_ref().and_then(OptionValue::as_text) {
            self.api_token = token;
        }
        if let Some(code) = patch.airport_code.as_ref().and_then(OptionValue::as_text) {
            self.set_airport(&code);
        }
    }

    /// 空港コードを更新し、所在地を再計算する
    pub(crate) fn set_airport(&mut self, code: &str) {
        if code.is_empty() {
            return;
        }
        self.airport_code = code.to_string();
        self.airport_location = location_for(code);
    }

    pub(crate) fn set_token(&mut self, token: &str) {
        if !token.is_empty() {
            self.api_token = token.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn patch(value: serde_json::Value) -> ConfigPatch {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_city_name() {
        // [正常系] 既知のコード
        assert_eq!(city_name("WAW"), Some("WARSAW"));
        assert_eq!(city_name("bcn"), Some("BARCELONA"));
        // [異常系] 未知のコード
        assert_eq!(city_name("JFK"), None);
        assert_eq!(location_for("JFK"), UNKNOWN_LOCATION);
    }

    #[test]
    fn test_template() {
        assert_eq!("flightScheduleMain".parse::<Template>(), Ok(Template::Main));
        assert_eq!("flightScheduleDepartures".parse::<Template>(), Ok(Template::Departures));
        assert_eq!("flightScheduleArrivals".parse::<Template>(), Ok(Template::Arrivals));
        assert!("flightScheduleCargo".parse::<Template>().is_err());

        assert!(Template::Main.shows_departures() && Template::Main.shows_arrivals());
        assert!(Template::Departures.shows_departures());
        assert!(!Template::Departures.shows_arrivals());
        assert!(!Template::Arrivals.shows_departures());
    }

    #[test]
    fn test_merge_show_default_ticker_by_value() {
        // [正常系] 文字列"false"は値で比較されて偽になる
        let mut config = AppConfig::from(&Config::default());
        assert!(config.show_default_ticker);
        assert_eq!(config.rows_count, 15);

        config.merge(&patch(json!({ "showDefaultTicker": "false" })));

        assert!(!config.show_default_ticker);
        assert_eq!(config.rows_count, 15);

        // [正常系] "true"で再び有効になる
        config.merge(&patch(json!({ "showDefaultTicker": "true" })));
        assert!(config.show_default_ticker);

        // [正常系] 真偽値も値で扱う
        config.merge(&patch(json!({ "showDefaultTicker": false })));
        assert!(!config.show_default_ticker);
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        // [正常系] 指定されていない項目は変更されない
        let original = AppConfig::from(&Config::default());
        let mut config = original.clone();

        config.merge(&ConfigPatch::default());
        assert_eq!(config, original);

        config.merge(&patch(json!({ "inputuserTickerText": "Gate change" })));
        assert_eq!(config.ticker_text, "Gate change");
        assert_eq!(config.ticker_speed, original.ticker_speed);
        assert_eq!(config.airport_code, original.airport_code);
    }

    #[test]
    fn test_merge_numeric_options() {
        let mut config = AppConfig::from(&Config::default());

        // [正常系] 文字列と数値のどちらでも受け付ける
        config.merge(&patch(json!({
            "userTickerSpeed": "80",
            "userTickerFrequency": 30,
            "rowsCount": "10",
        })));
        assert_eq!(config.ticker_speed, 80);
        assert_eq!(config.ticker_frequency, 30);
        assert_eq!(config.rows_count, 10);

        // [正常系] 0・空文字・解釈できない値は未指定と同じ
        config.merge(&patch(json!({
            "userTickerSpeed": 0,
            "userTickerFrequency": "",
            "rowsCount": "many",
        })));
        assert_eq!(config.ticker_speed, 80);
        assert_eq!(config.ticker_frequency, 30);
        assert_eq!(config.rows_count, 10);

        // [正常系] 範囲外の値も再検証しない
        config.merge(&patch(json!({ "rowsCount": 99 })));
        assert_eq!(config.rows_count, 99);
    }

    #[test]
    fn test_merge_direction_and_template() {
        let mut config = AppConfig::from(&Config::default());

        config.merge(&patch(json!({
            "userTickerDirection": "right",
            "template": "flightScheduleDepartures",
        })));
        assert_eq!(config.ticker_direction, TickerDirection::Right);
        assert_eq!(config.template, Template::Departures);

        config.merge(&patch(json!({ "userTickerDirection": "left" })));
        assert_eq!(config.ticker_direction, TickerDirection::Left);

        // [異常系] 未知のテンプレートは無視される
        config.merge(&patch(json!({ "template": "flightScheduleCargo" })));
        assert_eq!(config.template, Template::Departures);
    }

    #[test]
    fn test_merge_airport_and_token() {
        let mut config = AppConfig::from(&Config::default());
        assert_eq!(config.airport_location, "WARSAW");

        // [正常系] 所在地はローカルで再計算される
        config.merge(&patch(json!({ "iataCodeCity": "BER", "Token": "abc" })));
        assert_eq!(config.airport_code, "BER");
        assert_eq!(config.airport_location, "BERLIN");
        assert_eq!(config.api_token, "abc");

        // [正常系] 空のトークンで上書きしない
        config.merge(&patch(json!({ "Token": "" })));
        assert_eq!(config.api_token, "abc");
        config.set_token("");
        assert_eq!(config.api_token, "abc");

        // [正常系] 未知の空港コード
        config.set_airport("JFK");
        assert_eq!(config.airport_code, "JFK");
        assert_eq!(config.airport_location, UNKNOWN_LOCATION);
    }

    #[test]
    fn test_patch_ignores_unknown_fields() {
        // [正常系] ホスト側の追加項目は無視する
        let patch = patch(json!({
            "welcomeMessageHeading": "",
            "rowsCount": null,
        }));
        assert_eq!(patch, ConfigPatch::default());
    }
}
