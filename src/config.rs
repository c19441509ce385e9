use std::path::{Path, PathBuf};
use std::{fs, io};

use chrono::Duration;
use serde::Deserialize;
use serde_with::{DurationSeconds, serde_as};
use thiserror::Error;

use crate::app_config::Template;
use crate::ticker::TickerDirection;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ConfigError {
    #[error("Failed to load {0}. error: {1}")]
    LoadFileError(PathBuf, io::ErrorKind),
    #[error(transparent)]
    TomlParseError(#[from] toml::de::Error),
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
    #[error("{0} must be longer than 0 seconds")]
    ZeroInterval(&'static str),
}

/// 行数の許容範囲
pub(crate) const ROWS_RANGE: (u64, u64) = (1, 30);
/// ティッカー速度の許容範囲
pub(crate) const SPEED_RANGE: (u64, u64) = (1, 100);
/// ティッカー頻度の許容範囲
pub(crate) const FREQUENCY_RANGE: (u64, u64) = (1, 60);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct TickerConfig {
    /// 固定メッセージ
    #[serde(default = "TickerConfig::default_text")]
    pub(crate) text: String,

    /// スクロール方向
    #[serde(default)]
    pub(crate) direction: TickerDirection,

    /// 1フレームあたりの移動量(1/10ピクセル単位)
    #[serde(default = "TickerConfig::default_speed")]
    pub(crate) speed: u32,

    /// 1秒あたりのフレーム数
    #[serde(default = "TickerConfig::default_frequency")]
    pub(crate) frequency: u32,

    /// フライト情報をローテーション表示するか
    #[serde(default = "TickerConfig::default_show_default")]
    pub(crate) show_default: bool,
}

impl TickerConfig {
    fn default_text() -> String {
        "Welcome to the Airport Flight Information System!".to_string()
    }

    const fn default_speed() -> u32 {
        60
    }

    const fn default_frequency() -> u32 {
        20
    }

    const fn default_show_default() -> bool {
        true
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            text: Self::default_text(),
            direction: TickerDirection::default(),
            speed: Self::default_speed(),
            frequency: Self::default_frequency(),
            show_default: Self::default_show_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct TableConfig {
    /// テーブルの最大行数
    #[serde(default = "TableConfig::default_rows")]
    pub(crate) rows: usize,

    /// 表示するテーブルの組み合わせ
    #[serde(default)]
    pub(crate) template: Template,
}

impl TableConfig {
    const fn default_rows() -> usize {
        15
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            rows: Self::default_rows(),
            template: Template::default(),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct RefreshConfig {
    /// 天気の更新間隔(秒)
    #[serde(default = "RefreshConfig::default_weather")]
    #[serde_as(as = "DurationSeconds<i64>")]
    pub(crate) weather: Duration,

    /// フライト情報の更新間隔(秒)
    #[serde(default = "RefreshConfig::default_flights")]
    #[serde_as(as = "DurationSeconds<i64>")]
    pub(crate) flights: Duration,

    /// 天気キャッシュのTTL(秒)
    #[serde(default = "RefreshConfig::default_weather_cache_ttl")]
    #[serde_as(as = "DurationSeconds<i64>")]
    pub(crate) weather_cache_ttl: Duration,
}

impl RefreshConfig {
    const fn default_weather() -> Duration {
        Duration::seconds(600)
    }

    const fn default_flights() -> Duration {
        Duration::seconds(300)
    }

    const fn default_weather_cache_ttl() -> Duration {
        Duration::seconds(600)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            weather: Self::default_weather(),
            flights: Self::default_flights(),
            weather_cache_ttl: Self::default_weather_cache_ttl(),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ApiConfig {
    /// フライト情報APIのエンドポイント
    #[serde(default = "ApiConfig::default_flights_url")]
    pub(crate) flights_url: String,

    /// 天気APIのエンドポイント
    #[serde(default = "ApiConfig::default_weather_url")]
    pub(crate) weather_url: String,

    /// 天気APIのキー
    #[serde(default)]
    pub(crate) weather_key: String,

    /// HTTPリクエストのタイムアウト(秒)
    #[serde(default = "ApiConfig::default_timeout")]
    #[serde_as(as = "DurationSeconds<i64>")]
    pub(crate) timeout: Duration,
}

impl ApiConfig {
    fn default_flights_url() -> String {
        "http://api.aviationstack.com/v1/flights".to_string()
    }

    fn default_weather_url() -> String {
        "https://api.openweathermap.org/data/2.5/weather".to_string()
    }

    const fn default_timeout() -> Duration {
        Duration::seconds(10)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            flights_url: Self::default_flights_url(),
            weather_url: Self::default_weather_url(),
            weather_key: String::new(),
            timeout: Self::default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct BridgeConfig {
    /// ホストからのメッセージを読み込むファイルまたはFIFOのパス
    #[serde(default)]
    pub(crate) path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct Config {
    /// 空港のIATAコード
    /// デフォルトはWAW
    #[serde(default = "Config::default_airport")]
    pub(crate) airport: String,

    /// フライト情報APIのトークン
    #[serde(default)]
    pub(crate) token: String,

    /// ティッカー設定
    #[serde(default)]
    pub(crate) ticker: TickerConfig,

    /// テーブル設定
    #[serde(default)]
    pub(crate) table: TableConfig,

    /// 更新間隔設定
    #[serde(default)]
    pub(crate) refresh: RefreshConfig,

    /// 外部API設定
    #[serde(default)]
    pub(crate) api: ApiConfig,

    /// ホストブリッジ設定
    #[serde(default)]
    pub(crate) bridge: BridgeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            airport: Self::default_airport(),
            token: String::new(),
            ticker: TickerConfig::default(),
            table: TableConfig::default(),
            refresh: RefreshConfig::default(),
            api: ApiConfig::default(),
            bridge: BridgeConfig::default(),
        }
    }
}

impl Config {
    pub(crate) fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFileError(path.to_path_buf(), e.kind()))?;
        let config: Self = toml::from_str(&content).map_err(ConfigError::TomlParseError)?;
        config.validate()
    }

    /// 入力フォームと同じ範囲で値を検証
    fn validate(self) -> Result<Self, ConfigError> {
        check_range("table.rows", self.table.rows as u64, ROWS_RANGE)?;
        check_range("ticker.speed", self.ticker.speed.into(), SPEED_RANGE)?;
        check_range(
            "ticker.frequency",
            self.ticker.frequency.into(),
            FREQUENCY_RANGE,
        )?;

        for (field, duration) in [
            ("refresh.weather", self.refresh.weather),
            ("refresh.flights", self.refresh.flights),
            ("api.timeout", self.api.timeout),
        ] {
            if duration <= Duration::zero() {
                return Err(ConfigError::ZeroInterval(field));
            }
        }

        Ok(self)
    }

    /// デフォルトの空港コード
    fn default_airport() -> String {
        "WAW".to_string()
    }
}

fn check_range(field: &'static str, value: u64, (min, max): (u64, u64)) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_load() {
        // [正常系] 有効なTOMLファイルを読み込む
        let toml_content = r#"
airport = "BCN"
token = "secret"

[ticker]
text = "Hello"
direction = "right"
speed = 30
frequency = 10
show_default = false

[table]
rows = 8
template = "flightScheduleArrivals"

[refresh]
weather = 120
flights = 60
"#;

        let temp_file = write_temp(toml_content);
        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.airport, "BCN");
        assert_eq!(config.token, "secret");
        assert_eq!(config.ticker.text, "Hello");
        assert_eq!(config.ticker.direction, TickerDirection::Right);
        assert_eq!(config.ticker.speed, 30);
        assert_eq!(config.ticker.frequency, 10);
        assert!(!config.ticker.show_default);
        assert_eq!(config.table.rows, 8);
        assert_eq!(config.table.template, Template::Arrivals);
        assert_eq!(config.refresh.weather, Duration::seconds(120));
        assert_eq!(config.refresh.flights, Duration::seconds(60));
        assert_eq!(config.refresh.weather_cache_ttl, Duration::seconds(600)); // デフォルト値
        assert_eq!(config.api.timeout, Duration::seconds(10)); // デフォルト値
        assert_eq!(config.bridge.path, None);

        // [正常系] 空のファイルは全てデフォルト値になる
        let temp_file = write_temp("");
        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config, Config::default());

        // [異常系] 存在しないファイルを読み込む
        let result = Config::load("/path/to/non/existent/file.toml");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::LoadFileError(_, io::ErrorKind::NotFound)
        ));

        // [異常系] 無効なTOMLファイルを読み込む
        let temp_file = write_temp("invalid toml content\n[unclosed section\n");
        let result = Config::load(temp_file.path());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::TomlParseError(_)
        ));

        // [異常系] 未知のテンプレート名
        let temp_file = write_temp("[table]\ntemplate = \"flightScheduleCargo\"\n");
        let result = Config::load(temp_file.path());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::TomlParseError(_)
        ));
    }

    #[test]
    fn test_validate() {
        // [異常系] 行数が範囲外
        let temp_file = write_temp("[table]\nrows = 31\n");
        let result = Config::load(temp_file.path());
        assert_eq!(
            result.unwrap_err(),
            ConfigError::OutOfRange {
                field: "table.rows",
                value: 31,
                min: 1,
                max: 30,
            }
        );

        // [異常系] 速度が0
        let temp_file = write_temp("[ticker]\nspeed = 0\n");
        let result = Config::load(temp_file.path());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::OutOfRange {
                field: "ticker.speed",
                ..
            }
        ));

        // [異常系] 頻度が上限超過
        let temp_file = write_temp("[ticker]\nfrequency = 61\n");
        let result = Config::load(temp_file.path());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::OutOfRange {
                field: "ticker.frequency",
                ..
            }
        ));

        // [異常系] 更新間隔が0秒
        let temp_file = write_temp("[refresh]\nflights = 0\n");
        let result = Config::load(temp_file.path());
        assert_eq!(
            result.unwrap_err(),
            ConfigError::ZeroInterval("refresh.flights")
        );

        // [正常系] 境界値は許容される
        let temp_file = write_temp("[table]\nrows = 30\n[ticker]\nspeed = 1\nfrequency = 60\n");
        assert!(Config::load(temp_file.path()).is_ok());
    }
}
