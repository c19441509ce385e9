use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use async_trait::async_trait;
use chrono::Duration;
use fxhash::FxHashMap;
use log::{debug, warn};
use parking_lot::RwLock;
use serde_json::Value;

use super::{SourceError, build_client};
use crate::config::ApiConfig;

/// 表示用の天気情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Weather {
    pub(crate) temp: String,
    pub(crate) condition: String,
    pub(crate) icon: &'static str,
}

impl Weather {
    /// 初回取得前の表示
    pub(crate) fn loading() -> Self {
        Self {
            temp: "Loading...".to_string(),
            condition: "Loading...".to_string(),
            icon: DEFAULT_ICON,
        }
    }

    /// 取得失敗時の表示
    pub(crate) fn unavailable() -> Self {
        Self {
            temp: "N/A".to_string(),
            condition: "Loading...".to_string(),
            icon: DEFAULT_ICON,
        }
    }
}

const DEFAULT_ICON: &str = "🌤️";

/// 天気の状態からアイコンを選ぶ
pub(crate) fn weather_icon(condition: &str) -> &'static str {
    let condition = condition.to_lowercase();
    if condition.contains("clear") {
        "☀️"
    } else if condition.contains("cloud") {
        "☁️"
    } else if condition.contains("rain") || condition.contains("drizzle") {
        "🌧️"
    } else if condition.contains("snow") {
        "❄️"
    } else if condition.contains("thunderstorm") {
        "⛈️"
    } else {
        DEFAULT_ICON
    }
}

/// 天気情報の取得元
#[async_trait]
pub(crate) trait WeatherSource: Send + Sync {
    async fn fetch_weather(&self, location: &str) -> Result<Weather, SourceError>;
}

/// OpenWeatherMap形式のREST APIクライアント
pub(crate) struct OpenWeatherClient {
    client: reqwest::Client,
    url: String,
    key: String,
}

impl OpenWeatherClient {
    pub(crate) fn new(config: &ApiConfig) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(config.timeout)?,
            url: config.weather_url.clone(),
            key: config.weather_key.clone(),
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_weather(&self, location: &str) -> Result<Weather, SourceError> {
        let res = self
            .client
            .get(&self.url)
            .query(&[("q", location), ("units", "metric"), ("appid", self.key.as_str())])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(SourceError::StatusError(res.status().as_u16()));
        }

        let body: Value = res.json().await?;
        parse_weather_body(&body)
    }
}

/// レスポンス本文から天気情報を取り出す
fn parse_weather_body(body: &Value) -> Result<Weather, SourceError> {
    let temp = body["main"]["temp"]
        .as_f64()
        .ok_or_else(|| SourceError::ApiError("missing main.temp".to_string()))?;
    let condition = body["weather"][0]["main"]
        .as_str()
        .ok_or_else(|| SourceError::ApiError("missing weather[0].main".to_string()))?;

    Ok(Weather {
        temp: format!("{}°C", temp.round() as i64),
        condition: condition.to_string(),
        icon: weather_icon(condition),
    })
}

#[derive(Debug, Clone)]
struct WeatherEntry {
    weather: Weather,
    created_at: Instant,
    ttl: Duration,
}

impl WeatherEntry {
    fn new(weather: Weather, ttl: Duration) -> Self {
        Self {
            weather,
            created_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        let elapsed = self.created_at.elapsed();
        let ttl_std = StdDuration::from_secs(self.ttl.num_seconds().max(0) as u64);
        elapsed >= ttl_std
    }
}

/// 所在地ごとに天気をキャッシュする
/// 取得に失敗してもエラーは返さず、代替の表示を返す
pub(crate) struct WeatherService {
    source: Arc<dyn WeatherSource>,
    entries: RwLock<FxHashMap<String, WeatherEntry>>,
    ttl: Duration,
}

impl WeatherService {
    pub(crate) fn new(source: Arc<dyn WeatherSource>, ttl: Duration) -> Self {
        Self {
            source,
            entries: RwLock::new(FxHashMap::default()),
            ttl,
        }
    }

    pub(crate) async fn fetch_weather(&self, location: &str) -> Weather {
        // まず読み取りロックでキャッシュを確認
        {
            let entries = self.entries.read();
            if let Some(entry) = entries.get(location) {
                if !entry.is_expired() {
                    debug!("Weather cache hit for {location}");
                    return entry.weather.clone();
                }
            }
        }

        match self.source.fetch_weather(location).await {
            Ok(weather) => {
                let mut entries = self.entries.write();
                // 期限切れエントリを削除してから新しいエントリを追加
                entries.retain(|_, entry| !entry.is_expired());
                entries.insert(
                    location.to_string(),
                    WeatherEntry::new(weather.clone(), self.ttl),
                );
                weather
            }
            Err(e) => {
                warn!("Failed to fetch weather for {location}: {e}");
                Weather::unavailable()
            }
        }
    }
}
