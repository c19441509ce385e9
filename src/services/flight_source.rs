use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::Value;

use super::{SourceError, build_client};
use crate::config::ApiConfig;
use crate::flight::{Direction, FlightRecord};

/// フライト情報の取得元
#[async_trait]
pub(crate) trait FlightSource: Send + Sync {
    async fn fetch_flights(
        &self,
        direction: Direction,
        airport_code: &str,
        token: &str,
    ) -> Result<Vec<FlightRecord>, SourceError>;
}

#[derive(Debug, Deserialize)]
struct FlightsResponse {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// aviationstack形式のREST APIクライアント
pub(crate) struct AviationStackClient {
    client: reqwest::Client,
    url: String,
}

impl AviationStackClient {
    pub(crate) fn new(config: &ApiConfig) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(config.timeout)?,
            url: config.flights_url.clone(),
        })
    }
}

#[async_trait]
impl FlightSource for AviationStackClient {
    async fn fetch_flights(
        &self,
        direction: Direction,
        airport_code: &str,
        token: &str,
    ) -> Result<Vec<FlightRecord>, SourceError> {
        if token.is_empty() {
            return Err(SourceError::MissingToken);
        }

        debug!("Fetching {} for {airport_code}", direction.title());
        let res = self
            .client
            .get(&self.url)
            .query(&[("access_key", token), (direction.query_param(), airport_code)])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(SourceError::StatusError(res.status().as_u16()));
        }

        let body: Value = res.json().await?;
        parse_flights_body(body)
    }
}

/// レスポンス本文からフライト一覧を取り出す
fn parse_flights_body(body: Value) -> Result<Vec<FlightRecord>, SourceError> {
    let response: FlightsResponse = serde_json::from_value(body)
        .map_err(|e| SourceError::ApiError(format!("malformed response: {e}")))?;

    if let Some(error) = response.error {
        let message = error["message"]
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| error.to_string());
        return Err(SourceError::ApiError(message));
    }

    Ok(response.data.iter().map(FlightRecord::from_json).collect())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_flights_body() {
        // [正常系] dataの各要素を変換する
        let body = json!({
            "pagination": { "limit": 100, "count": 2 },
            "data": [
                { "flight": { "iata": "LO1" }, "departure": { "scheduled": "2025-03-01T10:00:00+00:00" } },
                { "flight": { "iata": "LO2" } }
            ]
        });

        let records = parse_flights_body(body).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].flight_number(), "LO1");
        assert!(records[0].departure.scheduled.is_some());
        assert_eq!(records[1].departure.scheduled, None);

        // [正常系] dataがなければ空
        assert!(parse_flights_body(json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_parse_flights_body_error() {
        // [異常系] APIのエラー応答
        let body = json!({
            "error": { "code": "usage_limit_reached", "message": "Your monthly usage limit has been reached." }
        });
        let result = parse_flights_body(body);
        assert!(matches!(
            result,
            Err(SourceError::ApiError(message)) if message == "Your monthly usage limit has been reached."
        ));

        // [異常系] dataが配列でない
        let result = parse_flights_body(json!({ "data": "none" }));
        assert!(matches!(result, Err(SourceError::ApiError(_))));
    }

    #[tokio::test]
    async fn test_fetch_flights_without_token() {
        // [異常系] トークンがなければリクエストしない
        let client = AviationStackClient::new(&ApiConfig::default()).unwrap();

        let result = client
            .fetch_flights(Direction::Departures, "WAW", "")
            .await;

        assert!(matches!(result, Err(SourceError::MissingToken)));
    }
}
