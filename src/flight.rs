use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

pub(crate) mod normalizer;
pub(crate) mod status;

pub(crate) use normalizer::normalize;

/// 表示するフライトの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
    Departures,
    Arrivals,
}

impl Direction {
    /// フライト情報APIの絞り込みパラメータ名
    pub(crate) fn query_param(self) -> &'static str {
        match self {
            Direction::Departures => "dep_iata",
            Direction::Arrivals => "arr_iata",
        }
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            Direction::Departures => "DEPARTURES",
            Direction::Arrivals => "ARRIVALS",
        }
    }

    /// 相手側空港の列見出し
    pub(crate) fn counterpart_title(self) -> &'static str {
        match self {
            Direction::Departures => "DESTINATION",
            Direction::Arrivals => "ORIGIN",
        }
    }
}

/// フライトの片側(出発または到着)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FlightLeg {
    /// 空港のIATAコード
    pub(crate) airport: Option<String>,
    pub(crate) scheduled: Option<DateTime<Utc>>,
    pub(crate) estimated: Option<DateTime<Utc>>,
    pub(crate) gate: Option<String>,
    pub(crate) delayed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FlightRecord {
    /// IATA/ICAOの便名
    pub(crate) number: Option<String>,
    pub(crate) departure: FlightLeg,
    pub(crate) arrival: FlightLeg,
    /// 航空会社のIATAコード
    pub(crate) airline: Option<String>,
    pub(crate) status: Option<String>,
    /// コードシェア便か
    pub(crate) codeshare: bool,
}

impl FlightRecord {
    /// 表示方向に対応する側
    pub(crate) fn leg(&self, direction: Direction) -> &FlightLeg {
        match direction {
            Direction::Departures => &self.departure,
            Direction::Arrivals => &self.arrival,
        }
    }

    /// 表示方向と反対側(行き先または出発地)
    pub(crate) fn counterpart(&self, direction: Direction) -> &FlightLeg {
        match direction {
            Direction::Departures => &self.arrival,
            Direction::Arrivals => &self.departure,
        }
    }

    /// 重複判定用のキー(大文字小文字を区別しない)
    pub(crate) fn identifier_key(&self) -> Option<String> {
        self.number.as_deref().map(str::to_uppercase)
    }

    pub(crate) fn flight_number(&self) -> &str {
        self.number.as_deref().unwrap_or("N/A")
    }

    pub(crate) fn airline_code(&self) -> &str {
        self.airline.as_deref().unwrap_or("XX")
    }

    /// 遅延フラグがあれば"delayed"を優先する
    pub(crate) fn display_status(&self, direction: Direction) -> &str {
        if self.leg(direction).delayed {
            "delayed"
        } else {
            self.status.as_deref().unwrap_or("N/A")
        }
    }

    /// フライト情報APIのJSONから変換する
    /// 型の合わない項目や欠けている項目は未設定として扱い、エラーにはしない
    pub(crate) fn from_json(value: &Value) -> Self {
        let flight = &value["flight"];
        let number = first_str(flight, &["iataNumber", "iata", "icaoNumber", "number"]);
        let codeshare = is_truthy(&value["codeshared"]) || is_truthy(&flight["codeshared"]);
        let status = first_str(value, &["flight_status", "status"]);
        let airline = first_str(&value["airline"], &["iataCode", "iata"]);

        Self {
            number,
            departure: leg_from_json(&value["departure"]),
            arrival: leg_from_json(&value["arrival"]),
            airline,
            status,
            codeshare,
        }
    }
}

fn leg_from_json(value: &Value) -> FlightLeg {
    FlightLeg {
        airport: first_str(value, &["iataCode", "iata"]),
        scheduled: first_str(value, &["scheduledTime", "scheduled"])
            .as_deref()
            .and_then(parse_timestamp),
        estimated: first_str(value, &["estimatedTime", "estimated"])
            .as_deref()
            .and_then(parse_timestamp),
        gate: first_str(value, &["gate"]),
        delayed: is_truthy(&value["delay"]),
    }
}

/// 候補のキーのうち最初に値が入っているものを返す
fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match &value[*key] {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// APIの時刻文字列を解釈する
/// タイムゾーンのない形式はUTCとみなす
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim().to_uppercase();
    if let Ok(time) = DateTime::parse_from_rfc3339(&s) {
        return Some(time.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// 一回の取得で得られた出発・到着の生データ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FlightBoard {
    pub(crate) departures: Vec<FlightRecord>,
    pub(crate) arrivals: Vec<FlightRecord>,
}
