use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

use super::{Direction, FlightBoard, FlightRecord};

/// 時刻をHH:MM(24時間表記)に整形
pub(crate) fn format_time<Tz>(time: Option<DateTime<Utc>>, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.map(|time| time.with_timezone(tz).format("%H:%M").to_string())
}

/// ティッカー用のフライト情報文
pub(crate) fn status_update<Tz>(record: &FlightRecord, direction: Direction, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let number = record.flight_number();
    let time = format_time(record.leg(direction).scheduled, tz).unwrap_or_else(|| "--:--".into());
    let city = record
        .counterpart(direction)
        .airport
        .as_deref()
        .unwrap_or("Unknown");
    let preposition = match direction {
        Direction::Departures => "to",
        Direction::Arrivals => "from",
    };

    format!("Flight {number} {preposition} {city} scheduled at {time}")
}

/// 取得した全フライトからティッカーの候補を作る
pub(crate) fn status_updates<Tz>(board: &FlightBoard, tz: &Tz) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let departures = board
        .departures
        .iter()
        .map(|record| status_update(record, Direction::Departures, tz));
    let arrivals = board
        .arrivals
        .iter()
        .map(|record| status_update(record, Direction::Arrivals, tz));

    departures.chain(arrivals).collect()
}
