use chrono::{DateTime, Utc};
use fxhash::FxHashSet;

use super::{Direction, FlightRecord};

/// 生のフライト一覧を表示用に整える
///
/// 1. 表示方向の予定時刻が`now`以降のものに絞り込む。
///    出発で一件も残らない場合は絞り込み前の一覧を使う(到着には適用しない)。
/// 2. 予定時刻の昇順に安定ソートする。時刻のないものは末尾。
/// 3. コードシェア便と便名が重複するもの(大文字小文字を無視)を除き、`rows`件で打ち切る。
pub(crate) fn normalize(
    records: &[FlightRecord],
    direction: Direction,
    now: DateTime<Utc>,
    rows: usize,
) -> Vec<FlightRecord> {
    let scheduled = |record: &FlightRecord| record.leg(direction).scheduled;

    let mut working: Vec<&FlightRecord> = records
        .iter()
        .filter(|record| scheduled(record).is_some_and(|time| time >= now))
        .collect();

    if working.is_empty() && direction == Direction::Departures {
        working = records.iter().collect();
    }

    // Vec::sort_by_keyは安定ソート
    working.sort_by_key(|record| match scheduled(record) {
        Some(time) => (false, Some(time)),
        None => (true, None),
    });

    let mut seen = FxHashSet::default();
    let mut display = Vec::with_capacity(rows.min(working.len()));
    for record in working {
        if display.len() >= rows {
            break;
        }
        if record.codeshare {
            continue;
        }
        // 便名のないものは重複判定の対象外
        if record
            .identifier_key()
            .is_some_and(|key| !seen.insert(key))
        {
            continue;
        }
        display.push(record.clone());
    }

    display
}
