/// ティッカーの1セルあたりの幅(ピクセル換算)
pub const CELL_WIDTH_PX: f64 = 10.0;

/// テーブル列幅
pub const TIME_COLUMN_WIDTH: u16 = 6;
pub const FLIGHT_COLUMN_WIDTH: u16 = 12;
pub const GATE_COLUMN_WIDTH: u16 = 6;
pub const STATUS_COLUMN_WIDTH: u16 = 11;
pub const EST_COLUMN_WIDTH: u16 = 6;
/// 都市名列の最小幅
pub const MIN_CITY_COLUMN_WIDTH: u16 = 12;

/// レイアウトの高さ
pub const HEADER_HEIGHT: u16 = 2;
pub const PADDING_HEIGHT: u16 = 1;
pub const TABLE_TITLE_HEIGHT: u16 = 1;
pub const TICKER_HEIGHT: u16 = 1;
pub const FOOTER_HEIGHT: u16 = 1;

/// UIテキスト定数
pub const APP_TITLE: &str = "Airport Flight Information Display";
pub const FOOTER_TEXT: &str = "Press Ctrl-C or q to quit | r: Refresh";
pub const GATE_PLACEHOLDER: &str = "Soon";
pub const EST_PLACEHOLDER: &str = "-";
pub const CITY_PLACEHOLDER: &str = "Unknown";
