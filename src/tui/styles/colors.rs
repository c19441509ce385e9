use ratatui::style::Color;

/// UI要素の色
pub const HEADER_COLOR: Color = Color::Yellow;
pub const HEADER_DATE_COLOR: Color = Color::Gray;
pub const FOOTER_COLOR: Color = Color::Gray;
pub const TABLE_TITLE_COLOR: Color = Color::Yellow;
pub const TABLE_HEADER_COLOR: Color = Color::Gray;

/// 行の背景色(交互)
pub const ROW_EVEN_BG: Color = Color::Rgb(24, 28, 48);
pub const ROW_ODD_BG: Color = Color::Rgb(34, 40, 64);
pub const ROW_TEXT_COLOR: Color = Color::White;

/// ステータス色
pub const STATUS_ACTIVE_COLOR: Color = Color::Green;
pub const STATUS_DELAYED_COLOR: Color = Color::Red;
pub const STATUS_CANCELLED_COLOR: Color = Color::LightRed;
pub const STATUS_LANDED_COLOR: Color = Color::Cyan;
pub const STATUS_DEFAULT_COLOR: Color = Color::Yellow;

/// ティッカーの色
pub const TICKER_BG: Color = Color::Rgb(16, 20, 36);
pub const TICKER_MESSAGE_COLOR: Color = Color::Yellow;
pub const TICKER_STATUS_COLOR: Color = Color::White;

/// 航空会社バッジの背景色
pub const BADGE_PALETTE: [Color; 8] = [
    Color::Rgb(0, 82, 155),
    Color::Rgb(196, 18, 48),
    Color::Rgb(0, 122, 83),
    Color::Rgb(230, 126, 34),
    Color::Rgb(110, 57, 160),
    Color::Rgb(0, 150, 170),
    Color::Rgb(150, 110, 40),
    Color::Rgb(90, 90, 110),
];
pub const BADGE_TEXT_COLOR: Color = Color::White;
