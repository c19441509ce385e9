use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Airport Flight Information Display
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(version, about)]
pub(crate) struct Cli {
    /// 設定ファイルのパス
    #[arg(long, short, default_value = "./config.toml")]
    pub(crate) config: PathBuf,

    /// ホストメッセージを読み込むファイルまたはFIFO(設定ファイルより優先)
    #[arg(long, short)]
    pub(crate) bridge: Option<PathBuf>,

    /// 空港のIATAコード(設定ファイルより優先)
    #[arg(long, short)]
    pub(crate) airport: Option<String>,
}

impl Cli {
    pub(crate) fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// コマンドライン引数で設定を上書きする
    pub(crate) fn apply(&self, config: &mut Config) {
        if let Some(bridge) = &self.bridge {
            config.bridge.path = Some(bridge.clone());
        }
        if let Some(airport) = self.airport.as_deref().filter(|code| !code.is_empty()) {
            config.airport = airport.to_string();
        }
    }
}
