//! Command line and runtime settings
//!
//! Every setting can come from a flag, an environment variable or `.env`
//! (loaded by `main` before parsing).

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use fwz_client::ClientConfig;
use fwz_client::config::{DEFAULT_BASE_URL, DEFAULT_PIC_URL};

use crate::core::card::ReaderEndpoint;
use crate::events::CardKind;

/// 电子社保卡 / 社保卡 SDK 接入地址
pub const DEFAULT_ESS_URL: &str = "https://qyykt.e-tecsun.com/prod-api/outInterface/api/r0/doPost";
pub const DEFAULT_ESS_PLATFORM: &str = "gdly";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_DATA_DIR: &str = ".fwz";

#[derive(Debug, Parser)]
#[command(name = "fwz")]
#[command(author, version, about = "fwz 商户核销终端", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub settings: AppSettings,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct AppSettings {
    /// Backend base URL
    #[arg(long, global = true, env = "FWZ_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Picture base URL (terminal detail `pic`)
    #[arg(long, global = true, env = "FWZ_PIC_URL", default_value = DEFAULT_PIC_URL)]
    pub pic_url: String,

    /// Session file and logs live here
    #[arg(long, global = true, env = "FWZ_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Orders per page
    #[arg(long, global = true, env = "FWZ_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Request timeout in seconds; no timeout when unset
    #[arg(long, global = true, env = "FWZ_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Social-security SDK endpoint
    #[arg(long, global = true, env = "FWZ_ESS_URL", default_value = DEFAULT_ESS_URL)]
    pub ess_url: String,

    #[arg(long, global = true, env = "FWZ_ESS_PLATFORM", default_value = DEFAULT_ESS_PLATFORM)]
    pub ess_platform: String,

    /// Device identifier sent with the login
    #[arg(long, global = true, env = "FWZ_EQUIPMENT_CODING", default_value = "")]
    pub equipment_coding: String,

    /// Device fixture (JSON); without it the terminal has no NFC
    #[arg(long, global = true, env = "FWZ_DEVICES")]
    pub devices: Option<PathBuf>,

    /// Log filter, e.g. `info,fwz_client=debug`
    #[arg(long, global = true, env = "FWZ_LOG")]
    pub log: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            pic_url: DEFAULT_PIC_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: None,
            ess_url: DEFAULT_ESS_URL.to_string(),
            ess_platform: DEFAULT_ESS_PLATFORM.to_string(),
            equipment_coding: String::new(),
            devices: None,
            log: None,
        }
    }
}

impl AppSettings {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.base_url.clone());
        match self.timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }

    pub fn reader_endpoint(&self) -> ReaderEndpoint {
        ReaderEndpoint {
            url: self.ess_url.clone(),
            platform_id: self.ess_platform.clone(),
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 登录
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "FWZ_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// 退出登录
    Logout,

    /// Terminal detail and session
    Home,

    /// 订单查询
    Orders {
        /// Order number or keyword
        #[arg(short, long)]
        keyword: Option<String>,
        /// Pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Handle a QR payload; without one the device scanner is used
    Scan { payload: Option<String> },

    /// 核销订单
    Verify {
        order_id: i64,
        /// Ticket count for multi-ticket orders
        #[arg(short, long)]
        quantity: Option<String>,
        /// Tourist id, repeatable
        #[arg(short, long = "tourist")]
        tourists: Vec<i64>,
    },

    /// 订单详情
    Detail { order_id: i64 },

    /// NFC availability
    NfcStatus,

    /// Wait for a card and open its verification list
    ReadCard {
        #[arg(short, long, default_value = "id")]
        kind: CardKind,
    },

    /// 身份证读取测试
    IdCardDemo,
}
