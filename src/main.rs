// solid 命令行入口
//
// 启动应用目录中的应用，并运行当前环境的内核或查看配置

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use solid::config::Settings;
use solid::kernel::{Request, Sapi};
use solid::logging::{init_logging, LogFormat, LoggingConfig};
use solid::Application;
use tracing::Level;

#[derive(Parser)]
#[command(name = "solid")]
#[command(version, about = "Resolution container and application kernel")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 诊断日志级别（RUST_LOG 优先）
    #[arg(long, global = true, default_value = "warn")]
    log_level: Level,

    /// 诊断日志格式
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Compact)]
    log_format: LogFormatArg,
}

#[derive(Subcommand)]
enum Commands {
    /// 启动应用并运行当前环境的内核
    Run {
        /// 应用目录（读取其中的 config.json）
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// 运行环境，默认自动判断
        #[arg(short, long)]
        sapi: Option<String>,

        /// 传给内核请求的参数
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// 启动应用并打印配置
    Config {
        /// 应用目录（读取其中的 config.json）
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// 点分路径，省略时打印全部配置
        path: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::default()
        .with_level(cli.log_level)
        .with_format(cli.log_format.into());
    init_logging(logging).map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    match cli.command {
        Commands::Run { dir, sapi, args } => {
            let mut builder = Application::builder(&dir);
            if let Some(sapi) = sapi {
                builder = builder.sapi(sapi.parse::<Sapi>()?);
            }
            let app = builder
                .build()
                .with_context(|| format!("failed to boot application in {}", dir.display()))?;

            app.run_with(Request::builder().arguments(args).build())?;
        }
        Commands::Config { dir, path } => {
            let app = Application::builder(&dir)
                .sapi(Sapi::Cli)
                .build()
                .with_context(|| format!("failed to boot application in {}", dir.display()))?;
            let config = app.config()?;

            let value = match path {
                Some(path) => config
                    .get(&path)
                    .with_context(|| format!("setting '{}' is not defined", path))?,
                None => config.all(),
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}
