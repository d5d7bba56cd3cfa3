use clap::Parser;
use pg_replayer::parser::constants::DEFAULT_CAPTURE_PATH;
use pg_replayer::{DryRunExecutor, ReplayConfig, ReplayError, Rotator, parse_separator, run_once};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// 轮转 PgBouncer 抓包文件，并把其中的语句回放到镜像数据库。
///
/// 每次运行只处理一轮；周期性执行交给 cron、systemd 等外部调度。
#[derive(Parser, Debug)]
#[command(name = "pg-replayer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 镜像数据库连接串
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// 代理写入的抓包文件
    #[arg(long, env = "QUERY_FILE_PATH", default_value = DEFAULT_CAPTURE_PATH)]
    capture_path: PathBuf,

    /// 记录分隔符（十六进制）
    #[arg(long, env = "LINE_SEPARATOR", default_value = "19", value_parser = parse_separator)]
    separator: u8,

    /// 回放成功后保留快照文件
    #[arg(long, env = "KEEP_SNAPSHOT")]
    keep_snapshot: bool,

    /// 跳过 BEGIN/END/COMMIT/ROLLBACK
    #[arg(long, env = "SKIP_TRANSACTION_CONTROL")]
    skip_transaction_control: bool,

    /// 只打印语句，不连接数据库
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn to_config(&self) -> ReplayConfig {
        let mut config = ReplayConfig::new(self.capture_path.clone())
            .with_separator(self.separator)
            .with_keep_snapshot(self.keep_snapshot)
            .with_skip_transaction_control(self.skip_transaction_control);
        config.database_url = self.database_url.clone();
        config
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.to_config();

    match run(&config, cli.dry_run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_config() => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "replay failed");
            ExitCode::FAILURE
        }
    }
}

/// 配置检查顺序：连接串、抓包文件，全部通过后才连接数据库
fn run(config: &ReplayConfig, dry_run: bool) -> Result<(), ReplayError> {
    let stats = if dry_run {
        run_once(config, DryRunExecutor)?
    } else {
        let url = config.require_database_url()?;
        Rotator::new(config)?;
        run_once(config, connect(url)?)?
    };

    tracing::debug!(?stats, "done");
    Ok(())
}

#[cfg(feature = "sqlite")]
fn connect(url: &str) -> Result<pg_replayer::SqliteExecutor, ReplayError> {
    Ok(pg_replayer::SqliteExecutor::open(url)?)
}

#[cfg(not(feature = "sqlite"))]
fn connect(url: &str) -> Result<DryRunExecutor, ReplayError> {
    Err(pg_replayer::ExecutionError::new(format!(
        "no database driver for {url}: build with the `sqlite` feature or pass --dry-run"
    ))
    .into())
}
