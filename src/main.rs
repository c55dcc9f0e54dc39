//! 程序入口：初始化日志、加载 NeXus Structure 文件并执行导航命令

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::SubscriberBuilder;

use nexus_navi::{build_outline, NexusDocument, Resolved};

/// 按路径浏览 NeXus Structure JSON
#[derive(Debug, Parser)]
#[command(name = "nexus_navi", version, about)]
struct Cli {
    /// NeXus Structure JSON 文件
    file: PathBuf,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 打印路径指向的节点或属性
    Show { path: String },
    /// 检查路径是否存在（不存在时退出码为 1）
    Exists { path: String },
    /// 按名称搜索并打印每个匹配的路径
    Find {
        name: String,
        /// 同时搜索属性
        #[arg(short, long)]
        attributes: bool,
    },
    /// 打印子树大纲
    Tree {
        #[arg(default_value = "/")]
        path: String,
        /// 最大深度
        #[arg(short, long)]
        depth: Option<u32>,
        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let doc = NexusDocument::load_file(&cli.file)
        .with_context(|| format!("无法加载 {}", cli.file.display()))?;
    let nav = doc.navigator()?;

    match cli.command {
        Command::Show { path } => {
            let found = nav.resolve(&path)?;
            if let Resolved::Group(group) = found {
                tracing::debug!("{} -> {}", path, group);
            }
            println!("{}", serde_json::to_string_pretty(found.as_value())?);
        }
        Command::Exists { path } => {
            let exists = nav.exists(&path)?;
            println!("{}", exists);
            if !exists {
                return Ok(ExitCode::from(1));
            }
        }
        Command::Find { name, attributes } => {
            let hits = nav.find_all(&name, attributes);
            tracing::info!("找到 {} 个名为 '{}' 的元素", hits.len(), name);
            for hit in hits {
                match nav.get_path(hit) {
                    Ok(p) => println!("{}", p),
                    Err(e) => tracing::warn!("无法重建匹配项路径: {}", e),
                }
            }
        }
        Command::Tree { path, depth, json } => {
            let rows = build_outline(nav.group(&path)?, depth);
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for row in rows {
                    let indent = "  ".repeat(row.depth as usize);
                    println!("{}{} [{:?}] {}", indent, row.name, row.kind, row.preview);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // 初始化日志输出，日志写到 stderr，避免污染 stdout 上的结果
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let _ = SubscriberBuilder::default()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}
