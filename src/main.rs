use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use port_zero::types::{ScanRequest, ScanResult, DEFAULT_CONCURRENCY};
use port_zero::{liveness, ports, resolve, scanner};

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const LIVENESS_TIMEOUT: Duration = Duration::from_secs(5);

/// Exit status for a scan interrupted by the operator (shell convention for
/// SIGINT-terminated work).
const EXIT_INTERRUPTED: u8 = 130;

/// port-zero — concurrent TCP connect scanner with service identification.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "port-zero",
    version,
    about = "Concurrent TCP connect scanner with host liveness checks and service identification.",
    long_about = None
)]
struct Cli {
    /// Target hostname or IP address.
    target: String,

    /// Ports to scan: single port, inclusive range `a-b`, or comma list
    /// (a comma list is scanned as the [min,max] envelope of the list).
    #[arg(short = 'p', long = "ports", default_value = "1-1000")]
    ports: String,

    /// Worker pool size (max concurrent connect attempts).
    #[arg(short = 't', long = "threads", default_value_t = DEFAULT_CONCURRENCY)]
    threads: usize,

    /// SYN-style scan. Raw sockets are not used; falls back to full TCP
    /// connect semantics with a warning.
    #[arg(short = 'S', long = "syn-scan", alias = "sS")]
    syn_scan: bool,

    /// Identify services on open ports via a best-effort banner read.
    #[arg(short = 'V', long = "service-detection", alias = "sV")]
    service_detection: bool,

    /// Liveness check only; skip port scanning entirely.
    #[arg(short = 'n', long = "ping-only", alias = "sn")]
    ping_only: bool,

    /// Per-port connect timeout in milliseconds.
    #[arg(long = "timeout-ms", default_value_t = 1000)]
    timeout_ms: u64,

    /// Write the full scan result as pretty JSON to this path.
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = if std::env::args().len() == 1 {
        match prompt_cli() {
            Ok(cli) => cli,
            Err(e) => {
                eprintln!("error: {e:#}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        Cli::parse()
    };

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    // Both validation failures abort here, before any probe is issued.
    let addr = resolve::resolve(&cli.target).await?;
    let (port_low, port_high) = ports::parse_port_spec(&cli.ports)?;
    if ports::is_comma_list(&cli.ports) {
        println!("Note: scanning range from minimum to maximum port in list");
    }

    println!("Target: {} ({addr})", cli.target);

    if cli.ping_only {
        let up = liveness::probe_alive(addr, LIVENESS_TIMEOUT).await;
        if up {
            println!("Host {addr} is UP");
        } else {
            println!("Host {addr} appears to be DOWN");
        }
        return Ok(ExitCode::SUCCESS);
    }

    if cli.syn_scan {
        warn!("raw-socket SYN scan is unsupported; using full TCP connect probes");
    }

    let mut req = ScanRequest::new(cli.target.clone(), addr, port_low, port_high);
    req.concurrency = cli.threads;
    req.probe_timeout = Duration::from_millis(cli.timeout_ms);
    req.detect_services = cli.service_detection;

    println!(
        "Scanning ports {port_low}-{port_high} with {} workers, {}ms connect timeout",
        req.concurrency, cli.timeout_ms
    );

    // Ctrl-C stops submission; in-flight probes drain and the partial
    // result is still reported.
    let cancel = CancellationToken::new();
    let cancel_ctrlc = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        eprintln!("\nInterrupt received, finishing in-flight probes...");
        cancel_ctrlc.cancel();
    });

    let result = scanner::run_scan_with_cancel(&req, cancel).await;

    print_report(&result);
    if let Some(path) = cli.output.as_deref() {
        write_result_json(path, &result)
            .with_context(|| format!("failed to write JSON to {}", path.display()))?;
        println!("Wrote JSON results to {}", path.display());
    }

    if result.complete {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_INTERRUPTED))
    }
}

/// Interactive fallback when invoked with no arguments at all.
fn prompt_cli() -> Result<Cli> {
    let target = prompt("Enter target IP or hostname: ")?;
    if target.is_empty() {
        anyhow::bail!("no target given");
    }
    let ports = prompt("Enter port range (e.g., 1-1000) [default: 1-1000]: ")?;
    let threads = prompt(&format!(
        "Enter number of workers [default: {DEFAULT_CONCURRENCY}]: "
    ))?;

    Ok(Cli {
        target,
        ports: if ports.is_empty() {
            "1-1000".to_string()
        } else {
            ports
        },
        threads: if threads.is_empty() {
            DEFAULT_CONCURRENCY
        } else {
            threads.parse().context("invalid worker count")?
        },
        syn_scan: false,
        service_detection: false,
        ping_only: false,
        timeout_ms: 1000,
        output: None,
    })
}

fn prompt(msg: &str) -> Result<String> {
    print!("{msg}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_report(result: &ScanResult) {
    println!();
    if result.host_up {
        println!("Host {} is UP", result.request.addr);
    } else {
        println!(
            "Host {} did not answer the liveness probe (may still filter ICMP)",
            result.request.addr
        );
    }

    if result.ports.is_empty() {
        println!("No open ports found.");
    } else {
        let mut service_w = "SERVICE".len();
        for r in &result.ports {
            if let Some(s) = &r.service {
                service_w = service_w.max(s.len());
            }
        }
        println!("{:<10} {:<7} {:<service_w$}", "PORT", "STATE", "SERVICE");
        for r in &result.ports {
            println!(
                "{:<10} {:<7} {:<service_w$}",
                format!("{}/tcp", r.port),
                "open",
                r.service.as_deref().unwrap_or(""),
            );
        }
    }

    println!(
        "\n{} open port(s), scanned in {:.2}s (started {})",
        result.ports.len(),
        result.elapsed.as_secs_f64(),
        result.started_at
    );
    if !result.complete {
        println!("Scan interrupted — results above are partial.");
    }
}

fn write_result_json(path: &std::path::Path, result: &ScanResult) -> Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, result)?;
    Ok(())
}
