// logmonitor - bin/writelog.rs
//
// Auxiliary traffic generator: appends canonical Common Log Format lines
// to a file at a constant rate. Used for manual testing and demos:
//
//   writelog --path /tmp/access.log --lines 100 --duration 10s

use clap::Parser;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// A well-formed CLF line with the optional trailing referer/user-agent
/// fields real servers append.
const LOG_LINE: &str = r#"83.149.9.216 - - [17/May/2015:10:05:03 +0000] "GET /presentations/logstash-monitorama-2013/images/kibana-search.png HTTP/1.1" 200 203023 "http://semicomplete.com/presentations/logstash-monitorama-2013/" "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_9_1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/32.0.1700.77 Safari/537.36""#;

/// Writes log lines following the common log format.
///
/// Appends --lines lines to the file at --path, spread uniformly over
/// --duration. The write rate is constant.
#[derive(Parser, Debug)]
#[command(name = "writelog", version, about)]
struct Cli {
    /// File to append the log lines to (created if missing).
    #[arg(short = 'p', long = "path")]
    path: PathBuf,

    /// Number of lines to write.
    #[arg(short = 'l', long = "lines", default_value_t = 10)]
    lines: u64,

    /// Total writing duration; lines are spread uniformly across it.
    #[arg(short = 'd', long = "duration", default_value = "1s",
          value_parser = humantime::parse_duration)]
    duration: Duration,
}

fn main() {
    let cli = Cli::parse();

    if cli.lines == 0 {
        eprintln!("Error: --lines must be at least 1");
        std::process::exit(2);
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.path);
    let mut file = match file {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: cannot open '{}': {e}", cli.path.display());
            std::process::exit(1);
        }
    };

    let gap = cli.duration / u32::try_from(cli.lines).unwrap_or(u32::MAX);
    let start = Instant::now();

    let mut written = 0u64;
    while written < cli.lines {
        if let Err(e) = writeln!(file, "{LOG_LINE}") {
            eprintln!("Error: write failed: {e}");
            std::process::exit(1);
        }
        written += 1;
        if written < cli.lines {
            std::thread::sleep(gap);
        }
    }

    println!(
        "Wrote {written} lines in {:.3} seconds",
        start.elapsed().as_secs_f64()
    );
}
