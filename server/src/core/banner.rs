//! Startup banner and URL display

use super::config::is_all_interfaces;
use super::constants::APP_NAME;
use crate::utils::terminal::{bold, dim, terminal_link};

/// Print the startup banner with URLs
pub fn print_banner(host: &str, port: u16, database: &str, max_page_size: Option<u64>) {
    // Use localhost for display when binding to all interfaces
    let display_host = if is_all_interfaces(host) {
        "localhost"
    } else {
        host
    };
    let base_url = format!("http://{}:{}", display_host, port);

    // Label width: "Network:" plus padding
    const W: usize = 10;

    println!();
    println!(
        "  {} {}",
        bold(APP_NAME),
        dim(&format!("v{}", env!("CARGO_PKG_VERSION")))
    );
    println!();

    println!(
        "  \x1b[32m➜\x1b[0m  {} {}",
        bold(&format!("{:<W$}", "API:")),
        terminal_link(&format!("{}/api/v1/listings", base_url))
    );
    println!(
        "  \x1b[33m➜\x1b[0m  {} {}",
        bold(&format!("{:<W$}", "Docs:")),
        terminal_link(&format!("{}/api/docs", base_url))
    );

    if host == "127.0.0.1" || host == "localhost" {
        println!(
            "  {}",
            dim(&format!("➜  {:<W$} use --host 0.0.0.0 to expose", "Network:"))
        );
    } else if is_all_interfaces(host) {
        // Enumerate LAN IPs when binding to all interfaces
        if let Ok(interfaces) = local_ip_address::list_afinet_netifas() {
            for (_, ip) in interfaces
                .iter()
                .filter(|(_, ip)| ip.is_ipv4() && !ip.is_loopback())
            {
                println!(
                    "  \x1b[32m➜\x1b[0m  {} {}",
                    bold(&format!("{:<W$}", "Network:")),
                    terminal_link(&format!("http://{}:{}", ip, port))
                );
            }
        }
    } else {
        println!(
            "  \x1b[32m➜\x1b[0m  {} {}",
            bold(&format!("{:<W$}", "Network:")),
            terminal_link(&format!("http://{}:{}", host, port))
        );
    }

    println!("  {}", dim(&format!("➜  {:<W$} {}", "Database:", database)));
    if let Some(max) = max_page_size {
        println!("  {}", dim(&format!("➜  {:<W$} {}", "Page max:", max)));
    }

    println!();
}
