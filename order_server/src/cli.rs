use std::{env, env::VarError};

/// The server takes no arguments. Any argument prints the help text and the current configuration.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // OMS_PAYMENTS_API_KEY is deliberately left out
    const DISPLAY_ENVS: [&str; 11] = [
        "RUST_LOG",
        "OMS_HOST",
        "OMS_PORT",
        "OMS_DATABASE_URL",
        "OMS_CATALOG_URL",
        "OMS_PAYMENTS_URL",
        "OMS_RPC_TIMEOUT_MS",
        "OMS_CURRENCY",
        "OMS_STRICT_ENRICHMENT",
        "OMS_REJECT_UNKNOWN_PRODUCTS",
        "OMS_EVENT_BUFFER_SIZE",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
