mod config;
mod logging;
mod manifest;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use packet_engine::{Dispatcher, FrameCodec, Host, SystemFolderOpener};
use packet_logging::{packet_info, packet_warn};

const PRINT_MANIFEST_FLAG: &str = "--print-manifest";

pub fn run_host() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Some(pos) = args.iter().position(|a| a == PRINT_MANIFEST_FLAG) {
        let extension_id = args
            .get(pos + 1)
            .with_context(|| format!("{PRINT_MANIFEST_FLAG} needs an extension id"))?;
        let executable = std::env::current_exe().context("locating the host executable")?;
        println!("{}", manifest::render(&executable, extension_id)?);
        return Ok(());
    }

    let (config, config_warning) = config::load_or_default();
    logging::initialize(&config);
    if let Some(warning) = config_warning {
        packet_warn!("{}", warning);
    }
    // The browser passes the caller origin (and on Windows a parent window handle).
    packet_info!("Host starting (pid {}), caller arguments: {:?}", std::process::id(), args);

    let dispatcher = Dispatcher::new(Arc::new(SystemFolderOpener)).with_error_log(&config.error_log);
    let host = Host::new(
        dispatcher,
        FrameCodec::with_max_message_bytes(config.max_message_bytes),
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = host.run(&mut stdin.lock(), &mut stdout.lock());
    packet_info!(
        "Host exiting after {} request(s): {}",
        summary.handled,
        summary.exit
    );
    Ok(())
}
