use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cytonlink_board::Board;
use tracing::info;

use crate::cmd::{resolve_port, StreamArgs};
use crate::exit::{board_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_sample, OutputFormat};

pub fn run(args: StreamArgs, format: OutputFormat) -> CliResult<i32> {
    let port = resolve_port(args.port)?;
    let mut board =
        Board::open(&port, args.baud).map_err(|err| board_error("board open failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut streamed = 0usize;
    board
        .start(|sample| {
            print_sample(&sample, format);
            streamed += 1;
            if let Some(count) = args.count {
                if streamed >= count {
                    return false;
                }
            }
            running.load(Ordering::SeqCst)
        })
        .map_err(|err| board_error("streaming failed", err))?;

    info!(streamed, "stream finished");
    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
