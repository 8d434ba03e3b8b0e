use cytonlink_board::Board;

use crate::cmd::{resolve_port, RegistersArgs};
use crate::exit::{board_error, CliResult, SUCCESS};

pub fn run(args: RegistersArgs) -> CliResult<i32> {
    let port = resolve_port(args.port)?;
    let mut board =
        Board::open(&port, args.baud).map_err(|err| board_error("board open failed", err))?;

    let dump = board
        .register_settings()
        .map_err(|err| board_error("register query failed", err))?;

    println!("{dump}");
    Ok(SUCCESS)
}
