use crate::cmd::PortsArgs;
use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::{print_ports, OutputFormat};

pub fn run(args: PortsArgs, format: OutputFormat) -> CliResult<i32> {
    let mut ports = cytonlink_transport::available_ports()
        .map_err(|err| transport_error("port enumeration failed", err))?;

    if args.board_only {
        ports.retain(cytonlink_transport::is_board_port);
    }

    print_ports(&ports, format);
    Ok(SUCCESS)
}
