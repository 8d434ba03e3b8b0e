use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("cytonlink {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: cytonlink");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "packet: {} bytes, {} channels",
        cytonlink_frame::PACKET_SIZE,
        cytonlink_frame::CHANNEL_COUNT
    );
    println!("scale: {:e} uV/count", cytonlink_frame::SCALE_UV_PER_COUNT);

    Ok(SUCCESS)
}
