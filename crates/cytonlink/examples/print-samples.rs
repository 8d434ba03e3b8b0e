//! Minimal acquisition loop: open the board, stream 250 samples (one
//! second at the board's rate), print the first channel.
//!
//! Run with: `cargo run --example print-samples -- /dev/ttyUSB0`

use cytonlink_board::Board;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyUSB0".to_string());

    let mut board = Board::open(&port, 115_200)?;

    let mut seen = 0usize;
    board.start(|sample| {
        println!("id={} ch1={:.4} uV", sample.packet_id, sample.channels[0]);
        seen += 1;
        seen < 250
    })?;

    Ok(())
}
