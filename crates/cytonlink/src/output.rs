use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use cytonlink_frame::Sample;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    /// Tab-separated values, one sample per line.
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct SampleOutput<'a> {
    packet_id: u8,
    channels_uv: &'a [f64],
    aux: &'a [i16],
    timestamp_ms: u128,
}

pub fn print_sample(sample: &Sample, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = SampleOutput {
                packet_id: sample.packet_id,
                channels_uv: &sample.channels,
                aux: &sample.aux,
                timestamp_ms: now_unix_millis(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            let mut header = vec!["ID".to_string()];
            header.extend((0..sample.channels.len()).map(|i| format!("CH{} (uV)", i + 1)));
            header.extend(["AX".into(), "AY".into(), "AZ".into()]);

            let mut row = vec![sample.packet_id.to_string()];
            row.extend(sample.channels.iter().map(|v| format!("{v:.4}")));
            row.extend(sample.aux.iter().map(|a| a.to_string()));

            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(header)
                .add_row(row);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let channels = sample
                .channels
                .iter()
                .map(|v| format!("{v:.4}"))
                .collect::<Vec<_>>()
                .join(" ");
            println!(
                "id={:3} uv=[{}] aux={:?}",
                sample.packet_id, channels, sample.aux
            );
        }
        OutputFormat::Raw => {
            println!("{}", raw_line(sample));
        }
    }
}

/// One sample as a tab-separated line: id, 8 channel values in microvolts
/// (full float precision), 3 raw aux values.
fn raw_line(sample: &Sample) -> String {
    let mut fields = Vec::with_capacity(1 + sample.channels.len() + sample.aux.len());
    fields.push(sample.packet_id.to_string());
    fields.extend(sample.channels.iter().map(|v| v.to_string()));
    fields.extend(sample.aux.iter().map(|a| a.to_string()));
    fields.join("\t")
}

pub fn print_ports(ports: &[cytonlink_transport::SerialPortInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let names: Vec<&str> = ports.iter().map(|p| p.port_name.as_str()).collect();
            println!(
                "{}",
                serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "TYPE"]);
            for info in ports {
                table.add_row(vec![
                    info.port_name.clone(),
                    format!("{:?}", info.port_type),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for info in ports {
                println!("{}", info.port_name);
            }
        }
    }
}

fn now_unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
